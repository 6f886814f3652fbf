use std::path::PathBuf;

/// Convenience result type used across stillreel.
pub type StillreelResult<T> = Result<T, StillreelError>;

/// Top-level error taxonomy for slideshow jobs.
///
/// Only [`StillreelError::ImageDecode`] is recoverable: the orchestrator records it against the
/// offending image and carries on. Every other variant aborts the job.
#[derive(thiserror::Error, Debug)]
pub enum StillreelError {
    /// A source image could not be read or decoded.
    #[error("image decode error: '{}': {reason}", path.display())]
    ImageDecode {
        /// Path of the image that failed.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// No clip survived decoding and the duration budget.
    #[error("empty timeline: {decoded} of {attempted} images decoded and no clip fits the timeline")]
    EmptyTimeline {
        /// Number of images the job attempted.
        attempted: usize,
        /// Number of images that decoded successfully.
        decoded: usize,
    },

    /// The job configuration was rejected before any processing started.
    #[error("invalid job: {0}")]
    InvalidJob(String),

    /// The encoder failed to produce the output file.
    #[error("encode error: {0}")]
    Encode(String),

    /// The job observed a cancellation request at a checkpoint.
    #[error("cancelled during {stage}")]
    Cancelled {
        /// Pipeline stage at which cancellation was observed.
        stage: &'static str,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StillreelError {
    /// Build a [`StillreelError::ImageDecode`] value.
    pub fn image_decode(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ImageDecode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`StillreelError::InvalidJob`] value.
    pub fn invalid_job(msg: impl Into<String>) -> Self {
        Self::InvalidJob(msg.into())
    }

    /// Build a [`StillreelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`StillreelError::Cancelled`] value.
    pub fn cancelled(stage: &'static str) -> Self {
        Self::Cancelled { stage }
    }

    /// `true` for errors that only affect a single image and never fail a job on their own.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ImageDecode { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
