use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::error::{StillreelError, StillreelResult};

/// Cooperative cancellation flag shared between a job and whoever may stop it.
///
/// Clones share the same flag. Workers check it between images and the orchestrator checks
/// it before each stage; an image already being composited is allowed to finish.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled { stage })` once cancellation was requested.
    pub fn checkpoint(&self, stage: &'static str) -> StillreelResult<()> {
        if self.is_cancelled() {
            tracing::info!(stage, "job cancelled");
            return Err(StillreelError::cancelled(stage));
        }
        Ok(())
    }
}
