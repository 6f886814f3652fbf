use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::audio::sync::ShortAudioPolicy;
use crate::foundation::core::{Canvas, Fps, VideoMode};
use crate::foundation::error::{StillreelError, StillreelResult};

/// Name of the video written next to the first image when no output path is configured.
pub const DEFAULT_OUTPUT_NAME: &str = "output_video.mp4";

fn default_per_image_secs() -> f64 {
    5.0
}

fn default_fade_secs() -> f64 {
    1.0
}

fn default_audio_fade_secs() -> f64 {
    2.0
}

/// Everything needed to run one slideshow job.
///
/// Deserializes from JSON with every field except `images` optional:
///
/// ```json
/// { "images": ["a.jpg", "b.png"], "mode": "shorts", "per_image_secs": 4.0 }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Images in playback order.
    pub images: Vec<PathBuf>,
    /// Optional soundtrack.
    #[serde(default)]
    pub audio: Option<PathBuf>,
    #[serde(default)]
    pub mode: VideoMode,
    /// Seconds each image stays on screen.
    #[serde(default = "default_per_image_secs")]
    pub per_image_secs: f64,
    /// Fade-in and fade-out length of every clip.
    #[serde(default = "default_fade_secs")]
    pub fade_secs: f64,
    /// Fade-in and fade-out length of the soundtrack.
    #[serde(default = "default_audio_fade_secs")]
    pub audio_fade_secs: f64,
    #[serde(default)]
    pub fps: Fps,
    #[serde(default)]
    pub short_audio: ShortAudioPolicy,
    /// Worker threads for compositing; `None` uses every available core.
    #[serde(default)]
    pub threads: Option<usize>,
    /// Output file; defaults to [`DEFAULT_OUTPUT_NAME`] beside the first image.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl JobConfig {
    /// Job with default timing for `images`.
    pub fn new(images: Vec<PathBuf>) -> Self {
        Self {
            images,
            audio: None,
            mode: VideoMode::default(),
            per_image_secs: default_per_image_secs(),
            fade_secs: default_fade_secs(),
            audio_fade_secs: default_audio_fade_secs(),
            fps: Fps::default(),
            short_audio: ShortAudioPolicy::default(),
            threads: None,
            output: None,
        }
    }

    /// Load a job description from a JSON file.
    pub fn from_json_file(path: &Path) -> StillreelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read job file '{}'", path.display()))?;
        serde_json::from_str(&text).map_err(|e| {
            StillreelError::invalid_job(format!("job file '{}': {e}", path.display()))
        })
    }

    /// Reject configurations that cannot produce a video, before any work starts.
    pub fn validate(&self) -> StillreelResult<()> {
        if self.images.is_empty() {
            return Err(StillreelError::invalid_job("at least one image is required"));
        }
        if !self.per_image_secs.is_finite() || self.per_image_secs <= 0.0 {
            return Err(StillreelError::invalid_job(format!(
                "per_image_secs must be > 0 (got {})",
                self.per_image_secs
            )));
        }
        if !self.fade_secs.is_finite() || self.fade_secs < 0.0 {
            return Err(StillreelError::invalid_job(format!(
                "fade_secs must be >= 0 (got {})",
                self.fade_secs
            )));
        }
        if !self.audio_fade_secs.is_finite() || self.audio_fade_secs < 0.0 {
            return Err(StillreelError::invalid_job(format!(
                "audio_fade_secs must be >= 0 (got {})",
                self.audio_fade_secs
            )));
        }
        let fps = Fps::new(self.fps.num, self.fps.den)?;
        if self.per_image_secs < fps.frame_duration_secs() {
            return Err(StillreelError::invalid_job(format!(
                "per_image_secs must cover at least one frame ({:.4}s at {}/{} fps, got {})",
                fps.frame_duration_secs(),
                fps.num,
                fps.den,
                self.per_image_secs
            )));
        }
        if self.threads == Some(0) {
            return Err(StillreelError::invalid_job("threads must be >= 1 when set"));
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        self.mode.canvas()
    }

    /// Configured output, or [`DEFAULT_OUTPUT_NAME`] in the first image's directory.
    pub fn output_path(&self) -> PathBuf {
        if let Some(out) = &self.output {
            return out.clone();
        }
        self.images
            .first()
            .and_then(|p| p.parent())
            .map(|dir| dir.join(DEFAULT_OUTPUT_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_NAME))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/config.rs"]
mod tests;
