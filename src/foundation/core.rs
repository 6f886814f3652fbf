use crate::foundation::error::{StillreelError, StillreelResult};

/// Playback cap applied to [`VideoMode::Shorts`] jobs.
pub const SHORTS_MAX_DURATION_SECS: f64 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> StillreelResult<Self> {
        if den == 0 {
            return Err(StillreelError::invalid_job("fps den must be > 0"));
        }
        if num == 0 {
            return Err(StillreelError::invalid_job("fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Nearest frame boundary for a timeline position.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> StillreelResult<Self> {
        if width == 0 || height == 0 {
            return Err(StillreelError::invalid_job(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Output flavor of a job: fixes the canvas and whether a duration cap applies.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VideoMode {
    /// Landscape 1920x1080, no duration cap.
    #[default]
    Regular,
    /// Portrait 1080x1920, capped at [`SHORTS_MAX_DURATION_SECS`].
    Shorts,
}

impl VideoMode {
    pub fn canvas(self) -> Canvas {
        match self {
            Self::Regular => Canvas {
                width: 1920,
                height: 1080,
            },
            Self::Shorts => Canvas {
                width: 1080,
                height: 1920,
            },
        }
    }

    pub fn max_duration_secs(self) -> Option<f64> {
        match self {
            Self::Regular => None,
            Self::Shorts => Some(SHORTS_MAX_DURATION_SECS),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Shorts => "shorts",
        }
    }
}

impl std::fmt::Display for VideoMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
