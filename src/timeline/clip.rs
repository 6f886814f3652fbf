use crate::compose::frame::Frame;
use crate::foundation::error::{StillreelError, StillreelResult};

/// A still frame shown for `duration` seconds with linear fades at both ends.
///
/// Fades are clip-local (to and from black); clips never blend into each other.
#[derive(Clone, Debug)]
pub struct Clip {
    source_index: usize,
    frame: Frame,
    duration: f64,
    fade_in: f64,
    fade_out: f64,
}

impl Clip {
    /// Build a clip, clamping fades so `fade_in + fade_out <= duration`.
    ///
    /// When the requested fades overlap they are shrunk proportionally.
    pub fn new(
        source_index: usize,
        frame: Frame,
        duration: f64,
        fade_in: f64,
        fade_out: f64,
    ) -> StillreelResult<Self> {
        validate_duration(duration)?;
        validate_fade(fade_in)?;
        validate_fade(fade_out)?;

        let total = fade_in + fade_out;
        let (fade_in, fade_out) = if total > duration {
            let k = duration / total;
            (fade_in * k, fade_out * k)
        } else {
            (fade_in, fade_out)
        };

        Ok(Self {
            source_index,
            frame,
            duration,
            fade_in,
            fade_out,
        })
    }

    /// Position of the image this clip came from in the job's input list.
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn fade_in(&self) -> f64 {
        self.fade_in
    }

    pub fn fade_out(&self) -> f64 {
        self.fade_out
    }

    /// Linear fade envelope at clip-local time `t` (seconds), in `0.0..=1.0`.
    pub fn opacity_at(&self, t: f64) -> f32 {
        if !t.is_finite() || t < 0.0 || t > self.duration {
            return 0.0;
        }
        let mut gain = 1.0f64;
        if self.fade_in > 0.0 {
            gain *= (t / self.fade_in).clamp(0.0, 1.0);
        }
        if self.fade_out > 0.0 {
            gain *= ((self.duration - t) / self.fade_out).clamp(0.0, 1.0);
        }
        gain as f32
    }
}

/// Stamps frames into clips that share one duration and a symmetric fade length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipBuilder {
    duration: f64,
    fade: f64,
}

impl ClipBuilder {
    /// Rejects non-positive durations and negative fades up front.
    pub fn new(duration: f64, fade: f64) -> StillreelResult<Self> {
        validate_duration(duration)?;
        validate_fade(fade)?;
        Ok(Self { duration, fade })
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn build(&self, source_index: usize, frame: Frame) -> StillreelResult<Clip> {
        Clip::new(source_index, frame, self.duration, self.fade, self.fade)
    }
}

fn validate_duration(duration: f64) -> StillreelResult<()> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(StillreelError::invalid_job(format!(
            "clip duration must be a positive number of seconds (got {duration})"
        )));
    }
    Ok(())
}

fn validate_fade(fade: f64) -> StillreelResult<()> {
    if !fade.is_finite() || fade < 0.0 {
        return Err(StillreelError::invalid_job(format!(
            "fade duration must be >= 0 seconds (got {fade})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/clip.rs"]
mod tests;
