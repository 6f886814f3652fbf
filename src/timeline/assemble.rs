use crate::foundation::error::{StillreelError, StillreelResult};
use crate::timeline::clip::Clip;

// Float slack when comparing accumulated durations against the cap.
const CAP_EPSILON: f64 = 1e-9;

/// Clips laid back to back, in input order, with no gaps and no overlap.
#[derive(Clone, Debug)]
pub struct Timeline {
    clips: Vec<Clip>,
    duration: f64,
}

/// One clip together with its start time on the timeline.
#[derive(Clone, Copy, Debug)]
pub struct Placed<'a> {
    pub start: f64,
    pub clip: &'a Clip,
}

impl Placed<'_> {
    pub fn end(&self) -> f64 {
        self.start + self.clip.duration()
    }
}

/// Result of [`Timeline::assemble`].
#[derive(Clone, Debug)]
pub struct Assembly {
    pub timeline: Timeline,
    /// Source indices of clips left out by the duration cap, in input order.
    pub dropped: Vec<usize>,
}

impl Timeline {
    /// Concatenate `clips` (already in input order), honoring an optional duration cap.
    ///
    /// With a cap, clips are accepted while the running total stays within it. The first clip that
    /// would overshoot stops assembly and it and every later clip are reported in
    /// [`Assembly::dropped`]. No clip is ever shortened to fit.
    pub fn assemble(clips: Vec<Clip>, max_duration: Option<f64>) -> StillreelResult<Assembly> {
        let decoded = clips.len();
        if let Some(cap) = max_duration
            && (!cap.is_finite() || cap <= 0.0)
        {
            return Err(StillreelError::invalid_job(format!(
                "max duration must be a positive number of seconds (got {cap})"
            )));
        }

        let mut accepted = Vec::with_capacity(clips.len());
        let mut dropped = Vec::new();
        let mut duration = 0.0f64;
        let mut capped = false;

        for clip in clips {
            if !capped
                && let Some(cap) = max_duration
                && duration + clip.duration() > cap + CAP_EPSILON
            {
                tracing::info!(
                    cap_secs = cap,
                    accepted = accepted.len(),
                    "duration cap reached, dropping remaining clips"
                );
                capped = true;
            }
            if capped {
                dropped.push(clip.source_index());
                continue;
            }
            duration += clip.duration();
            accepted.push(clip);
        }

        if accepted.is_empty() {
            return Err(StillreelError::EmptyTimeline {
                attempted: decoded,
                decoded,
            });
        }

        Ok(Assembly {
            timeline: Self {
                clips: accepted,
                duration,
            },
            dropped,
        })
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Never true for a timeline returned by [`Timeline::assemble`].
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Total playback time in seconds (sum of clip durations).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Clips paired with their start times.
    pub fn placed(&self) -> impl Iterator<Item = Placed<'_>> + '_ {
        let mut start = 0.0f64;
        self.clips.iter().map(move |clip| {
            let placed = Placed { start, clip };
            start += clip.duration();
            placed
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assemble.rs"]
mod tests;
