use std::path::PathBuf;

use crate::audio::sync::{AudioTrack, write_f32le_file};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::Fps;
use crate::foundation::error::{StillreelError, StillreelResult};
use crate::foundation::math::scale_bytes_into;
use crate::timeline::assemble::Timeline;

/// Turns a finished timeline (and optional synchronized audio) into an output file.
pub trait TimelineEncoder {
    /// Encode `timeline`. Called once per job; blocking.
    fn encode(&mut self, timeline: &Timeline, audio: Option<&AudioTrack>) -> StillreelResult<()>;
}

/// [`TimelineEncoder`] that rasterizes the timeline at a fixed frame rate into a [`FrameSink`].
///
/// Clip `i` covers output frames `[round(start_i * fps), round(end_i * fps))`, so rounding never
/// accumulates across clips. Every frame is the clip's still scaled by its fade envelope at the
/// frame's clip-local time.
pub struct SinkEncoder<S> {
    sink: S,
    fps: Fps,
}

impl<S: FrameSink> SinkEncoder<S> {
    pub fn new(sink: S, fps: Fps) -> Self {
        Self { sink, fps }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: FrameSink> TimelineEncoder for SinkEncoder<S> {
    fn encode(&mut self, timeline: &Timeline, audio: Option<&AudioTrack>) -> StillreelResult<()> {
        let first = timeline
            .clips()
            .first()
            .ok_or_else(|| StillreelError::encode("cannot encode an empty timeline"))?;
        let canvas = first.frame().canvas();
        if let Some(bad) = timeline
            .clips()
            .iter()
            .find(|c| c.frame().canvas() != canvas)
        {
            return Err(StillreelError::encode(format!(
                "clip {} is {}x{}, expected {}x{}",
                bad.source_index(),
                bad.frame().width,
                bad.frame().height,
                canvas.width,
                canvas.height
            )));
        }
        // Each clip owns at least one output frame.
        if let Some(p) = timeline.placed().find(|p| {
            self.fps.secs_to_frames_round(p.end()) <= self.fps.secs_to_frames_round(p.start)
        }) {
            return Err(StillreelError::encode(format!(
                "clip {} ({}s at {:.3}s) is shorter than one frame at {}/{} fps",
                p.clip.source_index(),
                p.clip.duration(),
                p.start,
                self.fps.num,
                self.fps.den
            )));
        }

        let mut audio_tmp = TempFileGuard(None);
        let audio_cfg = match audio {
            Some(track) if !track.is_empty() => {
                let path = std::env::temp_dir().join(format!(
                    "stillreel_audio_{}_{}.f32le",
                    std::process::id(),
                    std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .map(|d| d.as_nanos())
                        .unwrap_or(0)
                ));
                write_f32le_file(track, &path)?;
                audio_tmp.0 = Some(path.clone());
                Some(AudioInputConfig {
                    path,
                    sample_rate: track.sample_rate(),
                    channels: track.channels(),
                })
            }
            _ => None,
        };

        self.sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.fps,
            audio: audio_cfg,
        })?;

        let mut scratch = vec![0u8; canvas.pixel_count() * 3];
        let mut pushed = 0u64;
        for placed in timeline.placed() {
            let start_f = self.fps.secs_to_frames_round(placed.start);
            let end_f = self.fps.secs_to_frames_round(placed.end());
            let clip = placed.clip;
            for f in start_f..end_f {
                let local = self.fps.frames_to_secs(f - start_f);
                scale_bytes_into(&mut scratch, &clip.frame().rgb8, clip.opacity_at(local));
                self.sink.push_frame(f, &scratch)?;
                pushed += 1;
            }
        }
        tracing::debug!(frames = pushed, clips = timeline.len(), "rasterized timeline");

        self.sink.end()?;
        drop(audio_tmp);
        Ok(())
    }
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/timeline.rs"]
mod tests;
