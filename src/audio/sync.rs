use std::path::Path;

use crate::foundation::error::{StillreelError, StillreelResult};

/// Interleaved `f32` PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    sample_rate: u32,
    channels: u16,
    samples: Vec<f32>,
}

impl AudioTrack {
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> StillreelResult<Self> {
        if sample_rate == 0 {
            return Err(StillreelError::invalid_job("audio sample_rate must be > 0"));
        }
        if channels == 0 {
            return Err(StillreelError::invalid_job("audio channels must be > 0"));
        }
        if !samples.len().is_multiple_of(usize::from(channels)) {
            return Err(StillreelError::invalid_job(
                "audio sample count is not a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            samples,
        })
    }

    /// Zero-length track.
    pub fn silent(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            samples: Vec::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// What to do when the audio ends before the video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortAudioPolicy {
    /// Play the track once; the rest of the video is silent.
    #[default]
    Silence,
    /// Repeat the track until it covers the video.
    Loop,
    /// Fail the job.
    Reject,
}

/// Fit `track` to exactly `target_secs` and apply linear fades of `fade_secs` at the head and at
/// the tail of the audible part.
///
/// The result always spans the full target: longer tracks are cut, shorter ones are handled
/// according to `policy` (padding with silence, or looping). The input is left untouched.
pub fn synchronize(
    track: &AudioTrack,
    target_secs: f64,
    fade_secs: f64,
    policy: ShortAudioPolicy,
) -> StillreelResult<AudioTrack> {
    if !target_secs.is_finite() || target_secs <= 0.0 {
        return Err(StillreelError::invalid_job(format!(
            "audio target duration must be > 0 seconds (got {target_secs})"
        )));
    }
    if !fade_secs.is_finite() || fade_secs < 0.0 {
        return Err(StillreelError::invalid_job(format!(
            "audio fade must be >= 0 seconds (got {fade_secs})"
        )));
    }

    let ch = usize::from(track.channels);
    let target_frames = (target_secs * f64::from(track.sample_rate)).round() as usize;
    let src_frames = track.frames();

    let (mut samples, audible_frames) = if src_frames >= target_frames {
        (track.samples[..target_frames * ch].to_vec(), target_frames)
    } else {
        match policy {
            ShortAudioPolicy::Silence => {
                let mut out = track.samples.clone();
                out.resize(target_frames * ch, 0.0);
                (out, src_frames)
            }
            ShortAudioPolicy::Loop if src_frames > 0 => {
                let out: Vec<f32> = track
                    .samples
                    .iter()
                    .copied()
                    .cycle()
                    .take(target_frames * ch)
                    .collect();
                (out, target_frames)
            }
            ShortAudioPolicy::Loop => (vec![0.0; target_frames * ch], 0),
            ShortAudioPolicy::Reject => {
                return Err(StillreelError::invalid_job(format!(
                    "audio track is {:.3}s but the video is {:.3}s",
                    track.duration_secs(),
                    target_secs
                )));
            }
        }
    };

    apply_fades(
        &mut samples[..audible_frames * ch],
        ch,
        track.sample_rate,
        fade_secs,
    );

    AudioTrack::new(track.sample_rate, track.channels, samples)
}

fn apply_fades(samples: &mut [f32], channels: usize, sample_rate: u32, fade_secs: f64) {
    if fade_secs <= 0.0 || samples.is_empty() {
        return;
    }
    let frames = samples.len() / channels;
    let len_sec = frames as f64 / f64::from(sample_rate);
    for (i, frame) in samples.chunks_exact_mut(channels).enumerate() {
        let rel_sec = i as f64 / f64::from(sample_rate);
        let gain = fade_gain(rel_sec, len_sec, fade_secs);
        if gain < 1.0 {
            for s in frame {
                *s *= gain;
            }
        }
    }
}

fn fade_gain(rel_sec: f64, len_sec: f64, fade_secs: f64) -> f32 {
    let fade_in = (rel_sec / fade_secs).clamp(0.0, 1.0);
    // Measured to the end of the last sample frame so the final frame is not forced to zero.
    let rem = (len_sec - rel_sec).max(0.0);
    let fade_out = (rem / fade_secs).clamp(0.0, 1.0);
    (fade_in * fade_out) as f32
}

/// Write interleaved samples as raw little-endian `f32` (the encoder's audio input format).
pub fn write_f32le_file(track: &AudioTrack, out_path: &Path) -> StillreelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            StillreelError::encode(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(track.samples.len() * 4);
    for &sample in &track.samples {
        bytes.extend_from_slice(&sample.clamp(-1.0, 1.0).to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        StillreelError::encode(format!(
            "failed to write audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/sync.rs"]
mod tests;
