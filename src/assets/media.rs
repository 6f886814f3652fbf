use std::path::Path;

use crate::audio::sync::AudioTrack;
use crate::foundation::error::{StillreelError, StillreelResult};

/// Sample rate used for decoded audio and for the encoder's raw PCM input.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Decode an audio file to stereo interleaved `f32` PCM through the system `ffmpeg`.
///
/// A file without any audio stream decodes to an empty track.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> StillreelResult<AudioTrack> {
    if sample_rate == 0 {
        return Err(StillreelError::invalid_job("audio sample_rate must be > 0"));
    }
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            StillreelError::invalid_job(format!(
                "failed to run ffmpeg for audio decode of '{}': {e}",
                path.display()
            ))
        })?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        if msg.contains("Stream specifier")
            || msg.contains("matches no streams")
            || msg.contains("Output file #0 does not contain any stream")
        {
            return Ok(AudioTrack::silent(sample_rate, 2));
        }
        return Err(StillreelError::invalid_job(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    let samples = f32le_to_samples(&out.stdout)?;
    AudioTrack::new(sample_rate, 2, samples)
}

fn f32le_to_samples(bytes: &[u8]) -> StillreelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(StillreelError::invalid_job(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
