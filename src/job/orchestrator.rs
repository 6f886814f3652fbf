use std::path::{Path, PathBuf};
use std::sync::mpsc;

use rayon::prelude::*;

use crate::assets::media::{MIX_SAMPLE_RATE, decode_audio_f32_stereo};
use crate::audio::sync::{AudioTrack, ShortAudioPolicy, synchronize};
use crate::compose::frame::{ComposeOpts, Frame, compose_image_file};
use crate::encode::timeline::TimelineEncoder;
use crate::foundation::core::{Canvas, VideoMode};
use crate::foundation::error::{StillreelError, StillreelResult};
use crate::job::cancel::CancelToken;
use crate::job::config::JobConfig;
use crate::job::progress::{ProgressObserver, ProgressUpdate};
use crate::timeline::assemble::Timeline;
use crate::timeline::clip::ClipBuilder;

/// One clip that made it into the video.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ClipSummary {
    /// Position of the image in the job's input list.
    pub source_index: usize,
    pub path: PathBuf,
    pub start_secs: f64,
    pub duration_secs: f64,
}

/// An image that failed to decode and was left out.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SkippedImage {
    pub index: usize,
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AudioSummary {
    /// Length of the soundtrack before synchronization.
    pub source_secs: f64,
    /// Length after synchronization; equals the video duration.
    pub synced_secs: f64,
}

/// What a finished job produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct JobReport {
    pub mode: VideoMode,
    pub canvas: Canvas,
    /// Clips in playback order.
    pub clips: Vec<ClipSummary>,
    /// Images that failed to decode, in input order.
    pub skipped: Vec<SkippedImage>,
    /// Decoded images left out by the duration cap, in input order.
    pub dropped: Vec<PathBuf>,
    pub duration_secs: f64,
    pub audio: Option<AudioSummary>,
}

struct TaskDone {
    index: usize,
    /// `None` when the task observed cancellation before starting.
    frame: Option<StillreelResult<Frame>>,
}

/// Compose every image in `paths` on a worker pool of `threads` threads.
///
/// The returned vector is index-aligned with `paths` regardless of completion order. Per-image
/// failures are returned in their slot; the call itself only fails on cancellation or when the
/// pool cannot be built. `progress` is driven from a single aggregator thread, one update per
/// attempted image.
#[tracing::instrument(level = "info", skip_all, fields(images = paths.len()))]
pub fn compose_all(
    paths: &[PathBuf],
    canvas: Canvas,
    opts: &ComposeOpts,
    threads: Option<usize>,
    cancel: &CancelToken,
    progress: &mut dyn ProgressObserver,
) -> StillreelResult<Vec<StillreelResult<Frame>>> {
    let pool = build_thread_pool(threads)?;
    let total = paths.len();
    let mut slots: Vec<Option<StillreelResult<Frame>>> = (0..total).map(|_| None).collect();

    std::thread::scope(|scope| {
        let (done_tx, done_rx) = mpsc::channel::<TaskDone>();
        let (tick_tx, tick_rx) = mpsc::channel::<usize>();

        let reporter = scope.spawn(move || {
            let mut completed = 0usize;
            for _index in tick_rx {
                completed += 1;
                progress.on_progress(ProgressUpdate { completed, total });
            }
        });

        pool.install(|| {
            paths.par_iter().enumerate().for_each_with(
                (done_tx, tick_tx),
                |(done_tx, tick_tx), (index, path)| {
                    let frame = (!cancel.is_cancelled())
                        .then(|| compose_image_file(path, canvas, opts));
                    // Receivers outlive every worker inside this scope.
                    let _ = done_tx.send(TaskDone { index, frame });
                    let _ = tick_tx.send(index);
                },
            );
        });

        for done in done_rx {
            slots[done.index] = done.frame;
        }
        let _ = reporter.join();
    });

    cancel.checkpoint("compose")?;

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                StillreelError::Other(anyhow::anyhow!("image {index} produced no result"))
            })
        })
        .collect()
}

/// Run a job end to end, decoding the soundtrack named in `cfg` (if any) first.
pub fn run_job(
    cfg: &JobConfig,
    encoder: &mut dyn TimelineEncoder,
    progress: &mut dyn ProgressObserver,
    cancel: &CancelToken,
) -> StillreelResult<JobReport> {
    cfg.validate()?;
    let audio = match &cfg.audio {
        Some(path) => Some(load_audio(path)?),
        None => None,
    };
    run_job_with_audio(cfg, audio, encoder, progress, cancel)
}

/// Run a job with an already decoded soundtrack; `cfg.audio` is ignored.
///
/// Stages: validate, compose in parallel, assemble in input order under the mode's duration cap,
/// synchronize audio to the final duration, encode.
#[tracing::instrument(level = "info", skip_all, fields(mode = %cfg.mode, images = cfg.images.len()))]
pub fn run_job_with_audio(
    cfg: &JobConfig,
    audio: Option<AudioTrack>,
    encoder: &mut dyn TimelineEncoder,
    progress: &mut dyn ProgressObserver,
    cancel: &CancelToken,
) -> StillreelResult<JobReport> {
    cfg.validate()?;
    cancel.checkpoint("start")?;

    let canvas = cfg.canvas();
    let attempted = cfg.images.len();
    let builder = ClipBuilder::new(cfg.per_image_secs, cfg.fade_secs)?;

    let composed = compose_all(
        &cfg.images,
        canvas,
        &ComposeOpts::default(),
        cfg.threads,
        cancel,
        progress,
    )?;

    let mut clips = Vec::with_capacity(attempted);
    let mut skipped = Vec::new();
    for (index, res) in composed.into_iter().enumerate() {
        match res {
            Ok(frame) => clips.push(builder.build(index, frame)?),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(index, error = %e, "skipping image");
                skipped.push(SkippedImage {
                    index,
                    path: cfg.images[index].clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }
    let decoded = clips.len();

    cancel.checkpoint("assemble")?;
    if clips.is_empty() {
        return Err(StillreelError::EmptyTimeline { attempted, decoded });
    }
    let assembly =
        Timeline::assemble(clips, cfg.mode.max_duration_secs()).map_err(|e| match e {
            StillreelError::EmptyTimeline { .. } => {
                StillreelError::EmptyTimeline { attempted, decoded }
            }
            other => other,
        })?;
    let timeline = assembly.timeline;
    if !assembly.dropped.is_empty() {
        tracing::info!(
            kept = timeline.len(),
            dropped = assembly.dropped.len(),
            "timeline capped"
        );
    }

    let synced = match audio {
        Some(track) if track.is_empty() && cfg.short_audio != ShortAudioPolicy::Reject => {
            tracing::warn!("soundtrack has no samples; encoding without audio");
            None
        }
        // An empty track under `Reject` is a short track like any other.
        Some(track) => {
            let synced = synchronize(
                &track,
                timeline.duration(),
                cfg.audio_fade_secs,
                cfg.short_audio,
            )?;
            Some((track.duration_secs(), synced))
        }
        None => None,
    };

    cancel.checkpoint("encode")?;
    encoder
        .encode(&timeline, synced.as_ref().map(|(_, t)| t))
        .map_err(into_encode_error)?;

    let clips = timeline
        .placed()
        .map(|p| ClipSummary {
            source_index: p.clip.source_index(),
            path: cfg.images[p.clip.source_index()].clone(),
            start_secs: p.start,
            duration_secs: p.clip.duration(),
        })
        .collect();
    let report = JobReport {
        mode: cfg.mode,
        canvas,
        clips,
        skipped,
        dropped: assembly
            .dropped
            .iter()
            .map(|&i| cfg.images[i].clone())
            .collect(),
        duration_secs: timeline.duration(),
        audio: synced.map(|(source_secs, t)| AudioSummary {
            source_secs,
            synced_secs: t.duration_secs(),
        }),
    };
    tracing::info!(
        clips = report.clips.len(),
        skipped = report.skipped.len(),
        duration_secs = report.duration_secs,
        "job finished"
    );
    Ok(report)
}

fn load_audio(path: &Path) -> StillreelResult<AudioTrack> {
    if !path.is_file() {
        return Err(StillreelError::invalid_job(format!(
            "audio file '{}' does not exist",
            path.display()
        )));
    }
    decode_audio_f32_stereo(path, MIX_SAMPLE_RATE)
}

fn into_encode_error(e: StillreelError) -> StillreelError {
    match e {
        StillreelError::Encode(_) | StillreelError::Cancelled { .. } => e,
        other => StillreelError::encode(other.to_string()),
    }
}

fn build_thread_pool(threads: Option<usize>) -> StillreelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StillreelError::invalid_job("threads must be >= 1 when set"));
    }
    let mut builder =
        rayon::ThreadPoolBuilder::new().thread_name(|i| format!("stillreel-compose-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../../tests/unit/job/orchestrator.rs"]
mod tests;
