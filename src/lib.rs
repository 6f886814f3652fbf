//! Stillreel turns an ordered list of still images, plus an optional soundtrack, into a slideshow
//! video.
//!
//! Every image becomes one fixed-length clip: the image fitted inside the output canvas over a
//! blurred, stretched copy of itself, faded in from and out to black. Clips play back to back in
//! input order. [`VideoMode::Shorts`] produces a vertical video capped at one minute.
//!
//! - Describe a job with [`JobConfig`]
//! - Run it with [`run_job`], passing a [`TimelineEncoder`] such as
//!   `SinkEncoder<FfmpegSink>`
//! - Observe progress through a [`ProgressObserver`] and stop early with a [`CancelToken`]
//!
//! Images that fail to decode are skipped and listed in the [`JobReport`]; the job fails only when
//! nothing is left to show.
#![forbid(unsafe_code)]

pub mod assets;
pub mod audio;
pub mod compose;
pub mod effects;
pub mod encode;
pub mod foundation;
pub mod job;
pub mod timeline;

pub use crate::foundation::core::{Canvas, Fps, SHORTS_MAX_DURATION_SECS, VideoMode};
pub use crate::foundation::error::{StillreelError, StillreelResult};

pub use crate::assets::decode::{SourceImage, decode_image, decode_image_file};
pub use crate::audio::sync::{AudioTrack, ShortAudioPolicy, synchronize};
pub use crate::compose::frame::{ComposeOpts, Frame, Placement, compose_frame, compose_image_file};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::timeline::{SinkEncoder, TimelineEncoder};
pub use crate::job::cancel::CancelToken;
pub use crate::job::config::JobConfig;
pub use crate::job::orchestrator::{
    AudioSummary, ClipSummary, JobReport, SkippedImage, compose_all, run_job, run_job_with_audio,
};
pub use crate::job::progress::{ProgressObserver, ProgressUpdate};
pub use crate::timeline::assemble::Timeline;
pub use crate::timeline::clip::{Clip, ClipBuilder};
