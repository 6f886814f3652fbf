//! Encoding sinks.
//!
//! A [`timeline::TimelineEncoder`] turns an assembled timeline into an output file. The bundled
//! [`timeline::SinkEncoder`] rasterizes frames in order into any [`sink::FrameSink`].

/// `ffmpeg`-based sinks (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
/// Timeline rasterization into a frame sink.
pub mod timeline;
