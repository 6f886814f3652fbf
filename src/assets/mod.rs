//! Source image decoding and soundtrack loading.

/// Still image decoding into RGB8.
pub mod decode;
/// Audio decoding through the system `ffmpeg`.
pub mod media;
