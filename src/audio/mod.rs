/// Fitting a soundtrack to the video length.
pub mod sync;
