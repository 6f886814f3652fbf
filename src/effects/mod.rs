/// Separable Gaussian blur on packed 8-bit pixels.
pub mod blur;
