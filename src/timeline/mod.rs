//! Clips with fade envelopes and their concatenation into a timeline.

pub mod assemble;
pub mod clip;
