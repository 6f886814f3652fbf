//! Per-image frame composition: blurred background fill plus centered foreground.

pub mod frame;
