//! Job configuration and end-to-end orchestration.

pub mod cancel;
pub mod config;
pub mod orchestrator;
pub mod progress;
