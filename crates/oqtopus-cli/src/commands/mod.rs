//! CLI command implementations.

pub mod common;
pub mod devices;
pub mod estimate;
pub mod jobs;
pub mod result;
pub mod sample;
