//! Shared utilities used across the pipeline stages.

mod buffer2;
pub(crate) mod parallel;

pub use buffer2::Buffer2;
