//! CLI library components for the batch job converter.

pub mod config;
pub mod logging;
pub mod pipeline;
