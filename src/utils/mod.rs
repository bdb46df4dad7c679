//! Utility functions shared across pipeline stages

pub mod logging;

pub use logging::{log_stage_complete, log_stage_start, log_warning};
