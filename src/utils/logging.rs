//! Logging utilities
//!
//! This module provides standardized logging functions for pipeline stages.

/// Log a stage start with consistent format
///
/// # Arguments
/// * `stage` - Name of the pipeline stage
/// * `detail` - What the stage is operating on
pub fn log_stage_start(stage: &str, detail: &str) {
    log::info!("{stage}: {detail}");
}

/// Log a stage completion with consistent format
///
/// # Arguments
/// * `stage` - Name of the pipeline stage
/// * `kept` - Number of items that survived the stage
/// * `total` - Number of items that entered the stage
pub fn log_stage_complete(stage: &str, kept: usize, total: usize) {
    if kept == total {
        log::info!("{stage}: {kept} items");
    } else {
        log::info!("{stage}: kept {kept} of {total} items");
    }
}

/// Log a warning with consistent format
///
/// # Arguments
/// * `message` - Warning message
/// * `context` - Optional source or stage the warning relates to
pub fn log_warning(message: &str, context: Option<&str>) {
    if let Some(context) = context {
        log::warn!("{context}: {message}");
    } else {
        log::warn!("{message}");
    }
}
