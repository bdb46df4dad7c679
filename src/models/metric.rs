//! Metric record entity

use serde::{Deserialize, Serialize};

/// One row of the caller-supplied metric table
///
/// The value is semantically a fraction in [0, 1] (a population share), but
/// nothing rejects values outside that range; see
/// `PipelineConfig::validate_metric_range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Region code as supplied, unnormalized
    pub code: String,
    /// Numeric metric value
    pub value: f64,
}

impl MetricRecord {
    /// Create a record from parts
    #[must_use]
    pub fn new(code: impl Into<String>, value: f64) -> Self {
        Self {
            code: code.into(),
            value,
        }
    }
}
