//! Normalized left join of metric records onto region geometries
//!
//! Region codes arrive with inconsistent zero-padding ("35620" next to
//! "035620") and occasionally as stringified floats ("35620.0"). Both sides
//! of the join are normalized to one canonical width before comparison;
//! skipping that step silently produces a fully-unmatched result, which is
//! why the join reports match statistics as a first-class output.

use std::cmp::Ordering;

use itertools::Itertools;
use itertools::MinMaxResult;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::config::MissingFill;
use crate::error::{GeoJoinError, Result};
use crate::models::{JoinedRegion, RegionCollection};
use crate::table::MetricTable;
use crate::utils::log_warning;

/// Normalize a region code to a canonical zero-padded width
///
/// Trims whitespace, strips a trailing `.0` float artifact, strips leading
/// zeros, then left-pads with zeros to `width`. `"035620"` and `"35620"`
/// both normalize to `"35620"` at width 5.
#[must_use]
pub fn normalize_code(raw: &str, width: usize) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    let stripped = trimmed.trim_start_matches('0');
    if stripped.is_empty() && !trimmed.is_empty() {
        // all-zero codes keep a single zero before padding
        return format!("{:0>width$}", "0");
    }
    format!("{stripped:0>width$}")
}

/// Options governing one join pass
#[derive(Debug, Clone)]
pub struct JoinOptions {
    /// Canonical zero-padded code width
    pub code_width: usize,
    /// Substitution for unmatched regions
    pub missing_fill: MissingFill,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            code_width: 5,
            missing_fill: MissingFill::Null,
        }
    }
}

/// Summary statistics over the matched metric values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Number of matched values
    pub count: usize,
    /// Smallest matched value
    pub min: f64,
    /// Largest matched value
    pub max: f64,
    /// Arithmetic mean of matched values
    pub mean: f64,
    /// Median of matched values
    pub median: f64,
}

/// First-class join diagnostics
///
/// A caller that sees `matched == 0` with a non-empty table is almost
/// certainly looking at the zero-padding hazard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinStats {
    /// Regions that entered the join
    pub total_regions: usize,
    /// Regions that found a metric record
    pub matched: usize,
    /// Regions with no metric record
    pub unmatched: usize,
    /// Metric records discarded because an earlier record had the same
    /// normalized code
    pub duplicate_metric_codes: usize,
    /// Records in the metric table
    pub table_records: usize,
    /// Distinct table codes that matched no region
    pub table_codes_unused: usize,
    /// Summary of matched values, absent when nothing matched
    pub summary: Option<MetricSummary>,
}

impl JoinStats {
    /// Percentage of regions that found a metric record
    #[must_use]
    pub fn match_rate(&self) -> f64 {
        if self.total_regions == 0 {
            0.0
        } else {
            100.0 * self.matched as f64 / self.total_regions as f64
        }
    }
}

/// Left-join a metric table onto a region collection
///
/// Every region appears in the output exactly once. Unmatched regions carry
/// `metric: None`, or the configured sentinel with `matched` still false.
/// Duplicate normalized codes in the table keep the first record and are
/// counted.
#[must_use]
pub fn left_join(
    collection: &RegionCollection,
    table: &MetricTable,
    options: &JoinOptions,
) -> (Vec<JoinedRegion>, JoinStats) {
    let mut index: FxHashMap<String, f64> = FxHashMap::default();
    let mut duplicates = 0usize;
    for record in table.records() {
        let key = normalize_code(&record.code, options.code_width);
        if index.contains_key(&key) {
            duplicates += 1;
        } else {
            index.insert(key, record.value);
        }
    }
    if duplicates > 0 {
        log_warning(
            &format!("{duplicates} metric records had duplicate codes; kept first occurrence"),
            Some("join"),
        );
    }

    let mut joined = Vec::with_capacity(collection.len());
    let mut matched_values = Vec::new();
    let mut used_keys: FxHashSet<&str> = FxHashSet::default();

    for region in &collection.regions {
        let key = normalize_code(&region.code, options.code_width);
        let metric = index.get_key_value(key.as_str());
        match metric {
            Some((stored_key, value)) => {
                matched_values.push(*value);
                used_keys.insert(stored_key.as_str());
                joined.push(JoinedRegion {
                    region: region.clone(),
                    metric: Some(*value),
                    matched: true,
                });
            }
            None => {
                let fill = match options.missing_fill {
                    MissingFill::Null => None,
                    MissingFill::Sentinel(value) => Some(value),
                };
                joined.push(JoinedRegion {
                    region: region.clone(),
                    metric: fill,
                    matched: false,
                });
            }
        }
    }

    let matched = matched_values.len();
    let stats = JoinStats {
        total_regions: collection.len(),
        matched,
        unmatched: collection.len() - matched,
        duplicate_metric_codes: duplicates,
        table_records: table.len(),
        table_codes_unused: index.len() - used_keys.len(),
        summary: summarize(&matched_values),
    };
    (joined, stats)
}

/// Reject a join whose match rate falls below a threshold
///
/// # Errors
/// Returns `LowMatchRate` when the rate (percent) is below `threshold`.
pub fn enforce_match_rate(stats: &JoinStats, threshold: f64) -> Result<()> {
    let rate = stats.match_rate();
    if rate < threshold {
        return Err(GeoJoinError::LowMatchRate {
            matched: stats.matched,
            total: stats.total_regions,
            rate,
            threshold,
        });
    }
    Ok(())
}

fn summarize(values: &[f64]) -> Option<MetricSummary> {
    let (min, max) = match values.iter().minmax() {
        MinMaxResult::NoElements => return None,
        MinMaxResult::OneElement(v) => (*v, *v),
        MinMaxResult::MinMax(min, max) => (*min, *max),
    };
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let sorted: Vec<f64> = values
        .iter()
        .copied()
        .sorted_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .collect();
    let median = if sorted.len() % 2 == 1 {
        sorted[sorted.len() / 2]
    } else {
        (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
    };
    Some(MetricSummary {
        count: values.len(),
        min,
        max,
        mean,
        median,
    })
}
