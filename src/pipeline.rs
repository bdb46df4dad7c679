//! Pipeline orchestration
//!
//! One synchronous batch pass: load, classify, reproject, mainland-filter,
//! simplify, join. The metric table is an explicit parameter; nothing is
//! read from ambient state.

use std::path::Path;

use crate::config::{BoundSet, PipelineConfig};
use crate::crs::{Crs, reproject_collection};
use crate::error::{GeoJoinError, Result};
use crate::filter::{DesignationFilter, MainlandFilter, RegionFilter, retain_in_bounds};
use crate::join::{JoinOptions, JoinStats, left_join};
use crate::models::{JoinedRegion, RegionCollection};
use crate::reader::read_region_file;
use crate::simplify::simplify_collection;
use crate::table::MetricTable;
use crate::utils::{log_stage_complete, log_stage_start, log_warning};

/// The pipeline's result, ready for an external presentation layer
///
/// Geometries are always in `Crs::ConusAlbers`.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Region geometries with joined metric values
    pub regions: Vec<JoinedRegion>,
    /// Filtered and simplified enclosing-area boundaries
    pub boundaries: RegionCollection,
    /// Join diagnostics
    pub stats: JoinStats,
}

/// The geo-join pipeline
#[derive(Debug, Clone, Default)]
pub struct GeoJoinPipeline {
    config: PipelineConfig,
}

impl GeoJoinPipeline {
    /// Create a pipeline with the given configuration
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The pipeline's configuration
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load both geometry sources from GeoJSON files, then run
    ///
    /// # Errors
    /// Returns any load error, plus everything `run` can return.
    pub fn run_files(
        &self,
        region_path: &Path,
        boundary_path: &Path,
        table: &MetricTable,
    ) -> Result<PipelineOutput> {
        let regions = read_region_file(region_path, &self.config.region_reader)?;
        let boundaries = read_region_file(boundary_path, &self.config.boundary_reader)?;
        self.run(regions, boundaries, table)
    }

    /// Run the pipeline over in-memory collections
    ///
    /// # Errors
    /// Fails fast on empty inputs, a CRS mismatch, an emptied mainland
    /// filter (after the fallback retry), or a match rate below the
    /// configured threshold.
    pub fn run(
        &self,
        regions: RegionCollection,
        boundaries: RegionCollection,
        table: &MetricTable,
    ) -> Result<PipelineOutput> {
        if regions.is_empty() {
            return Err(GeoJoinError::EmptyCollection {
                name: self.config.region_reader.source_name.clone(),
            });
        }
        if boundaries.is_empty() {
            return Err(GeoJoinError::EmptyCollection {
                name: self.config.boundary_reader.source_name.clone(),
            });
        }

        let regions = self.apply_designation_filter(regions)?;

        // Filter in the bound set's CRS, then move to the output CRS.
        let filter_crs = match self.config.bound_set {
            BoundSet::Geographic => Crs::Wgs84,
            BoundSet::Projected => Crs::ConusAlbers,
        };
        let regions = reproject_collection(&regions, filter_crs);
        let boundaries = reproject_collection(&boundaries, filter_crs);

        let mainland = MainlandFilter::for_bound_set(self.config.bound_set);
        log_stage_start("mainland", &mainland.describe());
        let before = regions.len();
        let (regions, settled_bounds) = mainland.filter_with_outcome(&regions)?;
        log_stage_complete("mainland", regions.len(), before);

        // The boundary collection reuses whichever bounds the region pass
        // settled on. An emptied boundary collection is not fatal.
        let boundaries = retain_in_bounds(&boundaries, &settled_bounds)?;
        if boundaries.is_empty() {
            log_warning("no boundaries remain after mainland filter", Some("mainland"));
        }

        let regions = reproject_collection(&regions, Crs::ConusAlbers);
        let boundaries = reproject_collection(&boundaries, Crs::ConusAlbers);

        let regions = simplify_collection(&regions, self.config.region_tolerance);
        let boundaries = simplify_collection(&boundaries, self.config.boundary_tolerance);

        if self.config.validate_metric_range {
            let out_of_range = table.count_out_of_range();
            if out_of_range > 0 {
                log_warning(
                    &format!("{out_of_range} metric values outside [0, 1]"),
                    Some("metric table"),
                );
            }
        }

        let options = JoinOptions {
            code_width: self.config.code_width,
            missing_fill: self.config.missing_fill,
        };
        let (joined, stats) = left_join(&regions, table, &options);
        log::info!(
            "join: matched {} of {} regions ({:.1}%), {} table records",
            stats.matched,
            stats.total_regions,
            stats.match_rate(),
            stats.table_records
        );

        if let Some(threshold) = self.config.min_match_rate {
            crate::join::enforce_match_rate(&stats, threshold)?;
        }

        Ok(PipelineOutput {
            regions: joined,
            boundaries,
            stats,
        })
    }

    /// Apply the metro-only designation filter when configured and possible
    fn apply_designation_filter(&self, regions: RegionCollection) -> Result<RegionCollection> {
        if !self.config.metro_only {
            return Ok(regions);
        }
        if !regions.has_designations() {
            // The classification column is optional in the source data.
            log_warning(
                "no designation codes present, skipping metro-only filter",
                Some("designation"),
            );
            return Ok(regions);
        }

        let filter = DesignationFilter::new(self.config.metro_designation.clone());
        log_stage_start("designation", &filter.describe());
        let before = regions.len();
        let filtered = filter.filter(&regions)?;
        log_stage_complete("designation", filtered.len(), before);

        if filtered.is_empty() {
            return Err(GeoJoinError::EmptyAfterFilter {
                stage: "designation".to_string(),
            });
        }
        Ok(filtered)
    }
}
