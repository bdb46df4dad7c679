//! A Rust library for joining regional metric tables onto U.S. Census CBSA
//! geometries, with mainland filtering, topology-preserving simplification,
//! and first-class join diagnostics.
//!
//! The pipeline is a single synchronous batch pass: load two geometry
//! sources, filter to the mainland by representative point, reproject,
//! simplify, and left-join a caller-supplied metric table on a normalized
//! region code. Rendering is out of scope; the output is an in-memory value
//! for a presentation collaborator.

pub mod config;
pub mod crs;
pub mod error;
pub mod filter;
pub mod join;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod simplify;
pub mod table;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{BoundSet, MissingFill, PipelineConfig, ReaderOptions};
pub use error::{GeoJoinError, Result};
pub use models::{JoinedRegion, MetricRecord, RegionCollection, RegionGeometry};
pub use pipeline::{GeoJoinPipeline, PipelineOutput};

// Coordinate systems
pub use crs::{AlbersConus, Crs, reproject_collection};

// Filtering and simplification
pub use filter::{BoundRect, DesignationFilter, MainlandFilter, RegionFilter};
pub use simplify::simplify_collection;

// Joining
pub use join::{JoinOptions, JoinStats, MetricSummary, left_join, normalize_code};
pub use table::MetricTable;

// Geometry source loading
pub use reader::{read_region_file, read_regions};
