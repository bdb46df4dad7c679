//! Error handling for the geo-join pipeline.

use std::io;
use std::path::PathBuf;

use crate::crs::Crs;

/// Specialized error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum GeoJoinError {
    /// Error opening or reading a file
    #[error("{purpose}: IO error for {}: {source}", .path.display())]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Why the file was being accessed
        purpose: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Error parsing GeoJSON input
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Error processing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A feature lacks a required property
    #[error("feature {index} is missing required property '{property}'")]
    MissingProperty {
        /// Name of the missing property
        property: String,
        /// Index of the offending feature in the source
        index: usize,
    },

    /// A required column is absent from the metric table
    #[error("column '{column}' not found in metric table")]
    MissingColumn {
        /// Name of the missing column
        column: String,
    },

    /// A column has an unusable data type
    #[error("column '{column}' cannot be read as {expected}")]
    ColumnType {
        /// Name of the offending column
        column: String,
        /// Type the pipeline needed
        expected: String,
    },

    /// A geometry source contained no usable areal features
    #[error("geometry source '{name}' contains no areal features")]
    EmptyCollection {
        /// Label of the offending source
        name: String,
    },

    /// Every geometry was rejected by a filter stage
    #[error("no geometries remain after {stage} filter")]
    EmptyAfterFilter {
        /// Which filter stage emptied the collection
        stage: String,
    },

    /// A collection and an operation disagree on coordinate system
    #[error("collection is in {found} but the operation expects {expected}")]
    CrsMismatch {
        /// CRS the operation expects
        expected: Crs,
        /// CRS the collection is actually in
        found: Crs,
    },

    /// The join matched too few regions to be trusted
    #[error(
        "join matched {matched} of {total} regions ({rate:.1}% < {threshold:.1}%); \
         check region-code normalization on both sides"
    )]
    LowMatchRate {
        /// Regions that found a metric record
        matched: usize,
        /// Total regions in the join
        total: usize,
        /// Match rate in percent
        rate: f64,
        /// Configured minimum in percent
        threshold: f64,
    },

    /// Error assembling the metric table
    #[error("metric table error: {0}")]
    Table(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, GeoJoinError>;

/// Safely open a file, tagging any failure with the path and purpose
pub fn open_file(path: &std::path::Path, purpose: &str) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|source| GeoJoinError::Io {
        path: path.to_path_buf(),
        purpose: purpose.to_string(),
        source,
    })
}
