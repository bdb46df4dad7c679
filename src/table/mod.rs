//! Metric table assembly
//!
//! The metric table is supplied by the caller, never loaded from a fixed
//! path. Constructors accept plain records, Arrow record batches, or parquet
//! files; the batch path projects down to the two needed columns and casts
//! the value column to Float64 when the file stores another numeric type.

use std::fs;
use std::path::{Path, PathBuf};

use arrow::array::{Array, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use rayon::prelude::*;

use crate::error::{GeoJoinError, Result, open_file};
use crate::models::MetricRecord;
use crate::utils::{log_stage_complete, log_stage_start, log_warning};

/// The caller-supplied metric table
#[derive(Debug, Clone, Default)]
pub struct MetricTable {
    records: Vec<MetricRecord>,
}

impl MetricTable {
    /// Build a table from ready-made records
    #[must_use]
    pub fn from_records(records: Vec<MetricRecord>) -> Self {
        Self { records }
    }

    /// Build a table from (code, value) pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            records: pairs
                .into_iter()
                .map(|(code, value)| MetricRecord::new(code, value))
                .collect(),
        }
    }

    /// Extract a table from Arrow record batches
    ///
    /// The code column must be readable as strings and the value column as
    /// Float64; other numeric value types are cast. Rows with a null code or
    /// null value are skipped and counted in a warning.
    ///
    /// # Errors
    /// Returns an error if either column is absent or cannot be converted.
    pub fn from_batches(
        batches: &[RecordBatch],
        code_column: &str,
        value_column: &str,
    ) -> Result<Self> {
        let mut records = Vec::new();
        let mut skipped_nulls = 0usize;

        for batch in batches {
            let codes = string_column(batch, code_column)?;
            let values = float_column(batch, value_column)?;

            for row in 0..batch.num_rows() {
                if codes.is_null(row) || values.is_null(row) {
                    skipped_nulls += 1;
                    continue;
                }
                let code = codes.value(row).trim();
                if code.is_empty() {
                    skipped_nulls += 1;
                    continue;
                }
                records.push(MetricRecord::new(code, values.value(row)));
            }
        }

        if skipped_nulls > 0 {
            log_warning(
                &format!("skipped {skipped_nulls} rows with null or empty code/value"),
                Some("metric table"),
            );
        }

        Ok(Self { records })
    }

    /// Read a metric table from one parquet file
    ///
    /// Only the two needed columns are read, via a projection mask.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or a column is missing.
    pub fn from_parquet(path: &Path, code_column: &str, value_column: &str) -> Result<Self> {
        log_stage_start("load", &format!("metric table from {}", path.display()));
        let batches = read_parquet_columns(path, &[code_column, value_column])?;
        let table = Self::from_batches(&batches, code_column, value_column)?;
        log_stage_complete("load", table.len(), table.len());
        Ok(table)
    }

    /// Read and concatenate every `*.parquet` file in a directory
    ///
    /// Files are read in parallel; record order follows the sorted file
    /// order, so repeated runs produce the same table.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read, any file fails to
    /// parse, or a column is missing from any file.
    pub fn from_parquet_dir(dir: &Path, code_column: &str, value_column: &str) -> Result<Self> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|source| GeoJoinError::Io {
                path: dir.to_path_buf(),
                purpose: "listing metric parquet files".to_string(),
                source,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file() && path.extension().is_some_and(|ext| ext == "parquet")
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(GeoJoinError::Table(format!(
                "no parquet files found in {}",
                dir.display()
            )));
        }

        let tables: Vec<Result<Self>> = files
            .par_iter()
            .map(|path| Self::from_parquet(path, code_column, value_column))
            .collect();

        let mut records = Vec::new();
        for table in tables {
            records.extend(table?.records);
        }
        Ok(Self { records })
    }

    /// Number of records in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records in table order
    #[must_use]
    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    /// Count values outside the semantic [0, 1] range
    ///
    /// The pipeline never rejects out-of-range values; this count feeds an
    /// opt-in warning.
    #[must_use]
    pub fn count_out_of_range(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !(0.0..=1.0).contains(&r.value) || r.value.is_nan())
            .count()
    }
}

/// Materialize a string view of a column
fn string_column(batch: &RecordBatch, column: &str) -> Result<StringArray> {
    let index =
        batch
            .schema()
            .index_of(column)
            .map_err(|_| GeoJoinError::MissingColumn {
                column: column.to_string(),
            })?;
    let array = batch.column(index);

    let utf8 = if array.data_type() == &DataType::Utf8 {
        array.clone()
    } else {
        cast(array, &DataType::Utf8).map_err(|_| GeoJoinError::ColumnType {
            column: column.to_string(),
            expected: "string".to_string(),
        })?
    };

    utf8.as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| GeoJoinError::ColumnType {
            column: column.to_string(),
            expected: "string".to_string(),
        })
}

/// Materialize a Float64 view of a column, casting other numeric types
fn float_column(batch: &RecordBatch, column: &str) -> Result<Float64Array> {
    let index =
        batch
            .schema()
            .index_of(column)
            .map_err(|_| GeoJoinError::MissingColumn {
                column: column.to_string(),
            })?;
    let array = batch.column(index);

    let float = if array.data_type() == &DataType::Float64 {
        array.clone()
    } else {
        cast(array, &DataType::Float64).map_err(|_| GeoJoinError::ColumnType {
            column: column.to_string(),
            expected: "numeric".to_string(),
        })?
    };

    float
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| GeoJoinError::ColumnType {
            column: column.to_string(),
            expected: "numeric".to_string(),
        })
}

/// Read a parquet file restricted to the named columns
fn read_parquet_columns(path: &Path, columns: &[&str]) -> Result<Vec<RecordBatch>> {
    use parquet::arrow::ProjectionMask;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    let file = open_file(path, "reading metric parquet")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let file_schema = builder.schema().clone();
    let mut projection = Vec::with_capacity(columns.len());
    for column in columns {
        let index = file_schema
            .index_of(column)
            .map_err(|_| GeoJoinError::MissingColumn {
                column: (*column).to_string(),
            })?;
        projection.push(index);
    }

    let mask = ProjectionMask::leaves(builder.parquet_schema(), projection);
    let reader = builder.with_projection(mask).build()?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    Ok(batches)
}
