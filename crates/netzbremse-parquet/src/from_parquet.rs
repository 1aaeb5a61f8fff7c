// Dweve Netzbremse - Speedtest Result Pipeline
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parquet bytes → sourced measurements.
//!
//! Every structural problem becomes a [`CacheError`]. The store above this
//! module turns any error into a cache miss, so the reader is strict: a
//! snapshot is either fully valid or rejected as a whole.

use arrow::array::{Array, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::record_batch::RecordBatch;
use chrono::DateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::metadata::FileMetaData;

use netzbremse_core::{Measurement, Metric, SourcedMeasurement};

use crate::error::{CacheError, Result};
use crate::to_parquet::{
    COL_ENDPOINT, COL_SESSION_ID, COL_SOURCE_FILE, COL_TIMESTAMP, SCHEMA_VERSION,
    SCHEMA_VERSION_KEY,
};

/// Maximum decompressed data size in bytes.
///
/// A snapshot holds a few hundred bytes per record, so this allows for well
/// over a hundred thousand measurements while rejecting decompression bombs.
const MAX_DECOMPRESSED_SIZE: usize = 256 * 1024 * 1024;

/// Deserialize records from Parquet bytes.
///
/// Records come back in file order.
pub fn from_parquet_bytes(bytes: &[u8]) -> Result<Vec<SourcedMeasurement>> {
    // bytes::Bytes implements ChunkReader
    let data = bytes::Bytes::copy_from_slice(bytes);

    let builder = ParquetRecordBatchReaderBuilder::try_new(data)?;
    check_schema_version(builder.metadata().file_metadata())?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    let mut total_bytes = 0usize;
    for batch in reader {
        let batch = batch?;

        total_bytes = total_bytes.saturating_add(estimate_batch_size(&batch));
        if total_bytes > MAX_DECOMPRESSED_SIZE {
            return Err(CacheError::SizeLimit {
                limit: MAX_DECOMPRESSED_SIZE,
                actual: total_bytes,
            });
        }

        read_batch(&batch, &mut records)?;
    }

    Ok(records)
}

fn check_schema_version(file_metadata: &FileMetaData) -> Result<()> {
    let found = file_metadata
        .key_value_metadata()
        .and_then(|kvs| kvs.iter().find(|kv| kv.key == SCHEMA_VERSION_KEY))
        .and_then(|kv| kv.value.clone());

    match found {
        Some(v) if v == SCHEMA_VERSION => Ok(()),
        other => Err(CacheError::VersionMismatch {
            found: other.unwrap_or_else(|| "none".to_string()),
            expected: SCHEMA_VERSION.to_string(),
        }),
    }
}

fn estimate_batch_size(batch: &RecordBatch) -> usize {
    batch
        .columns()
        .iter()
        .map(|column| column.get_array_memory_size())
        .sum()
}

/// Downcast a named column, or `None` if the column does not exist.
fn optional_column<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    name: &str,
    expected: &str,
) -> Result<Option<&'a T>> {
    match batch.column_by_name(name) {
        None => Ok(None),
        Some(column) => column
            .as_any()
            .downcast_ref::<T>()
            .map(Some)
            .ok_or_else(|| {
                CacheError::schema(name, format!("expected {}, found {}", expected, column.data_type()))
            }),
    }
}

fn required_column<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    name: &str,
    expected: &str,
) -> Result<&'a T> {
    optional_column::<T>(batch, name, expected)?
        .ok_or_else(|| CacheError::schema(name, "missing required column"))
}

fn read_batch(batch: &RecordBatch, out: &mut Vec<SourcedMeasurement>) -> Result<()> {
    let timestamps: &TimestampMillisecondArray =
        required_column(batch, COL_TIMESTAMP, "Timestamp(Millisecond)")?;
    let sources: &StringArray = required_column(batch, COL_SOURCE_FILE, "Utf8")?;
    let sessions: Option<&StringArray> = optional_column(batch, COL_SESSION_ID, "Utf8")?;
    let endpoints: Option<&StringArray> = optional_column(batch, COL_ENDPOINT, "Utf8")?;

    let mut metric_columns: Vec<(Metric, &Float64Array)> = Vec::with_capacity(Metric::COUNT);
    for metric in Metric::ALL {
        if let Some(column) = optional_column::<Float64Array>(batch, metric.key(), "Float64")? {
            metric_columns.push((metric, column));
        }
    }

    out.reserve(batch.num_rows());
    for row in 0..batch.num_rows() {
        if timestamps.is_null(row) || sources.is_null(row) {
            return Err(CacheError::Corrupt(format!(
                "null timestamp or source_file in row {}",
                row
            )));
        }
        let millis = timestamps.value(row);
        let timestamp = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            CacheError::Corrupt(format!("timestamp {} out of range in row {}", millis, row))
        })?;

        let mut measurement = Measurement::new(timestamp);
        measurement.session_id = string_at(sessions, row);
        measurement.endpoint = string_at(endpoints, row);
        for (metric, column) in &metric_columns {
            if !column.is_null(row) {
                measurement.metrics.set(*metric, Some(column.value(row)));
            }
        }

        out.push(SourcedMeasurement::new(sources.value(row), measurement));
    }

    Ok(())
}

fn string_at(column: Option<&StringArray>, row: usize) -> Option<String> {
    column
        .filter(|c| !c.is_null(row))
        .map(|c| c.value(row).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
    use chrono::{TimeZone, Utc};
    use parquet::arrow::ArrowWriter;
    use parquet::file::metadata::KeyValue;
    use parquet::file::properties::WriterProperties;

    use crate::to_parquet::to_parquet_bytes;

    fn write_batch(batch: RecordBatch, version: Option<&str>) -> Vec<u8> {
        let mut buffer = Vec::new();
        let metadata = version.map(|v| vec![KeyValue::new(SCHEMA_VERSION_KEY.to_string(), v.to_string())]);
        let props = WriterProperties::builder().set_key_value_metadata(metadata).build();
        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(props)).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        buffer
    }

    /// A snapshot from before the loaded-latency columns existed.
    fn narrow_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new(
                COL_TIMESTAMP,
                DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
                false,
            ),
            Field::new(COL_SOURCE_FILE, DataType::Utf8, false),
            Field::new("download", DataType::Float64, true),
        ]));
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap().timestamp_millis();
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(TimestampMillisecondArray::from(vec![ts]).with_timezone("UTC")),
                Arc::new(StringArray::from(vec!["speedtest-2024-01-15T10-30-00-000Z.json"])),
                Arc::new(Float64Array::from(vec![Some(120.0)])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_missing_metric_columns_read_as_absent() {
        let bytes = write_batch(narrow_batch(), Some(SCHEMA_VERSION));
        let records = from_parquet_bytes(&bytes).unwrap();
        assert_eq!(records.len(), 1);
        let m = &records[0].measurement;
        assert_eq!(m.get(Metric::Download), Some(120.0));
        assert_eq!(m.get(Metric::UpLoadedJitter), None);
        assert_eq!(m.session_id, None);
    }

    #[test]
    fn test_version_mismatch() {
        let bytes = write_batch(narrow_batch(), Some("0"));
        assert!(matches!(
            from_parquet_bytes(&bytes),
            Err(CacheError::VersionMismatch { ref found, .. }) if found == "0"
        ));

        let bytes = write_batch(narrow_batch(), None);
        assert!(matches!(
            from_parquet_bytes(&bytes),
            Err(CacheError::VersionMismatch { ref found, .. }) if found == "none"
        ));
    }

    #[test]
    fn test_missing_source_column_is_schema_error() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            COL_TIMESTAMP,
            DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
            false,
        )]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(TimestampMillisecondArray::from(vec![0i64]).with_timezone("UTC"))],
        )
        .unwrap();
        let bytes = write_batch(batch, Some(SCHEMA_VERSION));
        assert!(matches!(
            from_parquet_bytes(&bytes),
            Err(CacheError::Schema { ref column, .. }) if column == COL_SOURCE_FILE
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(from_parquet_bytes(b"not a parquet file").is_err());
        assert!(from_parquet_bytes(&[]).is_err());
    }

    #[test]
    fn test_truncated_snapshot_is_rejected() {
        let bytes = write_batch(narrow_batch(), Some(SCHEMA_VERSION));
        assert!(from_parquet_bytes(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn test_empty_snapshot_reads_empty() {
        let bytes = to_parquet_bytes(&[]).unwrap();
        assert!(from_parquet_bytes(&bytes).unwrap().is_empty());
    }
}
