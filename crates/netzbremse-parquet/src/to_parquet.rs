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

//! Sourced measurements → Parquet bytes.
//!
//! One row per record. Column layout:
//!
//! | Column | Arrow type | Nullable |
//! |--------|-----------|----------|
//! | `timestamp` | `Timestamp(Millisecond, "UTC")` | no |
//! | `source_file` | `Utf8` | no |
//! | `sessionID` | `Utf8` | yes |
//! | `endpoint` | `Utf8` | yes |
//! | one per metric, named by its JSON key | `Float64` | yes |
//!
//! The file's key-value metadata carries [`SCHEMA_VERSION_KEY`]. Metric
//! columns may only ever be appended; readers treat a missing metric column
//! as all-absent.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::{WriterProperties, WriterVersion};

use netzbremse_core::{Metric, SourcedMeasurement};

use crate::error::Result;

/// Metadata key holding the snapshot layout version.
pub const SCHEMA_VERSION_KEY: &str = "netzbremse:schema_version";

/// Layout version written by this build.
pub const SCHEMA_VERSION: &str = "1";

pub(crate) const COL_TIMESTAMP: &str = "timestamp";
pub(crate) const COL_SOURCE_FILE: &str = "source_file";
pub(crate) const COL_SESSION_ID: &str = "sessionID";
pub(crate) const COL_ENDPOINT: &str = "endpoint";

/// Configuration for Parquet writing.
#[derive(Debug, Clone)]
pub struct ToParquetConfig {
    /// Compression algorithm to use.
    pub compression: Compression,
    /// Writer version.
    pub writer_version: WriterVersion,
}

impl Default for ToParquetConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            writer_version: WriterVersion::PARQUET_2_0,
        }
    }
}

/// The Arrow schema of a snapshot.
pub fn snapshot_schema() -> Arc<Schema> {
    let mut fields = vec![
        Field::new(
            COL_TIMESTAMP,
            DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
            false,
        ),
        Field::new(COL_SOURCE_FILE, DataType::Utf8, false),
        Field::new(COL_SESSION_ID, DataType::Utf8, true),
        Field::new(COL_ENDPOINT, DataType::Utf8, true),
    ];
    fields.extend(
        Metric::ALL
            .iter()
            .map(|m| Field::new(m.key(), DataType::Float64, true)),
    );
    Arc::new(Schema::new(fields))
}

/// Serialize records to Parquet bytes with the default configuration.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use netzbremse_core::{Measurement, Metric, SourcedMeasurement};
/// use netzbremse_parquet::{from_parquet_bytes, to_parquet_bytes};
///
/// let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// let record = SourcedMeasurement::new(
///     "speedtest-2024-01-15T10-30-00-000Z.json",
///     Measurement::new(ts).with_metric(Metric::Download, 250.0),
/// );
///
/// let bytes = to_parquet_bytes(&[record.clone()]).unwrap();
/// assert_eq!(from_parquet_bytes(&bytes).unwrap(), vec![record]);
/// ```
pub fn to_parquet_bytes(records: &[SourcedMeasurement]) -> Result<Vec<u8>> {
    to_parquet_bytes_with_config(records, &ToParquetConfig::default())
}

/// Serialize records to Parquet bytes with custom configuration.
pub fn to_parquet_bytes_with_config(
    records: &[SourcedMeasurement],
    config: &ToParquetConfig,
) -> Result<Vec<u8>> {
    // Footer plus schema metadata alone is a few KB
    let mut buffer = Vec::with_capacity(16 * 1024);

    let schema = snapshot_schema();
    let props = WriterProperties::builder()
        .set_compression(config.compression)
        .set_writer_version(config.writer_version)
        .set_key_value_metadata(Some(vec![KeyValue::new(
            SCHEMA_VERSION_KEY.to_string(),
            SCHEMA_VERSION.to_string(),
        )]))
        .build();

    let mut writer = ArrowWriter::try_new(&mut buffer, Arc::clone(&schema), Some(props))?;
    if !records.is_empty() {
        let batch = build_record_batch(records, &schema)?;
        writer.write(&batch)?;
    }
    writer.close()?;

    Ok(buffer)
}

fn build_record_batch(records: &[SourcedMeasurement], schema: &Arc<Schema>) -> Result<RecordBatch> {
    let timestamps: TimestampMillisecondArray = records
        .iter()
        .map(|r| Some(r.timestamp().timestamp_millis()))
        .collect::<TimestampMillisecondArray>()
        .with_timezone("UTC");
    let sources: StringArray = records.iter().map(|r| Some(r.source_file.as_str())).collect();
    let sessions: StringArray = records
        .iter()
        .map(|r| r.measurement.session_id.as_deref())
        .collect();
    let endpoints: StringArray = records
        .iter()
        .map(|r| r.measurement.endpoint.as_deref())
        .collect();

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(timestamps),
        Arc::new(sources),
        Arc::new(sessions),
        Arc::new(endpoints),
    ];
    for metric in Metric::ALL {
        let values: Float64Array = records.iter().map(|r| r.measurement.get(metric)).collect();
        columns.push(Arc::new(values));
    }

    Ok(RecordBatch::try_new(Arc::clone(schema), columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_layout() {
        let schema = snapshot_schema();
        assert_eq!(schema.fields().len(), 4 + Metric::COUNT);
        assert_eq!(schema.field(0).name(), COL_TIMESTAMP);
        assert!(!schema.field(1).is_nullable());
        assert_eq!(schema.field(4).name(), "download");
        assert_eq!(schema.field(11).name(), "upLoadedJitter");
    }

    #[test]
    fn test_empty_snapshot_is_valid_parquet() {
        let bytes = to_parquet_bytes(&[]).unwrap();
        assert!(bytes.starts_with(b"PAR1"));
        assert!(bytes.ends_with(b"PAR1"));
    }
}
