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

//! Snapshot tests against records produced by the real parser.

use std::fs;

use netzbremse_core::{classify, sort_sourced, Metric, SourcedMeasurement};
use netzbremse_parquet::{from_parquet_bytes, to_parquet_bytes, CacheStore};
use netzbremse_test::fixtures::{self, FixtureDir, ResultFileBuilder};

fn parsed_fixture_records(count: usize) -> (FixtureDir, Vec<SourcedMeasurement>) {
    let dir = FixtureDir::new();
    let mut records = Vec::new();
    for (i, ts) in fixtures::timestamps(count, 10).into_iter().enumerate() {
        let content = if i % 3 == 0 {
            ResultFileBuilder::complete()
        } else {
            ResultFileBuilder::new().metric("download", 1e8 + i as f64).metric("latency", 9.0)
        };
        let path = dir.write_result(ts, &content);
        records.push(classify(&path).into_record().expect("fixture should parse"));
    }
    sort_sourced(&mut records);
    (dir, records)
}

#[test]
fn parsed_records_survive_snapshot() {
    let (_dir, records) = parsed_fixture_records(25);
    let bytes = to_parquet_bytes(&records).unwrap();
    let back = from_parquet_bytes(&bytes).unwrap();
    assert_eq!(back, records);

    // identifiers and absent metrics keep their shape
    assert_eq!(back[0].measurement.session_id.as_deref(), Some("3f2a9c"));
    assert_eq!(back[1].measurement.session_id, None);
    assert_eq!(back[1].measurement.get(Metric::Jitter), None);
}

#[test]
fn truncated_snapshot_reads_as_miss() {
    let (_dir, records) = parsed_fixture_records(10);
    let cache = tempfile::tempdir().unwrap();
    let store = CacheStore::new(cache.path().join("cache.parquet"));
    assert!(store.write(&records));

    let bytes = fs::read(store.path()).unwrap();
    for cut in [0, 4, bytes.len() / 3, bytes.len() - 1] {
        fs::write(store.path(), &bytes[..cut]).unwrap();
        assert!(store.read().is_none(), "cut at {cut} should be a miss");
    }
}

#[test]
fn flipped_footer_reads_as_miss() {
    let (_dir, records) = parsed_fixture_records(5);
    let cache = tempfile::tempdir().unwrap();
    let store = CacheStore::new(cache.path().join("cache.parquet"));
    assert!(store.write(&records));

    let mut bytes = fs::read(store.path()).unwrap();
    let len = bytes.len();
    // footer length field sits just before the trailing magic
    for b in &mut bytes[len - 8..len - 4] {
        *b ^= 0xFF;
    }
    fs::write(store.path(), &bytes).unwrap();
    assert!(store.read().is_none());
}

#[test]
fn distinct_data_dirs_get_distinct_snapshots() {
    let cache = tempfile::tempdir().unwrap();
    let a = CacheStore::for_data_dir(cache.path(), std::path::Path::new("/srv/a"));
    let b = CacheStore::for_data_dir(cache.path(), std::path::Path::new("/srv/b"));
    assert_ne!(a.path(), b.path());

    let (_dir, records) = parsed_fixture_records(3);
    assert!(a.write(&records));
    assert!(b.read().is_none());
    assert_eq!(a.read().map(|r| r.len()), Some(3));
}
