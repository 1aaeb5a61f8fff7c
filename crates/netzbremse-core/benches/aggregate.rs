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

//! Benchmarks for record classification and interval aggregation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use netzbremse_core::{aggregate_to_intervals, filename_for, Measurement, Metric, RecordParser};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Three points per run, one run every ten minutes.
fn generate_rows(count: usize) -> Vec<Measurement> {
    (0..count)
        .map(|i| {
            let run = (i / 3) as i64;
            let ts = base() + Duration::minutes(run * 10) + Duration::seconds((i % 3) as i64 * 20);
            Measurement::new(ts)
                .with_metric(Metric::Download, 200.0 + (i % 17) as f64)
                .with_metric(Metric::Upload, 40.0 + (i % 5) as f64)
                .with_metric(Metric::Latency, 10.0 + (i % 7) as f64)
                .with_metric(Metric::Jitter, 1.0 + (i % 3) as f64)
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_to_intervals");

    for &size in &SIZES {
        let rows = generate_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| black_box(aggregate_to_intervals(rows, 10).unwrap()))
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let parser = RecordParser::default();
    let name = filename_for(base());
    let json = br#"{
        "success": true,
        "sessionID": "0f6a1c",
        "endpoint": "fra",
        "result": {
            "download": 250000000, "upload": 50000000,
            "latency": 12.5, "jitter": 1.5,
            "downLoadedLatency": 30.0, "downLoadedJitter": 4.0,
            "upLoadedLatency": 40.0, "upLoadedJitter": 5.0
        }
    }"#;

    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Bytes(json.len() as u64));
    group.bench_function("full_record", |b| {
        b.iter(|| black_box(parser.classify_bytes(&name, json)))
    });
    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_classify);
criterion_main!(benches);
