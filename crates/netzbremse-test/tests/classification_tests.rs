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

//! Checks that every canned sample is classified the way its name says.

use netzbremse_core::{classify, Outcome};
use netzbremse_test::fixtures::{self, FixtureDir, ResultFileBuilder};

#[test]
fn complete_fixture_parses() {
    let dir = FixtureDir::new();
    let path = dir.write_result(fixtures::base_time(), &ResultFileBuilder::complete());
    let record = classify(&path).into_record().expect("complete fixture should parse");
    assert_eq!(record.timestamp(), fixtures::base_time());
    assert_eq!(record.measurement.endpoint.as_deref(), Some("fra"));
}

#[test]
fn noise_samples_are_expected_skips() {
    let dir = FixtureDir::new();
    for (i, (name, content)) in fixtures::noise_contents().into_iter().enumerate() {
        let ts = fixtures::timestamps(i + 1, 1)[i];
        let path = dir.write_raw(&netzbremse_core::filename_for(ts), content);
        assert!(
            matches!(classify(&path), Outcome::SkippedExpected(_)),
            "{name} should be expected noise"
        );
    }
}

#[test]
fn malformed_samples_are_malformed_skips() {
    let dir = FixtureDir::new();
    for (i, (name, content)) in fixtures::malformed_contents().into_iter().enumerate() {
        let ts = fixtures::timestamps(i + 1, 1)[i];
        let path = dir.write_raw(&netzbremse_core::filename_for(ts), content);
        assert!(
            matches!(classify(&path), Outcome::SkippedMalformed(_)),
            "{name} should be malformed"
        );
    }
}

#[test]
fn bad_filenames_are_malformed_even_with_perfect_content() {
    let dir = FixtureDir::new();
    let content = ResultFileBuilder::complete().build();
    for name in fixtures::bad_filenames() {
        let path = dir.write_raw(name, &content);
        assert!(
            matches!(classify(&path), Outcome::SkippedMalformed(_)),
            "{name} should be rejected"
        );
    }
}
