//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use carbon_slots::slots::ForecastBucket;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// 2024-03-01 at the given UTC time.
pub fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, min, 0).unwrap()
}

/// Bucket between two times of 2024-03-01.
pub fn bucket(from: (u32, u32), to: (u32, u32), intensity: i32) -> ForecastBucket {
    ForecastBucket::new(at(from.0, from.1), at(to.0, to.1), intensity)
}

/// Three half-hour buckets from 09:00 with intensities 50, 10, 30.
pub fn morning_buckets() -> Vec<ForecastBucket> {
    vec![
        bucket((9, 0), (9, 30), 50),
        bucket((9, 30), (10, 0), 10),
        bucket((10, 0), (10, 30), 30),
    ]
}

/// Randomized forecast: consecutive buckets of 5–120 minutes with
/// intensities drawn from a narrow range so ties are common. Roughly one in
/// ten buckets is inverted (`to < from`).
pub fn random_buckets(seed: u64, count: usize) -> Vec<ForecastBucket> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cursor = at(0, 0);
    let mut buckets = Vec::with_capacity(count);
    for _ in 0..count {
        let width = Duration::minutes(rng.random_range(5..=120));
        let intensity = rng.random_range(0..=20);
        let next = cursor + width;
        if rng.random_bool(0.1) {
            buckets.push(ForecastBucket::new(next, cursor, intensity));
        } else {
            buckets.push(ForecastBucket::new(cursor, next, intensity));
        }
        cursor = next;
    }
    buckets
}

/// Path of the JSON forecast fixture.
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/forecast.json")
}
