use chrono::{DateTime, Duration, DurationRound, Timelike, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{ForecastRecord, IntensityReading, format_timestamp};

/// A seeded carbon-intensity forecast generator for offline use.
///
/// Produces consecutive fixed-width buckets following a daily sinusoid
/// (cleanest overnight, dirtiest in the early evening) with Gaussian noise.
/// The same seed always yields the same forecast.
///
/// # Examples
///
/// ```
/// use carbon_slots::forecast::SyntheticForecast;
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
/// let forecast = SyntheticForecast::new(start, 42);
/// let records = forecast.generate();
/// assert_eq!(records.len(), 48);
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticForecast {
    /// Start of the first bucket.
    pub start: DateTime<Utc>,
    /// Number of buckets to emit.
    pub buckets: usize,
    /// Width of each bucket in minutes.
    pub bucket_minutes: i64,
    /// Mean intensity.
    pub base: f32,
    /// Amplitude of the daily swing.
    pub amplitude: f32,
    /// Standard deviation of the per-bucket noise.
    pub noise_std: f32,
    /// Random seed for reproducible noise.
    pub seed: u64,
}

impl SyntheticForecast {
    /// A 24 hour forecast of half-hour buckets with GB-like magnitudes.
    pub fn new(start: DateTime<Utc>, seed: u64) -> Self {
        Self {
            start,
            buckets: 48,
            bucket_minutes: 30,
            base: 180.0,
            amplitude: 90.0,
            noise_std: 12.0,
            seed,
        }
    }

    /// Same as [`SyntheticForecast::new`], starting at the current half hour.
    pub fn starting_now(seed: u64) -> Self {
        let now = Utc::now();
        let start = now.duration_trunc(Duration::minutes(30)).unwrap_or(now);
        Self::new(start, seed)
    }

    /// Generates the forecast records.
    pub fn generate(&self) -> Vec<ForecastRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let width = Duration::minutes(self.bucket_minutes.max(1));
        let minutes_per_day = 24.0 * 60.0;

        (0..self.buckets)
            .map(|i| {
                let from = self.start + width * i as i32;
                let to = from + width;
                let minute_of_day = (from.hour() * 60 + from.minute()) as f32;
                // Peak at 18:00, trough at 06:00.
                let phase = 2.0 * std::f32::consts::PI * (minute_of_day - 12.0 * 60.0) / minutes_per_day;
                let noise = gaussian_noise(&mut rng, self.noise_std);
                let value = (self.base + self.amplitude * phase.sin() + noise).max(0.0);

                ForecastRecord {
                    from: format_timestamp(&from),
                    to: format_timestamp(&to),
                    intensity: IntensityReading {
                        forecast: value.round() as i32,
                        actual: None,
                        index: Some(intensity_index(value).to_string()),
                    },
                }
            })
            .collect()
    }
}

/// Box-Muller sample with the given standard deviation.
fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}

/// Qualitative band used by the GB carbon-intensity service.
fn intensity_index(value: f32) -> &'static str {
    match value as i32 {
        i32::MIN..=39 => "very low",
        40..=119 => "low",
        120..=199 => "moderate",
        200..=289 => "high",
        _ => "very high",
    }
}
