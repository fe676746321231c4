//! Slot selection types: forecast buckets, selected slots, and modes.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// One forecast period with its carbon-intensity value.
///
/// A bucket is valid only when `to` is strictly after `from`. Invalid
/// buckets are accepted here and filtered out by the selector.
///
/// # Examples
///
/// ```
/// use carbon_slots::slots::ForecastBucket;
/// use chrono::{TimeZone, Utc};
///
/// let from = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
/// let to = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
/// let bucket = ForecastBucket::new(from, to, 120);
/// assert!(bucket.is_valid());
/// assert_eq!(bucket.span_minutes(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastBucket {
    /// Period start (inclusive).
    pub from: DateTime<Utc>,
    /// Period end (exclusive).
    pub to: DateTime<Utc>,
    /// Forecast intensity (gCO2/kWh for the GB source, lower is cleaner).
    pub intensity: i32,
}

impl ForecastBucket {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>, intensity: i32) -> Self {
        Self {
            from,
            to,
            intensity,
        }
    }

    /// Whether `to` is strictly after `from`.
    pub fn is_valid(&self) -> bool {
        self.to > self.from
    }

    /// Span of the bucket in whole minutes, truncated toward zero.
    pub fn span_minutes(&self) -> i64 {
        (self.to - self.from).num_minutes()
    }
}

/// A (possibly truncated) sub-interval of a bucket chosen for the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedSlot {
    /// Slot start, always equal to the source bucket's `from`.
    pub valid_from: DateTime<Utc>,
    /// Slot end, never later than the source bucket's `to`.
    pub valid_to: DateTime<Utc>,
    /// Intensity of the source bucket.
    pub intensity: i32,
}

impl SelectedSlot {
    /// A slot covering the whole bucket.
    pub(crate) fn whole(bucket: &ForecastBucket) -> Self {
        Self {
            valid_from: bucket.from,
            valid_to: bucket.to,
            intensity: bucket.intensity,
        }
    }

    /// A slot covering the first `minutes` of the bucket.
    pub(crate) fn truncated(bucket: &ForecastBucket, minutes: i64) -> Self {
        Self {
            valid_from: bucket.from,
            valid_to: bucket.from + Duration::minutes(minutes),
            intensity: bucket.intensity,
        }
    }

    /// Slot length in whole minutes.
    pub fn minutes(&self) -> i64 {
        (self.valid_to - self.valid_from).num_minutes()
    }
}

impl fmt::Display for SelectedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({} min) intensity={}",
            self.valid_from.format("%Y-%m-%d %H:%M"),
            self.valid_to.format("%Y-%m-%d %H:%M"),
            self.minutes(),
            self.intensity
        )
    }
}

/// Public JSON form of a [`SelectedSlot`].
///
/// Shared by `GET /slots` and `select --json`: `valid_from`, `valid_to` and
/// a nested `carbon.intensity`, timestamps in RFC 3339 UTC.
#[derive(Debug, Serialize)]
pub struct SlotRecord {
    /// Slot start.
    pub valid_from: DateTime<Utc>,
    /// Slot end.
    pub valid_to: DateTime<Utc>,
    /// Carbon figures for the slot.
    pub carbon: CarbonReading,
}

/// Carbon figures attached to a [`SlotRecord`].
#[derive(Debug, Serialize)]
pub struct CarbonReading {
    /// Forecast intensity of the source bucket.
    pub intensity: i32,
}

impl From<&SelectedSlot> for SlotRecord {
    fn from(s: &SelectedSlot) -> Self {
        Self {
            valid_from: s.valid_from,
            valid_to: s.valid_to,
            carbon: CarbonReading {
                intensity: s.intensity,
            },
        }
    }
}

/// How buckets are combined to cover the requested duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// Accumulate the cleanest buckets regardless of time adjacency.
    #[default]
    Greedy,
    /// Pick the cleanest single bucket that covers the duration on its own.
    ///
    /// Adjacent buckets are never stitched together.
    SingleContiguous,
}

impl SelectionMode {
    /// Maps the `contiguous` request flag onto a mode.
    pub fn from_contiguous(contiguous: bool) -> Self {
        if contiguous {
            Self::SingleContiguous
        } else {
            Self::Greedy
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::SingleContiguous => write!(f, "single-contiguous"),
        }
    }
}

/// Selection result with the bookkeeping callers need to judge coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Selected slots in ascending intensity order.
    pub slots: Vec<SelectedSlot>,
    /// Number of input buckets dropped for having `to <= from`.
    pub skipped: usize,
    /// Total minutes covered by `slots`.
    pub covered_minutes: i64,
}

impl Selection {
    /// Whether the slots cover the full requested duration.
    pub fn is_complete(&self, duration_minutes: i64) -> bool {
        self.covered_minutes >= duration_minutes
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Selected slots ---")?;
        for slot in &self.slots {
            writeln!(f, "{slot}")?;
        }
        writeln!(f, "Covered: {} min", self.covered_minutes)?;
        write!(f, "Skipped buckets: {}", self.skipped)
    }
}
