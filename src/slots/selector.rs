//! Lowest-intensity slot selection.

use tracing::{debug, warn};

use super::types::{ForecastBucket, SelectedSlot, Selection, SelectionMode};
use crate::error::SelectError;

/// Picks the cleanest time slots from a carbon-intensity forecast.
///
/// Buckets are ranked by ascending intensity with a stable sort, so buckets
/// of equal intensity keep their input order. The caller's slice is never
/// reordered.
#[derive(Debug, Default, Clone, Copy)]
pub struct SlotSelector;

impl SlotSelector {
    /// Selects slots covering `duration_minutes` using the given mode.
    ///
    /// # Arguments
    ///
    /// * `buckets` - Forecast buckets in any order
    /// * `duration_minutes` - Requested activity duration (must be > 0)
    /// * `mode` - Greedy accumulation or a single covering bucket
    ///
    /// # Returns
    ///
    /// Slots in ascending intensity order. May cover less than the requested
    /// duration when the forecast does not offer enough time.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::NonPositiveDuration`] if `duration_minutes <= 0`.
    pub fn select(
        &self,
        buckets: &[ForecastBucket],
        duration_minutes: i64,
        mode: SelectionMode,
    ) -> Result<Vec<SelectedSlot>, SelectError> {
        self.select_with_report(buckets, duration_minutes, mode)
            .map(|selection| selection.slots)
    }

    /// Like [`SlotSelector::select`], but also reports skipped buckets and
    /// covered minutes.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::NonPositiveDuration`] if `duration_minutes <= 0`.
    pub fn select_with_report(
        &self,
        buckets: &[ForecastBucket],
        duration_minutes: i64,
        mode: SelectionMode,
    ) -> Result<Selection, SelectError> {
        if duration_minutes <= 0 {
            return Err(SelectError::NonPositiveDuration(duration_minutes));
        }

        let mut ranked: Vec<&ForecastBucket> = buckets.iter().filter(|b| b.is_valid()).collect();
        let skipped = buckets.len() - ranked.len();
        if skipped > 0 {
            warn!(skipped, "ignoring forecast buckets whose end is not after their start");
        }

        // `sort_by_key` is stable: equal intensities stay in input order.
        ranked.sort_by_key(|b| b.intensity);

        let slots = match mode {
            SelectionMode::Greedy => greedy(&ranked, duration_minutes),
            SelectionMode::SingleContiguous => single_contiguous(&ranked, duration_minutes)
                .into_iter()
                .collect(),
        };
        let covered_minutes = slots.iter().map(SelectedSlot::minutes).sum();

        debug!(
            %mode,
            duration_minutes,
            candidates = ranked.len(),
            slots = slots.len(),
            covered_minutes,
            "selected slots"
        );

        Ok(Selection {
            slots,
            skipped,
            covered_minutes,
        })
    }
}

/// First ranked bucket long enough on its own, cut down to the duration.
fn single_contiguous(ranked: &[&ForecastBucket], duration_minutes: i64) -> Option<SelectedSlot> {
    ranked
        .iter()
        .find(|b| b.span_minutes() >= duration_minutes)
        .map(|b| SelectedSlot::truncated(b, duration_minutes))
}

/// Accumulates ranked buckets until the duration is met; the last one may be
/// truncated.
fn greedy(ranked: &[&ForecastBucket], duration_minutes: i64) -> Vec<SelectedSlot> {
    let mut slots = Vec::new();
    let mut accumulated = 0_i64;

    for bucket in ranked {
        if accumulated >= duration_minutes {
            break;
        }
        let span = bucket.span_minutes();
        if accumulated + span > duration_minutes {
            slots.push(SelectedSlot::truncated(bucket, duration_minutes - accumulated));
            accumulated = duration_minutes;
        } else {
            slots.push(SelectedSlot::whole(bucket));
            accumulated += span;
        }
    }

    slots
}
