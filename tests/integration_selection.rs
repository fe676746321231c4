//! Integration tests for slot selection over whole forecasts.

mod common;

use carbon_slots::forecast::parse_records;
use carbon_slots::io::ingest::load_forecast_file;
use carbon_slots::slots::{ForecastBucket, SelectedSlot, SelectionMode, SlotSelector};
use common::{at, bucket, morning_buckets, random_buckets};

const SEEDS: std::ops::Range<u64> = 0..64;
const DURATIONS: &[i64] = &[1, 15, 30, 45, 60, 95, 240, 1440, 10_000];

fn spans(slots: &[SelectedSlot]) -> i64 {
    slots.iter().map(SelectedSlot::minutes).sum()
}

/// Finds the valid input bucket a slot was carved from.
fn source_of<'a>(slot: &SelectedSlot, buckets: &'a [ForecastBucket]) -> Option<&'a ForecastBucket> {
    buckets.iter().find(|b| {
        b.is_valid()
            && b.from == slot.valid_from
            && b.intensity == slot.intensity
            && slot.valid_to <= b.to
    })
}

#[test]
fn scenario_greedy_thirty_minutes() {
    let slots = SlotSelector
        .select(&morning_buckets(), 30, SelectionMode::Greedy)
        .unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!((slots[0].valid_from, slots[0].valid_to), (at(9, 30), at(10, 0)));
    assert_eq!(slots[0].intensity, 10);
}

#[test]
fn scenario_greedy_sixty_minutes() {
    let slots = SlotSelector
        .select(&morning_buckets(), 60, SelectionMode::Greedy)
        .unwrap();
    let got: Vec<_> = slots
        .iter()
        .map(|s| (s.valid_from, s.valid_to, s.intensity))
        .collect();
    assert_eq!(
        got,
        vec![(at(9, 30), at(10, 0), 10), (at(10, 0), at(10, 30), 30)]
    );
}

#[test]
fn scenario_contiguous_without_fit() {
    let slots = SlotSelector
        .select(&morning_buckets(), 45, SelectionMode::SingleContiguous)
        .unwrap();
    assert!(slots.is_empty());
}

#[test]
fn scenario_contiguous_hour_bucket() {
    let slots = SlotSelector
        .select(&[bucket((9, 0), (10, 0), 20)], 45, SelectionMode::SingleContiguous)
        .unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!((slots[0].valid_from, slots[0].valid_to), (at(9, 0), at(9, 45)));
    assert_eq!(slots[0].intensity, 20);
}

#[test]
fn scenario_empty_forecast() {
    for mode in [SelectionMode::Greedy, SelectionMode::SingleContiguous] {
        for &duration in DURATIONS {
            assert!(SlotSelector.select(&[], duration, mode).unwrap().is_empty());
        }
    }
}

#[test]
fn greedy_covers_min_of_duration_and_supply() {
    for seed in SEEDS {
        let buckets = random_buckets(seed, 40);
        let supply: i64 = buckets
            .iter()
            .filter(|b| b.is_valid())
            .map(ForecastBucket::span_minutes)
            .sum();
        for &duration in DURATIONS {
            let slots = SlotSelector
                .select(&buckets, duration, SelectionMode::Greedy)
                .unwrap();
            assert_eq!(
                spans(&slots),
                duration.min(supply),
                "seed {seed}, duration {duration}"
            );
        }
    }
}

#[test]
fn greedy_slots_stay_within_source_buckets() {
    for seed in SEEDS {
        let buckets = random_buckets(seed, 40);
        for &duration in DURATIONS {
            let slots = SlotSelector
                .select(&buckets, duration, SelectionMode::Greedy)
                .unwrap();
            for slot in &slots {
                assert!(slot.valid_to >= slot.valid_from);
                let source = source_of(slot, &buckets);
                assert!(source.is_some(), "seed {seed}: {slot} has no valid source");
                assert!(slot.minutes() <= source.map_or(0, ForecastBucket::span_minutes));
            }
        }
    }
}

#[test]
fn greedy_slots_are_in_ascending_intensity() {
    for seed in SEEDS {
        let buckets = random_buckets(seed, 40);
        let slots = SlotSelector
            .select(&buckets, 600, SelectionMode::Greedy)
            .unwrap();
        assert!(slots.windows(2).all(|w| w[0].intensity <= w[1].intensity));
    }
}

#[test]
fn contiguous_emits_at_most_one_full_length_slot() {
    for seed in SEEDS {
        let buckets = random_buckets(seed, 40);
        for &duration in DURATIONS {
            let slots = SlotSelector
                .select(&buckets, duration, SelectionMode::SingleContiguous)
                .unwrap();
            assert!(slots.len() <= 1);
            if let Some(slot) = slots.first() {
                assert_eq!(slot.minutes(), duration);
                assert!(source_of(slot, &buckets).is_some());
            } else {
                assert!(
                    buckets
                        .iter()
                        .filter(|b| b.is_valid())
                        .all(|b| b.span_minutes() < duration)
                );
            }
        }
    }
}

#[test]
fn contiguous_picks_cleanest_covering_bucket() {
    for seed in SEEDS {
        let buckets = random_buckets(seed, 40);
        let slots = SlotSelector
            .select(&buckets, 60, SelectionMode::SingleContiguous)
            .unwrap();
        let cleanest = buckets
            .iter()
            .filter(|b| b.is_valid() && b.span_minutes() >= 60)
            .map(|b| b.intensity)
            .min();
        assert_eq!(slots.first().map(|s| s.intensity), cleanest);
    }
}

#[test]
fn equal_intensity_ties_follow_input_order() {
    for seed in SEEDS {
        let buckets = random_buckets(seed, 40);
        let slots = SlotSelector
            .select(&buckets, 10_000, SelectionMode::Greedy)
            .unwrap();
        for pair in slots.windows(2) {
            if pair[0].intensity != pair[1].intensity {
                continue;
            }
            let pos = |s: &SelectedSlot| {
                buckets
                    .iter()
                    .position(|b| b.is_valid() && b.from == s.valid_from)
                    .unwrap()
            };
            assert!(pos(&pair[0]) < pos(&pair[1]), "seed {seed}");
        }
    }
}

#[test]
fn selection_is_idempotent() {
    for seed in SEEDS {
        let buckets = random_buckets(seed, 40);
        for mode in [SelectionMode::Greedy, SelectionMode::SingleContiguous] {
            let first = SlotSelector.select_with_report(&buckets, 95, mode).unwrap();
            let second = SlotSelector.select_with_report(&buckets, 95, mode).unwrap();
            assert_eq!(first, second);
        }
    }
}

#[test]
fn invalid_buckets_never_become_slots() {
    for seed in SEEDS {
        let buckets = random_buckets(seed, 40);
        let invalid = buckets.iter().filter(|b| !b.is_valid()).count();
        let selection = SlotSelector
            .select_with_report(&buckets, 10_000, SelectionMode::Greedy)
            .unwrap();
        assert_eq!(selection.skipped, invalid);
        assert_eq!(selection.slots.len(), buckets.len() - invalid);
    }
}

#[test]
fn fixture_file_end_to_end() {
    let records = load_forecast_file(&common::fixture_path()).unwrap();
    let parsed = parse_records(&records);
    // One garbled timestamp, one missing `to`, one null `from`.
    assert_eq!(parsed.skipped, 3);
    assert_eq!(parsed.buckets.len(), 5);

    let greedy = SlotSelector
        .select_with_report(&parsed.buckets, 240, SelectionMode::Greedy)
        .unwrap();
    // One bucket ends before it starts.
    assert_eq!(greedy.skipped, 1);
    assert_eq!(greedy.covered_minutes, 150);
    let intensities: Vec<_> = greedy.slots.iter().map(|s| s.intensity).collect();
    assert_eq!(intensities, vec![10, 30, 50, 80]);

    let contiguous = SlotSelector
        .select(&parsed.buckets, 45, SelectionMode::SingleContiguous)
        .unwrap();
    assert_eq!(contiguous.len(), 1);
    assert_eq!(contiguous[0].valid_from, at(12, 0));
    assert_eq!(contiguous[0].valid_to, at(12, 45));
    assert_eq!(contiguous[0].intensity, 80);
}
