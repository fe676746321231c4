//! Carbon-intensity slot selection.

/// Lowest-intensity slot selector.
pub mod selector;
pub mod types;

pub use selector::SlotSelector;
pub use types::{
    CarbonReading, ForecastBucket, SelectedSlot, Selection, SelectionMode, SlotRecord,
};
