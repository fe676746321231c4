//! Lowest carbon-intensity time slot selection over electricity forecasts.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
/// Forecast records, parsing, and data sources.
pub mod forecast;
pub mod io;
/// Slot selection types and the selector.
pub mod slots;

pub use error::{ForecastError, SelectError};
pub use slots::{ForecastBucket, SelectedSlot, Selection, SelectionMode, SlotSelector};
