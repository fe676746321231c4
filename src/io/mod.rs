//! File input and output.

/// CSV export of selected slots.
pub mod export;
/// JSON forecast file loading.
pub mod ingest;
