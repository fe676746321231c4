//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use tracing::{debug, error};

use super::AppState;
use super::types::{ErrorResponse, SlotsQuery};
use crate::forecast::parse_records;
use crate::slots::{SelectionMode, SlotRecord, SlotSelector};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Returns the lowest-intensity slots for the requested duration.
///
/// `GET /slots` → 200 + `Vec<SlotRecord>` JSON using configured defaults
/// `GET /slots?duration=N&contiguous=B` → 200, same shape
/// `GET /slots?duration=0` → 400 + `ErrorResponse`
/// Upstream forecast failure → 500 + `ErrorResponse`
pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<SlotRecord>>, ApiError> {
    let duration = query.duration_or(state.defaults.duration_minutes);
    let mode = SelectionMode::from_contiguous(query.contiguous_or(state.defaults.contiguous));

    let records = state.provider.fetch().await.map_err(|e| {
        error!(error = %e, "failed to fetch forecast");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to fetch forecast data".to_string(),
            }),
        )
    })?;

    let parsed = parse_records(&records);
    let selection = SlotSelector
        .select_with_report(&parsed.buckets, duration, mode)
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        })?;

    debug!(
        duration,
        %mode,
        unparsable = parsed.skipped,
        invalid = selection.skipped,
        covered_minutes = selection.covered_minutes,
        "served slots"
    );

    Ok(Json(selection.slots.iter().map(SlotRecord::from).collect()))
}
