//! # Availability Handlers
//!
//! This module contains the handler for querying an organization's bookable
//! slots for a date. The handler assembles the inputs the slot computation
//! needs and delegates the actual walk to the scheduling module:
//!
//! 1. Load the organization and its hours/policy context
//! 2. Fetch the day's non-cancelled booking ledger (widened by one booking
//!    block before midnight to catch spillover from the previous evening)
//! 3. Compute the slot sequence and answer it with the requested date
//!
//! The computation itself never touches the database, so a request costs two
//! queries regardless of how many slots the day yields.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use shinebook_core::{
    errors::BookingError,
    models::booking::Booking,
    models::organization::Organization,
    models::slot::AvailableSlotsResponse,
    scheduling,
};

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the available-slots endpoint
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    /// Calendar date to compute slots for, in `YYYY-MM-DD` form
    pub date: NaiveDate,
}

/// Computes the bookable slots for an organization on a given date.
///
/// # Endpoint
///
/// ```text
/// GET /api/organizations/:id/slots?date=2025-06-02
/// ```
///
/// # Errors
///
/// * `BookingError::NotFound` - no organization with this id
/// * `BookingError::InvalidState` - the date lies beyond the organization's
///   advance-booking window
/// * `BookingError::Database` - database error
#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let organization =
        shinebook_db::repositories::organization::get_organization_by_id(&state.db_pool, id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Organization with ID {} not found", id))
            })?;
    let organization = Organization::from(organization);

    let rows =
        shinebook_db::repositories::booking::get_bookings_for_day(&state.db_pool, id, query.date)
            .await
            .map_err(BookingError::Database)?;
    let bookings = rows
        .into_iter()
        .map(Booking::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let today = Utc::now().date_naive();
    let slots = scheduling::available_slots(&organization.context(), query.date, today, &bookings)?;

    Ok(Json(AvailableSlotsResponse {
        date: query.date,
        slots,
    }))
}
