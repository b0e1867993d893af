use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use shinebook_core::{
    errors::BookingError,
    models::booking::{
        Booking, BookingResponse, CreateBookingRequest, PaymentStatusUpdateResponse,
        UpdateBookingStatusRequest, UpdatePaymentStatusRequest,
    },
    models::organization::Organization,
    models::service::Service,
    pricing,
};
use shinebook_db::models::NewBooking;
use shinebook_db::repositories::booking::{CreateBookingOutcome, PaymentUpdate};

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    if payload.items.is_empty() {
        return Err(AppError(BookingError::Validation(
            "At least one service must be selected".to_string(),
        )));
    }

    // Preconditions run in order and nothing is written until all pass
    let organization = shinebook_db::repositories::organization::get_organization_by_id(
        &state.db_pool,
        payload.organization_id,
    )
    .await
    .map_err(BookingError::Database)?
    .ok_or_else(|| {
        BookingError::NotFound(format!(
            "Organization with ID {} not found",
            payload.organization_id
        ))
    })?;
    let organization = Organization::from(organization);

    shinebook_db::repositories::customer::get_customer_by_id(&state.db_pool, payload.customer_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| {
            BookingError::NotFound(format!("Customer with ID {} not found", payload.customer_id))
        })?;

    // Resolve every line item against the catalog before pricing
    let mut resolutions = Vec::new();
    for selection in &payload.items {
        let service = shinebook_db::repositories::service::get_service_by_id(
            &state.db_pool,
            selection.service_id,
        )
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| {
            BookingError::NotFound(format!("Service with ID {} not found", selection.service_id))
        })?;
        let service = Service::from(service);

        // A service from another organization is invisible to this tenant
        if service.organization_id != payload.organization_id {
            return Err(AppError(BookingError::NotFound(format!(
                "Service with ID {} not found",
                selection.service_id
            ))));
        }
        if !service.is_active {
            return Err(AppError(BookingError::NotFound(format!(
                "Service '{}' is no longer offered",
                service.name
            ))));
        }

        resolutions.push(pricing::resolve_line_item(&service, selection));
    }

    let total_amount_cents = pricing::quote_total(&resolutions)?;
    let deposit_amount_cents =
        pricing::deposit_amount(total_amount_cents, &organization.booking_policy);

    // The insert re-tests the slot inside its own transaction
    let outcome = shinebook_db::repositories::booking::create_booking_checked(
        &state.db_pool,
        NewBooking {
            organization_id: payload.organization_id,
            customer_id: payload.customer_id,
            items: payload.items,
            scheduled_at: payload.scheduled_at,
            total_amount_cents,
            deposit_amount_cents,
            notes: payload.notes,
        },
    )
    .await
    .map_err(BookingError::Database)?;

    let row = match outcome {
        CreateBookingOutcome::Created(row) => row,
        CreateBookingOutcome::Conflict => {
            return Err(AppError(BookingError::SlotConflict(format!(
                "The slot at {} is no longer available",
                payload.scheduled_at
            ))));
        }
    };

    let booking = Booking::try_from(row)?;
    Ok(Json(BookingResponse::from(booking)))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let row = shinebook_db::repositories::booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", id)))?;

    let booking = Booking::try_from(row)?;
    Ok(Json(BookingResponse::from(booking)))
}

#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let row = shinebook_db::repositories::booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", id)))?;
    let booking = Booking::try_from(row)?;

    // Consult the lifecycle table before writing anything
    if !booking.status.can_transition_to(payload.status) {
        return Err(AppError(BookingError::InvalidState(format!(
            "Cannot move booking from {} to {}",
            booking.status, payload.status
        ))));
    }

    // Compare-and-swap against the status we just read; a concurrent writer
    // makes the update miss and the request fails rather than clobbering
    let updated = shinebook_db::repositories::booking::update_booking_status(
        &state.db_pool,
        id,
        booking.status,
        payload.status,
    )
    .await
    .map_err(BookingError::Database)?
    .ok_or_else(|| {
        BookingError::InvalidState("Booking status changed while processing the request".to_string())
    })?;

    let booking = Booking::try_from(updated)?;
    Ok(Json(BookingResponse::from(booking)))
}

#[axum::debug_handler]
pub async fn update_payment_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> Result<Json<PaymentStatusUpdateResponse>, AppError> {
    let outcome = shinebook_db::repositories::booking::apply_payment_update(
        &state.db_pool,
        id,
        payload.payment_status,
        payload.transaction_id.as_deref(),
    )
    .await
    .map_err(BookingError::Database)?;

    // Webhook delivery races against application state, so the two dropped
    // outcomes answer 200 with applied=false instead of failing; a failure
    // response would only make the provider redeliver
    let applied = match outcome {
        PaymentUpdate::Applied(_) => true,
        PaymentUpdate::Duplicate => {
            tracing::warn!(
                "Dropping duplicate payment notification for booking {}",
                id
            );
            false
        }
        PaymentUpdate::UnknownBooking => {
            tracing::warn!("Dropping payment notification for unknown booking {}", id);
            false
        }
    };

    Ok(Json(PaymentStatusUpdateResponse {
        booking_id: id,
        payment_status: payload.payment_status,
        applied,
    }))
}
