use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings", post(handlers::booking::create_booking))
        .route("/api/bookings/:id", get(handlers::booking::get_booking))
        .route(
            "/api/bookings/:id/status",
            patch(handlers::booking::update_booking_status),
        )
        .route(
            "/api/bookings/:id/payment",
            post(handlers::booking::update_payment_status),
        )
}
