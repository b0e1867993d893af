use axum::Json;
use chrono::NaiveDate;
use mockall::predicate;
use uuid::Uuid;

use shinebook_core::{
    errors::BookingError,
    models::booking::Booking,
    models::organization::Organization,
    models::slot::AvailableSlotsResponse,
    scheduling,
};

use crate::test_utils::{at, day, db_booking_row, db_organization, TestContext};
use shinebook_api::middleware::error_handling::AppError;

// Mirrors the handler flow over mock repositories, with `today` pinned so
// the advance-booking horizon stays deterministic.
async fn test_get_available_slots_wrapper(
    ctx: &mut TestContext,
    organization_id: Uuid,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let organization = ctx
        .organization_repo
        .get_organization_by_id(organization_id)
        .await?
        .ok_or_else(|| {
            BookingError::NotFound(format!("Organization with ID {} not found", organization_id))
        })?;
    let organization = Organization::from(organization);

    let rows = ctx
        .booking_repo
        .get_bookings_for_day(organization_id, date)
        .await?;
    let bookings = rows
        .into_iter()
        .map(Booking::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let slots = scheduling::available_slots(&organization.context(), date, today, &bookings)?;

    Ok(Json(AvailableSlotsResponse { date, slots }))
}

#[tokio::test]
async fn test_get_available_slots_full_day() {
    let mut ctx = TestContext::new();
    let organization_id = Uuid::new_v4();

    ctx.organization_repo
        .expect_get_organization_by_id()
        .with(predicate::eq(organization_id))
        .returning(move |id| Ok(Some(db_organization(id))));

    ctx.booking_repo
        .expect_get_bookings_for_day()
        .returning(|_, _| Ok(vec![]));

    // 2025-06-02 is a Monday with 08:00-18:00 hours
    let result = test_get_available_slots_wrapper(
        &mut ctx,
        organization_id,
        day("2025-06-02"),
        day("2025-06-02"),
    )
    .await;

    let Json(response) = result.expect("Failed to compute slots");
    assert_eq!(response.slots.len(), 10);
    assert_eq!(response.slots[0].start, at("2025-06-02", "08:00"));
    assert_eq!(response.slots[9].end, at("2025-06-02", "18:00"));
}

#[tokio::test]
async fn test_get_available_slots_closed_day() {
    let mut ctx = TestContext::new();
    let organization_id = Uuid::new_v4();

    ctx.organization_repo
        .expect_get_organization_by_id()
        .returning(move |id| Ok(Some(db_organization(id))));

    ctx.booking_repo
        .expect_get_bookings_for_day()
        .returning(|_, _| Ok(vec![]));

    // 2025-06-08 is a Sunday, which the standard hours keep closed
    let result = test_get_available_slots_wrapper(
        &mut ctx,
        organization_id,
        day("2025-06-08"),
        day("2025-06-02"),
    )
    .await;

    let Json(response) = result.expect("Failed to compute slots");
    assert!(response.slots.is_empty());
}

#[tokio::test]
async fn test_get_available_slots_excludes_booked_hour() {
    let mut ctx = TestContext::new();
    let organization_id = Uuid::new_v4();

    ctx.organization_repo
        .expect_get_organization_by_id()
        .returning(move |id| Ok(Some(db_organization(id))));

    ctx.booking_repo
        .expect_get_bookings_for_day()
        .returning(move |org_id, _| {
            Ok(vec![db_booking_row(
                org_id,
                at("2025-06-02", "10:00"),
                "confirmed",
            )])
        });

    let result = test_get_available_slots_wrapper(
        &mut ctx,
        organization_id,
        day("2025-06-02"),
        day("2025-06-02"),
    )
    .await;

    let Json(response) = result.expect("Failed to compute slots");
    assert_eq!(response.slots.len(), 9);
    assert!(response
        .slots
        .iter()
        .all(|slot| slot.start != at("2025-06-02", "10:00")));
}

#[tokio::test]
async fn test_get_available_slots_unknown_organization() {
    let mut ctx = TestContext::new();
    let organization_id = Uuid::new_v4();

    ctx.organization_repo
        .expect_get_organization_by_id()
        .returning(|_| Ok(None));

    // The ledger must not be consulted when the organization is missing
    ctx.booking_repo
        .expect_get_bookings_for_day()
        .times(0)
        .returning(|_, _| panic!("Should not be called"));

    let result = test_get_available_slots_wrapper(
        &mut ctx,
        organization_id,
        day("2025-06-02"),
        day("2025-06-02"),
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_get_available_slots_beyond_horizon() {
    let mut ctx = TestContext::new();
    let organization_id = Uuid::new_v4();

    ctx.organization_repo
        .expect_get_organization_by_id()
        .returning(move |id| Ok(Some(db_organization(id))));

    ctx.booking_repo
        .expect_get_bookings_for_day()
        .returning(|_, _| Ok(vec![]));

    // Policy allows 14 days ahead; 30 days out must be refused
    let result = test_get_available_slots_wrapper(
        &mut ctx,
        organization_id,
        day("2025-07-02"),
        day("2025-06-02"),
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::InvalidState(_) => {}
        e => panic!("Expected InvalidState error, got: {:?}", e),
    }
}
