//! # Slot Scheduling
//!
//! The availability engine: given an organization's hours and policy plus the
//! day's booking ledger, compute the bookable windows for a date, and decide
//! whether a proposed start time collides with an existing reservation.
//!
//! ## Slot Computation Algorithm
//!
//! 1. Reject dates past the advance-booking horizon (a hard error, distinct
//!    from an empty day).
//! 2. Resolve the weekday's hours; a closed day yields an empty sequence.
//! 3. If the day already carries `max_bookings_per_day` non-cancelled
//!    bookings, yield an empty sequence regardless of remaining room.
//! 4. Walk from opening to closing time in `slot_duration_minutes` steps,
//!    stopping before any window would spill past closing time.
//! 5. Drop candidates that overlap a non-cancelled booking's occupied
//!    interval (half-open test), then drop candidates inside the
//!    `buffer_minutes` guard band around any booking boundary.
//!
//! Cancelled bookings are excluded from every test: a cancelled 10:00
//! reservation never blocks the 10:00 window. Everything here is pure
//! computation; callers fetch the configuration and the day's ledger and
//! pass both in, which also makes the results reproducible for a fixed
//! ledger state.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::errors::{BookingError, BookingResult};
use crate::models::booking::{Booking, BookingStatus};
use crate::models::organization::OrganizationContext;
use crate::models::slot::Slot;

/// Minutes every booking is assumed to occupy when testing for conflicts.
/// Appointments block a fixed one-hour window today regardless of which
/// services were selected.
// TODO: derive the occupied window from the summed durations of the selected
// services once those are recorded on the ledger entry.
pub const BOOKING_BLOCK_MINUTES: i64 = 60;

/// The half-open interval `[scheduled_at, scheduled_at + block)` a booking
/// removes from availability.
pub fn occupied_interval(scheduled_at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        scheduled_at,
        scheduled_at + Duration::minutes(BOOKING_BLOCK_MINUTES),
    )
}

/// Half-open interval overlap: `[start, end)` intersects `[other_start,
/// other_end)`. Touching boundaries do not overlap.
fn overlaps(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    other_start: DateTime<Utc>,
    other_end: DateTime<Utc>,
) -> bool {
    start < other_end && end > other_start
}

/// Occupied intervals of the non-cancelled bookings in `bookings`.
fn active_intervals(bookings: &[Booking]) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    bookings
        .iter()
        .filter(|booking| booking.status != BookingStatus::Cancelled)
        .map(|booking| occupied_interval(booking.scheduled_at))
        .collect()
}

/// Whether a booking starting at `scheduled_at` would overlap any
/// non-cancelled booking in `existing`. This is the re-check the create
/// transaction runs against the freshly read ledger before inserting.
pub fn conflicts(existing: &[Booking], scheduled_at: DateTime<Utc>) -> bool {
    let (start, end) = occupied_interval(scheduled_at);
    active_intervals(existing)
        .iter()
        .any(|&(other_start, other_end)| overlaps(start, end, other_start, other_end))
}

/// Computes the bookable slots for `date`.
///
/// `bookings` must be the ledger entries whose occupied interval intersects
/// that calendar day; `today` anchors the advance-booking horizon so the
/// computation stays deterministic under test.
///
/// # Errors
///
/// * `BookingError::InvalidState` - the date lies past the organization's
///   advance-booking window
/// * `BookingError::Validation` - the policy carries a zero slot duration or
///   an advance window no date can represent
pub fn available_slots(
    ctx: &OrganizationContext,
    date: NaiveDate,
    today: NaiveDate,
    bookings: &[Booking],
) -> BookingResult<Vec<Slot>> {
    let policy = &ctx.booking_policy;

    let horizon = today
        .checked_add_days(Days::new(u64::from(policy.advance_booking_days)))
        .ok_or_else(|| {
            BookingError::Validation(format!(
                "advance booking window of {} days is out of range",
                policy.advance_booking_days
            ))
        })?;
    if date > horizon {
        return Err(BookingError::InvalidState(format!(
            "{} is beyond the advance booking window of {} days",
            date, policy.advance_booking_days
        )));
    }

    let hours = ctx.business_hours.for_weekday(date.weekday());
    if hours.closed {
        return Ok(Vec::new());
    }

    if policy.slot_duration_minutes == 0 {
        return Err(BookingError::Validation(
            "slot duration must be a positive number of minutes".to_string(),
        ));
    }

    // The ledger may include spillover from the tail of the previous day;
    // those entries block slots but do not count against this day's cap.
    let day_count = bookings
        .iter()
        .filter(|booking| {
            booking.status != BookingStatus::Cancelled
                && booking.scheduled_at.date_naive() == date
        })
        .count();
    if day_count >= policy.max_bookings_per_day as usize {
        return Ok(Vec::new());
    }

    let active = active_intervals(bookings);

    let open = anchor(date, hours.open);
    let close = anchor(date, hours.close);
    let slot_len = Duration::minutes(i64::from(policy.slot_duration_minutes));
    let buffer = Duration::minutes(i64::from(policy.buffer_minutes));

    let mut slots = Vec::new();
    let mut start = open;
    // No partial trailing slot: stop once a window would end past closing.
    while start + slot_len <= close {
        let end = start + slot_len;

        // The buffer widens each occupied interval on both sides before the
        // overlap test; a zero buffer degrades to the plain half-open check.
        let blocked = active.iter().any(|&(other_start, other_end)| {
            overlaps(start, end, other_start - buffer, other_end + buffer)
        });

        if !blocked {
            slots.push(Slot {
                start,
                end,
                available: true,
            });
        }

        start = end;
    }

    Ok(slots)
}

/// Anchors a wall-clock time to the date's midnight. Organization-local
/// time is UTC in this deployment.
fn anchor(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}
