use crate::models::{DbBooking, NewBooking};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use eyre::Result;
use sqlx::types::Json;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

use shinebook_core::models::booking::{Booking, BookingStatus, PaymentStatus};
use shinebook_core::scheduling::{conflicts, occupied_interval, BOOKING_BLOCK_MINUTES};

/// Result of an admission attempt: either the inserted row, or the slot was
/// taken by the time the transaction re-read the ledger.
#[derive(Debug, Clone)]
pub enum CreateBookingOutcome {
    Created(DbBooking),
    Conflict,
}

/// Result of applying a payment-provider notification.
#[derive(Debug, Clone)]
pub enum PaymentUpdate {
    Applied(DbBooking),
    /// The provider transaction id was seen before; nothing changed.
    Duplicate,
    /// No booking row matches the id; nothing changed.
    UnknownBooking,
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, organization_id, customer_id, items, scheduled_at, status,
               total_amount_cents, deposit_amount_cents, payment_status, notes,
               created_at, updated_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Non-cancelled bookings whose occupied interval can intersect `date`. The
/// window reaches back one booking block before midnight so a late booking
/// on the previous day still shows up in the day's conflict tests.
///
/// Generic over the executor so the same query serves both the availability
/// read path and the admission transaction.
pub async fn get_bookings_for_day<'e, E>(
    executor: E,
    organization_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbBooking>>
where
    E: PgExecutor<'e>,
{
    let day_start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let day_end = day_start + Duration::days(1);

    get_bookings_in_window(executor, organization_id, day_start, day_end).await
}

/// Non-cancelled bookings whose occupied interval can intersect
/// `[start, end)`. The query reaches back one booking block before `start`
/// so an earlier booking whose block runs into the window is included.
pub async fn get_bookings_in_window<'e, E>(
    executor: E,
    organization_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DbBooking>>
where
    E: PgExecutor<'e>,
{
    let window_start = start - Duration::minutes(BOOKING_BLOCK_MINUTES);

    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, organization_id, customer_id, items, scheduled_at, status,
               total_amount_cents, deposit_amount_cents, payment_status, notes,
               created_at, updated_at
        FROM bookings
        WHERE organization_id = $1
          AND scheduled_at >= $2
          AND scheduled_at < $3
          AND status <> 'cancelled'
        ORDER BY scheduled_at ASC
        "#,
    )
    .bind(organization_id)
    .bind(window_start)
    .bind(end)
    .fetch_all(executor)
    .await?;

    Ok(bookings)
}

/// Inserts a booking after re-testing the slot inside the transaction.
///
/// The transaction takes a per-(organization, day) advisory lock for every
/// day the occupied block touches, re-reads the ledger around the block, and
/// runs the overlap predicate against it. Two requests racing for the same
/// window serialize on a shared lock, so the loser sees the winner's row and
/// backs off with `Conflict`.
pub async fn create_booking_checked(
    pool: &Pool<Postgres>,
    new: NewBooking,
) -> Result<CreateBookingOutcome> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let (block_start, block_end) = occupied_interval(new.scheduled_at);

    tracing::debug!(
        "Creating booking: id={}, organization_id={}, scheduled_at={}",
        id,
        new.organization_id,
        new.scheduled_at
    );

    let mut tx = pool.begin().await?;

    // Ascending date order keeps concurrent admissions deadlock-free.
    for day in admission_lock_days(new.scheduled_at) {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(day_lock_key(new.organization_id, day))
            .execute(&mut *tx)
            .await?;
    }

    let rows =
        get_bookings_in_window(&mut *tx, new.organization_id, block_start, block_end).await?;
    let ledger = rows
        .into_iter()
        .map(Booking::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    if conflicts(&ledger, new.scheduled_at) {
        tracing::debug!(
            "Slot conflict: organization_id={}, scheduled_at={}",
            new.organization_id,
            new.scheduled_at
        );
        tx.rollback().await?;
        return Ok(CreateBookingOutcome::Conflict);
    }

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (
            id, organization_id, customer_id, items, scheduled_at, status,
            total_amount_cents, deposit_amount_cents, payment_status, notes,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id, organization_id, customer_id, items, scheduled_at, status,
                  total_amount_cents, deposit_amount_cents, payment_status, notes,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(new.organization_id)
    .bind(new.customer_id)
    .bind(Json(new.items))
    .bind(new.scheduled_at)
    .bind(BookingStatus::Pending.as_str())
    .bind(new.total_amount_cents)
    .bind(new.deposit_amount_cents)
    .bind(PaymentStatus::Unpaid.as_str())
    .bind(new.notes)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Booking created successfully: id={}", id);
    Ok(CreateBookingOutcome::Created(booking))
}

/// Compare-and-swap status update. Returns `None` when the row is missing
/// or its status moved away from `from` since the caller read it.
pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    from: BookingStatus,
    to: BookingStatus,
) -> Result<Option<DbBooking>> {
    let now = Utc::now();

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET status = $3, updated_at = $4
        WHERE id = $1 AND status = $2
        RETURNING id, organization_id, customer_id, items, scheduled_at, status,
                  total_amount_cents, deposit_amount_cents, payment_status, notes,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(from.as_str())
    .bind(to.as_str())
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Applies a payment notification to a booking, once per provider
/// transaction id. The event insert and the booking update share one
/// transaction; a duplicate id rolls the whole thing back.
pub async fn apply_payment_update(
    pool: &Pool<Postgres>,
    booking_id: Uuid,
    payment_status: PaymentStatus,
    transaction_id: Option<&str>,
) -> Result<PaymentUpdate> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let updated = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET payment_status = $2, updated_at = $3
        WHERE id = $1
        RETURNING id, organization_id, customer_id, items, scheduled_at, status,
                  total_amount_cents, deposit_amount_cents, payment_status, notes,
                  created_at, updated_at
        "#,
    )
    .bind(booking_id)
    .bind(payment_status.as_str())
    .bind(now)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(booking) = updated else {
        tx.rollback().await?;
        return Ok(PaymentUpdate::UnknownBooking);
    };

    if let Some(transaction_id) = transaction_id {
        let inserted = sqlx::query(
            r#"
            INSERT INTO payment_events (provider_transaction_id, booking_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (provider_transaction_id) DO NOTHING
            "#,
        )
        .bind(transaction_id)
        .bind(booking_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tracing::debug!(
                "Duplicate payment event dropped: booking_id={}, transaction_id={}",
                booking_id,
                transaction_id
            );
            tx.rollback().await?;
            return Ok(PaymentUpdate::Duplicate);
        }
    }

    tx.commit().await?;
    Ok(PaymentUpdate::Applied(booking))
}

/// Days whose advisory locks an admission for `scheduled_at` must hold, in
/// date order. A booking block that crosses midnight touches two days, and
/// admissions on either side of the boundary must serialize on a shared key
/// or each one's re-check can miss the other's insert.
pub fn admission_lock_days(scheduled_at: DateTime<Utc>) -> Vec<NaiveDate> {
    let day = scheduled_at.date_naive();
    let (_, block_end) = occupied_interval(scheduled_at);

    let mut days = vec![day];
    if let Some(next_day) = day.succ_opt() {
        let next_midnight = Utc.from_utc_datetime(&next_day.and_time(NaiveTime::MIN));
        // Half-open block: one ending exactly at midnight stays on `day`.
        if block_end > next_midnight {
            days.push(next_day);
        }
    }
    days
}

/// Stable advisory-lock key for an (organization, day) pair. FNV-1a over
/// the organization id bytes and the day ordinal, so every process maps the
/// same pair to the same key.
pub fn day_lock_key(organization_id: Uuid, day: NaiveDate) -> i64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in organization_id.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    for byte in day.num_days_from_ce().to_be_bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash as i64
}
