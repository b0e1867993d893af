use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use shinebook_core::errors::BookingError;
use shinebook_core::models::booking::{Booking, ServiceSelection};
use shinebook_core::models::customer::Customer;
use shinebook_core::models::organization::{BookingPolicy, BusinessHours, Organization};
use shinebook_core::models::service::{Service, ServiceAddon, ServicePackage};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOrganization {
    pub id: Uuid,
    pub name: String,
    pub business_hours: Json<BusinessHours>,
    pub booking_policy: Json<BookingPolicy>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCustomer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub base_price_cents: i64,
    pub duration_minutes: i32,
    pub packages: Json<Vec<ServicePackage>>,
    pub addons: Json<Vec<ServiceAddon>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Booking row as stored. Status columns stay plain text here; parsing into
/// the domain enums happens in the `TryFrom` conversion so a corrupted row
/// surfaces as an error instead of a panic.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub customer_id: Uuid,
    pub items: Json<Vec<ServiceSelection>>,
    pub scheduled_at: DateTime<Utc>,
    pub status: String,
    pub total_amount_cents: i64,
    pub deposit_amount_cents: i64,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for a booking about to be inserted. The id, status,
/// payment status, and timestamps are stamped by the repository.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub organization_id: Uuid,
    pub customer_id: Uuid,
    pub items: Vec<ServiceSelection>,
    pub scheduled_at: DateTime<Utc>,
    pub total_amount_cents: i64,
    pub deposit_amount_cents: i64,
    pub notes: Option<String>,
}

impl From<DbOrganization> for Organization {
    fn from(row: DbOrganization) -> Self {
        Organization {
            id: row.id,
            name: row.name,
            business_hours: row.business_hours.0,
            booking_policy: row.booking_policy.0,
            created_at: row.created_at,
        }
    }
}

impl From<DbCustomer> for Customer {
    fn from(row: DbCustomer) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Service {
            id: row.id,
            organization_id: row.organization_id,
            name: row.name,
            base_price_cents: row.base_price_cents,
            duration_minutes: row.duration_minutes as u32,
            packages: row.packages.0,
            addons: row.addons.0,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = BookingError;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            organization_id: row.organization_id,
            customer_id: row.customer_id,
            items: row.items.0,
            scheduled_at: row.scheduled_at,
            status: row.status.parse()?,
            total_amount_cents: row.total_amount_cents,
            deposit_amount_cents: row.deposit_amount_cents,
            payment_status: row.payment_status.parse()?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
