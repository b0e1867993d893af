use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub business_hours: BusinessHours,
    pub booking_policy: BookingPolicy,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    pub fn context(&self) -> OrganizationContext {
        OrganizationContext {
            business_hours: self.business_hours.clone(),
            booking_policy: self.booking_policy.clone(),
        }
    }
}

/// The configuration an availability or admission request operates under:
/// the organization's weekly hours plus its booking policy, loaded once per
/// request and handed to the core functions rather than re-fetched ad hoc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationContext {
    pub business_hours: BusinessHours,
    pub booking_policy: BookingPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl BusinessHours {
    pub fn for_weekday(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }
}

/// Opening hours for a single weekday. `open`/`close` are wall-clock times
/// anchored to the requested date's midnight; `open < close` whenever the
/// day is not flagged closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub closed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPolicy {
    pub slot_duration_minutes: u32,
    pub buffer_minutes: u32,
    pub advance_booking_days: u32,
    pub max_bookings_per_day: u32,
    pub require_deposit: bool,
    pub deposit_percentage: u32,
}
