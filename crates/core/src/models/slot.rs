use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A bookable window within an organization's open hours. Slots that fail
/// the overlap or buffer tests are never emitted, so `available` is true on
/// every slot a query returns; the flag is part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlotsResponse {
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}
