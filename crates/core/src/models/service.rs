use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub base_price_cents: i64,
    pub duration_minutes: u32,
    pub packages: Vec<ServicePackage>,
    pub addons: Vec<ServiceAddon>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePackage {
    pub name: String,
    pub price_cents: i64,
    pub duration_minutes: u32,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAddon {
    pub name: String,
    pub price_cents: i64,
    pub duration_minutes: u32,
}
