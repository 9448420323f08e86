//! Modelo de Driver
//!
//! Mapea a la tabla `drivers`. La dirección y el contacto de emergencia se
//! guardan como JSONB.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const DRIVER_STATUSES: &[&str] = &["Active", "Inactive", "On Trip", "On Leave"];
pub const DRIVER_VEHICLE_TYPES: &[&str] = &["Light Vehicle", "Heavy Vehicle", "Bus", "Truck", "All"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub driver_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub license_number: String,
    pub license_expiry: NaiveDate,
    pub date_of_birth: NaiveDate,
    pub address: Option<Json<Address>>,
    pub emergency_contact: Option<Json<EmergencyContact>>,
    pub experience: i32,
    pub vehicle_type: String,
    pub status: String,
    pub is_available: bool,
    pub rating_average: f64,
    pub rating_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
