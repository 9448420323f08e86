//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y las listas de valores permitidos.
//! Mapea exactamente a la tabla `vehicles`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const VEHICLE_TYPES: &[&str] = &["Light Vehicle", "Heavy Vehicle", "Bus", "Truck", "Van", "SUV"];
pub const FUEL_TYPES: &[&str] = &["Petrol", "Diesel", "Electric", "Hybrid", "CNG"];
pub const TRANSMISSIONS: &[&str] = &["Manual", "Automatic"];
pub const VEHICLE_STATUSES: &[&str] = &["Active", "Inactive", "Maintenance", "Repair", "Retired"];

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub vehicle_code: String,
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: String,
    pub fuel_type: String,
    pub transmission: String,
    pub passenger_capacity: i32,
    pub cargo_capacity: i32,
    pub color: Option<String>,
    pub insurance_policy_number: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_expiry: Option<NaiveDate>,
    pub status: String,
    pub is_available: bool,
    pub group_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.make, self.model, self.registration_number)
    }
}

/// Vehículo con el nombre de su grupo (LEFT JOIN vehicle_groups)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VehicleWithGroup {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub group_name: Option<String>,
}
