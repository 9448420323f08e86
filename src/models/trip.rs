//! Modelo de Trip
//!
//! Un viaje de un vehículo con su conductor dentro de un proyecto.
//! Mapea a la tabla `trips`; la liquidación nunca se guarda.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::services::report_aggregator::BillableTrip;
use crate::services::settlement::TripMeasurements;
use crate::services::trip_status::TripProgress;

/// Estado del viaje - mapea al ENUM trip_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "trip_status")]
pub enum TripStatus {
    Upcoming,
    #[serde(rename = "On Process")]
    #[sqlx(rename = "On Process")]
    OnProcess,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub const ALL: [TripStatus; 4] = [
        TripStatus::Upcoming,
        TripStatus::OnProcess,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Upcoming => "Upcoming",
            TripStatus::OnProcess => "On Process",
            TripStatus::Completed => "Completed",
            TripStatus::Cancelled => "Cancelled",
        }
    }
}

impl Default for TripStatus {
    fn default() -> Self {
        TripStatus::Upcoming
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub trip_code: String,
    pub project_id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub date: NaiveDate,
    pub source: String,
    pub destination: String,
    pub km: Option<Decimal>,
    pub tons: Option<Decimal>,
    pub days: Option<i32>,
    pub status: TripStatus,
    pub fuel_advance: Decimal,
    pub actual_km: Option<Decimal>,
    pub actual_tons: Option<Decimal>,
    pub actual_days: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    pub fn progress(&self) -> TripProgress {
        TripProgress {
            status: self.status,
            start_time: self.start_time,
            end_time: self.end_time,
            actual_km: self.actual_km,
            actual_tons: self.actual_tons,
            actual_days: self.actual_days,
            notes: self.notes.clone(),
        }
    }
}

impl BillableTrip for Trip {
    fn project_id(&self) -> Uuid {
        self.project_id
    }

    fn measurements(&self) -> TripMeasurements {
        TripMeasurements {
            km: self.km,
            tons: self.tons,
            days: self.days,
            actual_km: self.actual_km,
            actual_tons: self.actual_tons,
            actual_days: self.actual_days,
            fuel_advance: self.fuel_advance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_status_wire_names() {
        assert_eq!(serde_json::to_string(&TripStatus::OnProcess).unwrap(), "\"On Process\"");
        assert_eq!(serde_json::to_string(&TripStatus::Upcoming).unwrap(), "\"Upcoming\"");
        let parsed: TripStatus = serde_json::from_str("\"On Process\"").unwrap();
        assert_eq!(parsed, TripStatus::OnProcess);
        assert!(serde_json::from_str::<TripStatus>("\"OnProcess\"").is_err());
    }

    #[test]
    fn test_display_matches_wire_name() {
        for status in TripStatus::ALL {
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{}\"", status)
            );
        }
    }
}
