use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{double_option, CategoryCount, PageQuery};
use crate::models::project::ProjectType;
use crate::models::trip::{Trip, TripStatus};
use crate::services::settlement::Settlement;
use crate::services::trip_status::StatusChange;
use crate::utils::validation::{validate_non_negative_days, validate_non_negative_decimal, validate_not_blank};

// Request para crear un viaje
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    pub project_id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub source: String,
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub destination: String,
    #[validate(custom = "validate_non_negative_decimal")]
    pub km: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub tons: Option<Decimal>,
    #[validate(custom = "validate_non_negative_days")]
    pub days: Option<i32>,
    /// Litros
    #[validate(custom = "validate_non_negative_decimal")]
    pub fuel_advance: Decimal,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Actualización general de un viaje. El estado solo cambia por
/// `PATCH /:id/status`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTripRequest {
    pub project_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub source: Option<String>,
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub km: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub tons: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom = "validate_non_negative_days")]
    pub days: Option<Option<i32>>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub fuel_advance: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub actual_km: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub actual_tons: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom = "validate_non_negative_days")]
    pub actual_days: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_time: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_time: Option<Option<DateTime<Utc>>>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

// Request de cambio de estado
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTripStatusRequest {
    pub status: TripStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub actual_km: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub actual_tons: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom = "validate_non_negative_days")]
    pub actual_days: Option<Option<i32>>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl From<UpdateTripStatusRequest> for StatusChange {
    fn from(request: UpdateTripStatusRequest) -> Self {
        StatusChange {
            requested: request.status,
            start_time: request.start_time,
            end_time: request.end_time,
            actual_km: request.actual_km,
            actual_tons: request.actual_tons,
            actual_days: request.actual_days,
            notes: request.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<TripStatus>,
    pub project_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl TripListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
        }
    }
}

/// Viaje con los datos de proyecto, vehículo y conductor (JOIN)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TripDetailsRow {
    #[sqlx(flatten)]
    pub trip: Trip,
    pub project_code: String,
    pub project_name: String,
    pub project_type: ProjectType,
    pub rate: Decimal,
    pub customer_name: String,
    pub company_name: String,
    pub vehicle_code: String,
    pub registration_number: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub driver_code: String,
    pub driver_first_name: String,
    pub driver_last_name: String,
    pub driver_mobile: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripProjectRef {
    pub id: Uuid,
    pub project_code: String,
    pub project_name: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub rate: Decimal,
    pub customer_name: String,
    pub company_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripVehicleRef {
    pub id: Uuid,
    pub vehicle_code: String,
    pub registration_number: String,
    pub make: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripDriverRef {
    pub id: Uuid,
    pub driver_code: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
}

// Response de viaje con su liquidación
#[derive(Debug, Clone, Serialize)]
pub struct TripResponse {
    #[serde(flatten)]
    pub trip: Trip,
    pub project: TripProjectRef,
    pub vehicle: TripVehicleRef,
    pub driver: TripDriverRef,
    pub financials: Settlement,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TripSummary {
    pub id: Uuid,
    pub trip_code: String,
    pub source: String,
    pub destination: String,
    pub date: NaiveDate,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TripStatsResponse {
    pub total_trips: i64,
    pub status_stats: Vec<CategoryCount>,
    pub recent_trips: Vec<TripSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_request_into_change() {
        let request: UpdateTripStatusRequest = serde_json::from_value(serde_json::json!({
            "status": "On Process",
            "actual_km": null,
            "actual_days": 3,
            "notes": "left depot"
        }))
        .unwrap();
        let change = StatusChange::from(request);

        assert_eq!(change.requested, TripStatus::OnProcess);
        assert_eq!(change.actual_km, Some(None));
        assert_eq!(change.actual_tons, None);
        assert_eq!(change.actual_days, Some(Some(3)));
        assert_eq!(change.notes.as_deref(), Some("left depot"));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = serde_json::from_value::<UpdateTripStatusRequest>(serde_json::json!({
            "status": "Delayed"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_fuel_advance_is_invalid() {
        let request: CreateTripRequest = serde_json::from_value(serde_json::json!({
            "project_id": Uuid::new_v4(),
            "vehicle_id": Uuid::new_v4(),
            "driver_id": Uuid::new_v4(),
            "date": "2024-03-01",
            "source": "Pune",
            "destination": "Mumbai",
            "km": 150,
            "fuel_advance": -5
        }))
        .unwrap();

        assert!(request.validate().unwrap_err().field_errors().contains_key("fuel_advance"));
    }

    #[test]
    fn test_negative_days_are_invalid() {
        let request: CreateTripRequest = serde_json::from_value(serde_json::json!({
            "project_id": Uuid::new_v4(),
            "vehicle_id": Uuid::new_v4(),
            "driver_id": Uuid::new_v4(),
            "date": "2024-03-01",
            "source": "Pune",
            "destination": "Nashik",
            "days": -2,
            "fuel_advance": 0
        }))
        .unwrap();
        assert!(request.validate().unwrap_err().field_errors().contains_key("days"));

        let patch: UpdateTripRequest = serde_json::from_value(serde_json::json!({
            "days": 4,
            "actual_days": -1
        }))
        .unwrap();
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("actual_days"));
        assert!(!errors.field_errors().contains_key("days"));

        let cleared: UpdateTripRequest = serde_json::from_value(serde_json::json!({ "actual_days": null })).unwrap();
        assert!(cleared.validate().is_ok());
    }
}
