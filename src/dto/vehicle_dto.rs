use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{double_option, CategoryCount, PageQuery};
use crate::utils::validation::{
    validate_fuel_type, validate_non_negative_days, validate_registration_number, validate_transmission,
    validate_vehicle_status, validate_vehicle_type,
};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CapacityInput {
    #[validate(custom = "validate_non_negative_days")]
    pub passengers: Option<i32>,
    #[validate(custom = "validate_non_negative_days")]
    pub cargo: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct InsuranceInput {
    #[validate(length(max = 100))]
    pub policy_number: Option<String>,
    #[validate(length(max = 100))]
    pub provider: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_registration_number")]
    pub registration_number: String,
    #[validate(length(min = 1, max = 50))]
    pub make: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    #[validate(custom = "validate_vehicle_type")]
    pub vehicle_type: String,
    #[validate(custom = "validate_fuel_type")]
    pub fuel_type: String,
    #[validate(custom = "validate_transmission")]
    pub transmission: Option<String>,
    #[validate]
    pub capacity: Option<CapacityInput>,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate]
    pub insurance: Option<InsuranceInput>,
    #[validate(custom = "validate_vehicle_status")]
    pub status: Option<String>,
    pub group_id: Option<Uuid>,
}

// Request para actualizar un vehículo
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_registration_number")]
    pub registration_number: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(custom = "validate_vehicle_type")]
    pub vehicle_type: Option<String>,
    #[validate(custom = "validate_fuel_type")]
    pub fuel_type: Option<String>,
    #[validate(custom = "validate_transmission")]
    pub transmission: Option<String>,
    #[validate]
    pub capacity: Option<CapacityInput>,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate]
    pub insurance: Option<InsuranceInput>,
    #[validate(custom = "validate_vehicle_status")]
    pub status: Option<String>,
    pub is_available: Option<bool>,
    /// `null` saca el vehículo de su grupo
    #[serde(default, deserialize_with = "double_option")]
    pub group_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub vehicle_type: Option<String>,
    pub fuel_type: Option<String>,
    pub is_available: Option<bool>,
    /// UUID del grupo o `none` para vehículos sin grupo
    pub group_id: Option<String>,
}

impl VehicleListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
        }
    }
}

/// Filtro de grupo ya interpretado
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupFilter {
    Ungrouped,
    Group(Uuid),
}

impl GroupFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("none") {
            return Some(GroupFilter::Ungrouped);
        }
        Uuid::parse_str(raw).ok().map(GroupFilter::Group)
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct VehicleSummary {
    pub id: Uuid,
    pub vehicle_code: String,
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct VehicleStatsResponse {
    pub total_vehicles: i64,
    pub active_vehicles: i64,
    pub available_vehicles: i64,
    pub status_stats: Vec<CategoryCount>,
    pub vehicle_type_stats: Vec<CategoryCount>,
    pub fuel_type_stats: Vec<CategoryCount>,
    pub recent_vehicles: Vec<VehicleSummary>,
}

#[derive(Debug, Serialize)]
pub struct VehicleStatusResponse {
    pub id: Uuid,
    pub vehicle_code: String,
    pub registration_number: String,
    pub status: String,
    pub is_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_filter() {
        let id = Uuid::new_v4();
        assert_eq!(GroupFilter::parse("none"), Some(GroupFilter::Ungrouped));
        assert_eq!(GroupFilter::parse(&id.to_string()), Some(GroupFilter::Group(id)));
        assert_eq!(GroupFilter::parse("fleet-a"), None);
    }

    #[test]
    fn test_update_group_can_be_cleared() {
        let request: UpdateVehicleRequest = serde_json::from_str(r#"{"group_id": null}"#).unwrap();
        assert_eq!(request.group_id, Some(None));

        let request: UpdateVehicleRequest = serde_json::from_str(r#"{"make": "Tata"}"#).unwrap();
        assert_eq!(request.group_id, None);
    }

    #[test]
    fn test_nested_validation() {
        let request: CreateVehicleRequest = serde_json::from_value(serde_json::json!({
            "registration_number": "MH12AB1234",
            "make": "Tata",
            "model": "Prima",
            "year": 2021,
            "vehicle_type": "Truck",
            "fuel_type": "Diesel",
            "capacity": { "passengers": 2, "cargo": -10 }
        }))
        .unwrap();

        assert!(request.validate().is_err());
    }
}
