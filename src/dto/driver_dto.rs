use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::common_dto::{CategoryCount, PageQuery};
use crate::models::driver::{Address, EmergencyContact};
use crate::utils::validation::{
    validate_driver_status, validate_driver_vehicle_type, validate_mobile, validate_non_negative_days,
    validate_not_blank,
};

// Request para crear un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub first_name: String,
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_mobile")]
    pub mobile: String,
    #[validate(length(min = 3, max = 20), custom = "validate_not_blank")]
    pub license_number: String,
    pub license_expiry: NaiveDate,
    pub date_of_birth: NaiveDate,
    pub address: Option<Address>,
    pub emergency_contact: Option<EmergencyContact>,
    #[validate(custom = "validate_non_negative_days")]
    pub experience: Option<i32>,
    #[validate(custom = "validate_driver_vehicle_type")]
    pub vehicle_type: Option<String>,
}

// Request para actualizar un conductor
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom = "validate_mobile")]
    pub mobile: Option<String>,
    #[validate(length(min = 3, max = 20), custom = "validate_not_blank")]
    pub license_number: Option<String>,
    pub license_expiry: Option<NaiveDate>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<Address>,
    pub emergency_contact: Option<EmergencyContact>,
    #[validate(custom = "validate_non_negative_days")]
    pub experience: Option<i32>,
    #[validate(custom = "validate_driver_vehicle_type")]
    pub vehicle_type: Option<String>,
    #[validate(custom = "validate_driver_status")]
    pub status: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub vehicle_type: Option<String>,
}

impl DriverListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
        }
    }
}

// Resumen de conductor para las estadísticas
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DriverSummary {
    pub id: uuid::Uuid,
    pub driver_code: String,
    pub first_name: String,
    pub last_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DriverStatsResponse {
    pub total_drivers: i64,
    pub active_drivers: i64,
    pub inactive_drivers: i64,
    pub available_drivers: i64,
    pub vehicle_type_stats: Vec<CategoryCount>,
    pub experience_stats: Vec<CategoryCount>,
    pub recent_drivers: Vec<DriverSummary>,
}

#[derive(Debug, Serialize)]
pub struct DriverStatusResponse {
    pub id: uuid::Uuid,
    pub driver_code: String,
    pub full_name: String,
    pub status: String,
    pub is_available: bool,
}
