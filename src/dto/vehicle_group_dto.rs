use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::PageQuery;
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleGroupRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub group_name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleGroupRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub group_name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleGroupListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl VehicleGroupListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct VehicleGroupSummary {
    pub id: Uuid,
    pub group_name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct VehicleGroupStatsResponse {
    pub total_groups: i64,
    pub active_groups: i64,
    pub inactive_groups: i64,
    pub groups_with_counts: Vec<crate::models::VehicleGroupWithCount>,
    pub recent_groups: Vec<VehicleGroupSummary>,
}
