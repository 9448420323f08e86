use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{CategoryCount, PageQuery};
use crate::models::project::ProjectType;
use crate::utils::validation::{validate_non_negative_decimal, validate_not_blank, validate_project_status};

// Request para crear un proyecto
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub customer_name: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub company_name: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub project_name: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub place: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    #[validate(custom = "validate_non_negative_decimal")]
    pub rate: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(custom = "validate_project_status")]
    pub status: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

// Request para actualizar un proyecto
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub customer_name: Option<String>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub company_name: Option<String>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub project_name: Option<String>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub place: Option<String>,
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub rate: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(custom = "validate_project_status")]
    pub status: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
}

impl ProjectListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub project_code: String,
    pub project_name: String,
    pub customer_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ProjectStatsResponse {
    pub total_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub on_hold_projects: i64,
    pub type_stats: Vec<CategoryCount>,
    pub recent_projects: Vec<ProjectSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_wire_format() {
        let request: CreateProjectRequest = serde_json::from_value(serde_json::json!({
            "customer_name": "Ultratech",
            "company_name": "Ultratech Cement",
            "project_name": "Clinker haul",
            "place": "Nagpur",
            "type": "Metric Ton",
            "rate": 450.5,
            "start_date": "2024-01-01",
            "end_date": "2024-06-30"
        }))
        .unwrap();

        assert_eq!(request.project_type, ProjectType::MetricTon);
        assert_eq!(request.rate, Decimal::new(4505, 1));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_negative_rate_is_invalid() {
        let request = UpdateProjectRequest {
            rate: Some(Decimal::from(-1)),
            ..Default::default()
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("rate"));
    }
}
