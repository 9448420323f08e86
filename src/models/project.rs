//! Modelo de Project
//!
//! Un proyecto de transporte con su cliente, su tipo de facturación y su
//! tarifa. Mapea a la tabla `projects`.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::services::settlement::BillingTerms;

/// Tipo de facturación - mapea al ENUM project_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "project_type")]
pub enum ProjectType {
    #[serde(rename = "KM")]
    #[sqlx(rename = "KM")]
    Km,
    #[serde(rename = "Metric Ton")]
    #[sqlx(rename = "Metric Ton")]
    MetricTon,
    #[serde(rename = "Day Rent")]
    #[sqlx(rename = "Day Rent")]
    DayRent,
}

impl ProjectType {
    pub const ALL: [ProjectType; 3] = [ProjectType::Km, ProjectType::MetricTon, ProjectType::DayRent];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Km => "KM",
            ProjectType::MetricTon => "Metric Ton",
            ProjectType::DayRent => "Day Rent",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const PROJECT_STATUSES: &[&str] = &["Active", "Completed", "On Hold", "Cancelled"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub project_code: String,
    pub customer_name: String,
    pub company_name: String,
    pub project_name: String,
    pub place: String,
    pub project_type: ProjectType,
    pub rate: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn billing_terms(&self) -> BillingTerms {
        BillingTerms {
            project_type: self.project_type,
            rate: self.rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_type_wire_names() {
        assert_eq!(serde_json::to_string(&ProjectType::Km).unwrap(), "\"KM\"");
        assert_eq!(serde_json::to_string(&ProjectType::MetricTon).unwrap(), "\"Metric Ton\"");
        let parsed: ProjectType = serde_json::from_str("\"Day Rent\"").unwrap();
        assert_eq!(parsed, ProjectType::DayRent);
        assert!(serde_json::from_str::<ProjectType>("\"km\"").is_err());
    }
}
