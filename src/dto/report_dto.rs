use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::project::ProjectType;
use crate::models::trip::TripStatus;
use crate::services::report_aggregator::ReportSummary;
use crate::services::settlement::Settlement;

/// Filtros comunes de los informes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    /// Estado de la entidad del informe
    pub status: Option<String>,
    /// Solo los viajes de ese día
    pub date: Option<NaiveDate>,
}

impl ReportQuery {
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Informe con sus filas y los totales de todas ellas
#[derive(Debug, Serialize)]
pub struct Report<T> {
    pub rows: Vec<T>,
    pub total_rows: usize,
    pub totals: ReportSummary,
}

#[derive(Debug, Serialize)]
pub struct VehicleReportRow {
    pub id: Uuid,
    pub vehicle_code: String,
    pub name: String,
    pub registration_number: String,
    pub status: String,
    pub vehicle_type: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub group_name: String,
    pub insurance_expiry: Option<NaiveDate>,
    #[serde(flatten)]
    pub summary: ReportSummary,
}

#[derive(Debug, Serialize)]
pub struct DriverReportRow {
    pub id: Uuid,
    pub driver_code: String,
    pub name: String,
    pub mobile: String,
    pub license_number: String,
    pub license_expiry: NaiveDate,
    pub status: String,
    pub experience: i32,
    pub rating: f64,
    #[serde(flatten)]
    pub summary: ReportSummary,
}

#[derive(Debug, Serialize)]
pub struct ProjectReportRow {
    pub id: Uuid,
    pub project_code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub company: String,
    pub customer: String,
    pub rate: Decimal,
    #[serde(flatten)]
    pub summary: ReportSummary,
}

#[derive(Debug, Serialize)]
pub struct TripReportRow {
    pub id: Uuid,
    pub trip_code: String,
    pub project_name: String,
    pub vehicle_name: String,
    pub driver_name: String,
    pub date: NaiveDate,
    pub status: TripStatus,
    pub source: String,
    pub destination: String,
    pub company: String,
    pub project_type: ProjectType,
    pub financials: Settlement,
}

#[derive(Debug, Serialize)]
pub struct EntityCounts {
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Serialize)]
pub struct TripCounts {
    pub total: i64,
    pub completed: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub vehicles: EntityCounts,
    pub drivers: EntityCounts,
    pub projects: EntityCounts,
    pub trips: TripCounts,
    pub financials: ReportSummary,
}
