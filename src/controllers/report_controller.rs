use std::collections::HashMap;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::common_dto::ApiResponse;
use crate::dto::report_dto::{
    DashboardResponse, DriverReportRow, EntityCounts, ProjectReportRow, Report, ReportQuery, TripCounts,
    TripReportRow, VehicleReportRow,
};
use crate::models::trip::{Trip, TripStatus};
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::project_repository::ProjectRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::report_aggregator::{total_distance, BillableTrip, ProjectLookup, ReportAggregator, ReportSummary};
use crate::services::settlement::BillingTerms;
use crate::utils::errors::AppError;

/// Agrupar viajes por una de sus referencias
fn group_trips<F>(trips: &[Trip], key: F) -> HashMap<Uuid, Vec<&Trip>>
where
    F: Fn(&Trip) -> Uuid,
{
    let mut grouped: HashMap<Uuid, Vec<&Trip>> = HashMap::new();
    for trip in trips {
        grouped.entry(key(trip)).or_default().push(trip);
    }
    grouped
}

const NO_GROUP: &str = "No Group";

fn group_label(group_name: Option<String>) -> String {
    group_name.unwrap_or_else(|| NO_GROUP.to_string())
}

/// Resumen de un conductor: siempre lleva `total_km`, también sin viajes
fn driver_summary<L>(aggregator: &ReportAggregator, trips: &[&Trip], terms: &L) -> ReportSummary
where
    L: ProjectLookup + ?Sized,
{
    ReportSummary {
        total_km: Some(total_distance(trips.iter().copied())),
        ..aggregator.aggregate(trips.iter().copied(), terms)
    }
}

fn parse_trip_status(raw: Option<&str>) -> Result<Option<TripStatus>, AppError> {
    raw.map(|raw| {
        TripStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| AppError::BadRequest(format!("Invalid trip status '{}'", raw)))
    })
    .transpose()
}

pub struct ReportController {
    trips: TripRepository,
    projects: ProjectRepository,
    vehicles: VehicleRepository,
    drivers: DriverRepository,
    aggregator: ReportAggregator,
}

impl ReportController {
    pub fn new(pool: PgPool, aggregator: ReportAggregator) -> Self {
        Self {
            trips: TripRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool),
            aggregator,
        }
    }

    /// Viajes del inquilino y condiciones de facturación de sus proyectos
    async fn billable_trips(
        &self,
        admin_id: Uuid,
        query: &ReportQuery,
    ) -> Result<(Vec<Trip>, HashMap<Uuid, BillingTerms>), AppError> {
        futures::try_join!(
            self.trips.find_by_admin(admin_id, query.date),
            self.projects.billing_terms_map(admin_id),
        )
    }

    pub async fn dashboard(&self, admin_id: Uuid, query: ReportQuery) -> Result<ApiResponse<DashboardResponse>, AppError> {
        let (vehicles, drivers, projects, trip_counts, (trips, terms)) = futures::try_join!(
            self.vehicles.counts(admin_id),
            self.drivers.counts(admin_id),
            self.projects.counts(admin_id),
            self.trips.counts(admin_id),
            self.billable_trips(admin_id, &query),
        )?;

        let financials = self.aggregator.aggregate(&trips, &terms);
        info!(
            "📊 Dashboard de {}: {} viajes, neto {}",
            admin_id, financials.total_trips, financials.net_earnings
        );

        Ok(ApiResponse::success(DashboardResponse {
            vehicles: EntityCounts {
                total: vehicles.total,
                active: vehicles.active,
            },
            drivers: EntityCounts {
                total: drivers.total,
                active: drivers.active,
            },
            projects: EntityCounts {
                total: projects.total,
                active: projects.active,
            },
            trips: TripCounts {
                total: trip_counts.total,
                completed: trip_counts.completed,
            },
            financials,
        }))
    }

    pub async fn vehicles(
        &self,
        admin_id: Uuid,
        query: ReportQuery,
    ) -> Result<ApiResponse<Report<VehicleReportRow>>, AppError> {
        let (vehicles, (trips, terms)) = futures::try_join!(
            self.vehicles.find_by_admin(admin_id, query.status()),
            self.billable_trips(admin_id, &query),
        )?;

        let by_vehicle = group_trips(&trips, |trip| trip.vehicle_id);
        let mut totals = ReportSummary::default();
        let rows: Vec<VehicleReportRow> = vehicles
            .into_iter()
            .map(|entry| {
                let vehicle = entry.vehicle;
                let summary = match by_vehicle.get(&vehicle.id) {
                    Some(trips) => self.aggregator.aggregate(trips.iter().copied(), &terms),
                    None => ReportSummary::default(),
                };
                totals += &summary;

                VehicleReportRow {
                    id: vehicle.id,
                    name: vehicle.display_name(),
                    vehicle_code: vehicle.vehicle_code,
                    registration_number: vehicle.registration_number,
                    status: vehicle.status,
                    vehicle_type: vehicle.vehicle_type,
                    make: vehicle.make,
                    model: vehicle.model,
                    year: vehicle.year,
                    group_name: group_label(entry.group_name),
                    insurance_expiry: vehicle.insurance_expiry,
                    summary,
                }
            })
            .collect();

        Ok(ApiResponse::success(Report {
            total_rows: rows.len(),
            rows,
            totals,
        }))
    }

    pub async fn drivers(
        &self,
        admin_id: Uuid,
        query: ReportQuery,
    ) -> Result<ApiResponse<Report<DriverReportRow>>, AppError> {
        let (drivers, (trips, terms)) = futures::try_join!(
            self.drivers.find_by_admin(admin_id, query.status()),
            self.billable_trips(admin_id, &query),
        )?;

        let by_driver = group_trips(&trips, |trip| trip.driver_id);
        let mut totals = ReportSummary::default();
        let rows: Vec<DriverReportRow> = drivers
            .into_iter()
            .map(|driver| {
                let driver_trips = by_driver.get(&driver.id).map(Vec::as_slice).unwrap_or_default();
                let summary = driver_summary(&self.aggregator, driver_trips, &terms);
                totals += &summary;

                DriverReportRow {
                    id: driver.id,
                    name: driver.full_name(),
                    driver_code: driver.driver_code,
                    mobile: driver.mobile,
                    license_number: driver.license_number,
                    license_expiry: driver.license_expiry,
                    status: driver.status,
                    experience: driver.experience,
                    rating: driver.rating_average,
                    summary,
                }
            })
            .collect();

        Ok(ApiResponse::success(Report {
            total_rows: rows.len(),
            rows,
            totals,
        }))
    }

    pub async fn projects(
        &self,
        admin_id: Uuid,
        query: ReportQuery,
    ) -> Result<ApiResponse<Report<ProjectReportRow>>, AppError> {
        let (projects, trips) = futures::try_join!(
            self.projects.find_by_admin(admin_id, query.status()),
            self.trips.find_by_admin(admin_id, query.date),
        )?;

        let by_project = group_trips(&trips, |trip| trip.project_id);
        let mut totals = ReportSummary::default();
        let rows: Vec<ProjectReportRow> = projects
            .into_iter()
            .map(|project| {
                let terms = project.billing_terms();
                let project_trips = by_project.get(&project.id).map(Vec::as_slice).unwrap_or_default();
                let summary = self.aggregator.aggregate_project(project_trips.iter().copied(), Some(&terms));
                totals += &summary;

                ProjectReportRow {
                    id: project.id,
                    project_code: project.project_code,
                    name: project.project_name,
                    project_type: project.project_type,
                    status: project.status,
                    start_date: project.start_date,
                    end_date: project.end_date,
                    company: project.company_name,
                    customer: project.customer_name,
                    rate: project.rate,
                    summary,
                }
            })
            .collect();

        Ok(ApiResponse::success(Report {
            total_rows: rows.len(),
            rows,
            totals,
        }))
    }

    pub async fn trips(&self, admin_id: Uuid, query: ReportQuery) -> Result<ApiResponse<Report<TripReportRow>>, AppError> {
        let status = parse_trip_status(query.status())?;
        let rows = self.trips.find_for_report(admin_id, query.date, status).await?;

        let terms: HashMap<Uuid, BillingTerms> = rows
            .iter()
            .map(|row| {
                let terms = BillingTerms {
                    project_type: row.project_type,
                    rate: row.rate,
                };
                (row.trip.project_id, terms)
            })
            .collect();
        let totals = self.aggregator.aggregate(rows.iter().map(|row| &row.trip), &terms);

        let calculator = self.aggregator.calculator();
        let rows: Vec<TripReportRow> = rows
            .into_iter()
            .map(|row| {
                let financials = calculator.compute(&row.trip.measurements(), terms.get(&row.trip.project_id));

                TripReportRow {
                    id: row.trip.id,
                    trip_code: row.trip.trip_code,
                    project_name: row.project_name,
                    vehicle_name: format!("{} {} ({})", row.vehicle_make, row.vehicle_model, row.registration_number),
                    driver_name: format!("{} {}", row.driver_first_name, row.driver_last_name),
                    date: row.trip.date,
                    status: row.trip.status,
                    source: row.trip.source,
                    destination: row.trip.destination,
                    company: row.company_name,
                    project_type: row.project_type,
                    financials,
                }
            })
            .collect();

        Ok(ApiResponse::success(Report {
            total_rows: rows.len(),
            rows,
            totals,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_trip_status() {
        assert_eq!(parse_trip_status(None).unwrap(), None);
        assert_eq!(parse_trip_status(Some("on process")).unwrap(), Some(TripStatus::OnProcess));
        assert_eq!(parse_trip_status(Some("Completed")).unwrap(), Some(TripStatus::Completed));
        assert!(matches!(parse_trip_status(Some("Delayed")), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_driver_without_trips_reports_zero_km() {
        let terms: HashMap<Uuid, BillingTerms> = HashMap::new();
        let summary = driver_summary(&ReportAggregator::default(), &[], &terms);

        assert_eq!(summary.total_trips, 0);
        assert_eq!(summary.total_km, Some(Decimal::ZERO));
        assert_eq!(summary.net_earnings, Decimal::ZERO);
    }

    #[test]
    fn test_vehicle_without_group_label() {
        assert_eq!(group_label(None), "No Group");
        assert_eq!(group_label(Some("Northern fleet".to_string())), "Northern fleet");
    }
}
