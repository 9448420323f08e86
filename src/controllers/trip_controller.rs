use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::trip_dto::{
    CreateTripRequest, TripDetailsRow, TripDriverRef, TripListQuery, TripProjectRef, TripResponse,
    TripStatsResponse, TripVehicleRef, UpdateTripRequest, UpdateTripStatusRequest,
};
use crate::models::project::{Project, ProjectType};
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::project_repository::ProjectRepository;
use crate::repositories::trip_repository::{NewTrip, TripRepository};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::report_aggregator::BillableTrip;
use crate::services::settlement::{BillingTerms, SettlementCalculator};
use crate::services::trip_status::{self, StatusChange};
use crate::utils::codes::trip_code;
use crate::utils::errors::{not_found_error, validation_error, AppError};

const RECENT_LIMIT: i64 = 5;

/// Medición planificada de un viaje: solo queda la del tipo del proyecto
pub type PlannedMeasurement = (Option<Decimal>, Option<Decimal>, Option<i32>);

/// Exigir la medición que factura el proyecto y descartar las otras dos
pub fn planned_measurement(
    project_type: ProjectType,
    km: Option<Decimal>,
    tons: Option<Decimal>,
    days: Option<i32>,
) -> Result<PlannedMeasurement, AppError> {
    match project_type {
        ProjectType::Km => km
            .map(|km| (Some(km), None, None))
            .ok_or_else(|| validation_error("km", "Distance (km) is required for KM projects")),
        ProjectType::MetricTon => tons
            .map(|tons| (None, Some(tons), None))
            .ok_or_else(|| validation_error("tons", "Weight (tons) is required for Metric Ton projects")),
        ProjectType::DayRent => days
            .map(|days| (None, None, Some(days)))
            .ok_or_else(|| validation_error("days", "Number of days is required for Day Rent projects")),
    }
}

pub struct TripController {
    repository: TripRepository,
    projects: ProjectRepository,
    vehicles: VehicleRepository,
    drivers: DriverRepository,
    calculator: SettlementCalculator,
}

impl TripController {
    pub fn new(pool: PgPool, calculator: SettlementCalculator) -> Self {
        Self {
            repository: TripRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool),
            calculator,
        }
    }

    /// Viaje con sus referencias y la liquidación recalculada
    pub fn to_response(&self, row: TripDetailsRow) -> TripResponse {
        let terms = BillingTerms {
            project_type: row.project_type,
            rate: row.rate,
        };
        let financials = self.calculator.compute(&row.trip.measurements(), Some(&terms));

        TripResponse {
            project: TripProjectRef {
                id: row.trip.project_id,
                project_code: row.project_code,
                project_name: row.project_name,
                project_type: row.project_type,
                rate: row.rate,
                customer_name: row.customer_name,
                company_name: row.company_name,
            },
            vehicle: TripVehicleRef {
                id: row.trip.vehicle_id,
                vehicle_code: row.vehicle_code,
                registration_number: row.registration_number,
                make: row.vehicle_make,
                model: row.vehicle_model,
            },
            driver: TripDriverRef {
                id: row.trip.driver_id,
                driver_code: row.driver_code,
                first_name: row.driver_first_name,
                last_name: row.driver_last_name,
                mobile: row.driver_mobile,
            },
            trip: row.trip,
            financials,
        }
    }

    async fn details(&self, id: Uuid, admin_id: Uuid) -> Result<TripResponse, AppError> {
        let row = self
            .repository
            .find_details(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Trip"))?;

        Ok(self.to_response(row))
    }

    async fn project_of(&self, id: Uuid, admin_id: Uuid) -> Result<Project, AppError> {
        self.projects
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid project".to_string()))
    }

    /// El vehículo debe ser del inquilino y estar disponible
    async fn check_vehicle(&self, id: Uuid, admin_id: Uuid) -> Result<(), AppError> {
        let vehicle = self
            .vehicles
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid vehicle".to_string()))?;

        if !vehicle.is_available {
            return Err(AppError::BadRequest(format!(
                "Vehicle {} is not available",
                vehicle.vehicle_code
            )));
        }
        Ok(())
    }

    /// El conductor debe ser del inquilino y estar disponible
    async fn check_driver(&self, id: Uuid, admin_id: Uuid) -> Result<(), AppError> {
        let driver = self
            .drivers
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid driver".to_string()))?;

        if !driver.is_available {
            return Err(AppError::BadRequest(format!(
                "Driver {} is not available",
                driver.driver_code
            )));
        }
        Ok(())
    }

    pub async fn list(
        &self,
        admin_id: Uuid,
        query: TripListQuery,
    ) -> Result<ApiResponse<PaginatedResponse<TripResponse>>, AppError> {
        let (rows, total) = self.repository.list(admin_id, &query).await?;
        let trips = rows.into_iter().map(|row| self.to_response(row)).collect();

        Ok(ApiResponse::success(PaginatedResponse::new(trips, &query.page_query(), total)))
    }

    pub async fn stats(&self, admin_id: Uuid) -> Result<ApiResponse<TripStatsResponse>, AppError> {
        let (counts, status_stats, recent_trips) = futures::try_join!(
            self.repository.counts(admin_id),
            self.repository.status_stats(admin_id),
            self.repository.recent(admin_id, RECENT_LIMIT),
        )?;

        Ok(ApiResponse::success(TripStatsResponse {
            total_trips: counts.total,
            status_stats,
            recent_trips,
        }))
    }

    pub async fn get_by_id(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<TripResponse>, AppError> {
        Ok(ApiResponse::success(self.details(id, admin_id).await?))
    }

    pub async fn create(&self, admin_id: Uuid, request: CreateTripRequest) -> Result<ApiResponse<TripResponse>, AppError> {
        let project = self.project_of(request.project_id, admin_id).await?;
        self.check_vehicle(request.vehicle_id, admin_id).await?;
        self.check_driver(request.driver_id, admin_id).await?;

        let (km, tons, days) = planned_measurement(project.project_type, request.km, request.tons, request.days)?;

        let trip = self
            .repository
            .create(NewTrip {
                admin_id,
                trip_code: trip_code(),
                project_id: project.id,
                vehicle_id: request.vehicle_id,
                driver_id: request.driver_id,
                date: request.date,
                source: request.source.trim().to_string(),
                destination: request.destination.trim().to_string(),
                km,
                tons,
                days,
                fuel_advance: request.fuel_advance,
                notes: request.notes.unwrap_or_default(),
            })
            .await?;

        info!(
            "🛣️ Viaje creado: {} ({} → {}) en proyecto {}",
            trip.trip_code, trip.source, trip.destination, project.project_code
        );

        let response = self.details(trip.id, admin_id).await?;
        Ok(ApiResponse::success_with_message(response, "Trip created successfully"))
    }

    pub async fn update(
        &self,
        id: Uuid,
        admin_id: Uuid,
        mut request: UpdateTripRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        let current = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Trip"))?;

        if let Some(vehicle_id) = request.vehicle_id.filter(|v| *v != current.vehicle_id) {
            self.check_vehicle(vehicle_id, admin_id).await?;
        }
        if let Some(driver_id) = request.driver_id.filter(|d| *d != current.driver_id) {
            self.check_driver(driver_id, admin_id).await?;
        }

        let plan_changed =
            request.project_id.is_some() || request.km.is_some() || request.tons.is_some() || request.days.is_some();
        if plan_changed {
            let project = self
                .project_of(request.project_id.unwrap_or(current.project_id), admin_id)
                .await?;
            let (km, tons, days) = planned_measurement(
                project.project_type,
                request.km.unwrap_or(current.km),
                request.tons.unwrap_or(current.tons),
                request.days.unwrap_or(current.days),
            )?;
            request.km = Some(km);
            request.tons = Some(tons);
            request.days = Some(days);
        }

        self.repository.update(id, admin_id, request).await?;

        let response = self.details(id, admin_id).await?;
        Ok(ApiResponse::success_with_message(response, "Trip updated successfully"))
    }

    /// Cambio de estado a través de la máquina de estados
    pub async fn update_status(
        &self,
        id: Uuid,
        admin_id: Uuid,
        request: UpdateTripStatusRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        let trip = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Trip"))?;

        let change = StatusChange::from(request);
        let progress = trip_status::transition(&trip.progress(), change, Utc::now()).map_err(|e| {
            warn!("⛔ Transición rechazada para {}: {}", trip.trip_code, e);
            AppError::from(e)
        })?;

        let saved = self.repository.save_progress(id, admin_id, &progress).await?;
        info!("🔄 Viaje {}: {} → {}", saved.trip_code, trip.status, saved.status);

        let response = self.details(id, admin_id).await?;
        Ok(ApiResponse::success_with_message(
            response,
            format!("Trip status updated to {}", saved.status),
        ))
    }

    pub async fn delete(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let trip = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Trip"))?;

        self.repository.delete(id, admin_id).await?;
        info!("🗑️ Viaje eliminado: {}", trip.trip_code);
        Ok(ApiResponse::message("Trip deleted successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planned_measurement_keeps_only_billed_value() {
        let km = Some(Decimal::from(120));
        let tons = Some(Decimal::from(8));

        assert_eq!(
            planned_measurement(ProjectType::Km, km, tons, Some(2)).unwrap(),
            (km, None, None)
        );
        assert_eq!(
            planned_measurement(ProjectType::MetricTon, km, tons, None).unwrap(),
            (None, tons, None)
        );
        assert_eq!(
            planned_measurement(ProjectType::DayRent, None, None, Some(3)).unwrap(),
            (None, None, Some(3))
        );
    }

    #[test]
    fn test_planned_measurement_is_required() {
        let err = planned_measurement(ProjectType::MetricTon, Some(Decimal::from(50)), None, None).unwrap_err();
        match err {
            AppError::Validation(errors) => assert!(errors.field_errors().contains_key("tons")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_zero_planned_value_is_accepted() {
        assert_eq!(
            planned_measurement(ProjectType::Km, Some(Decimal::ZERO), None, None).unwrap(),
            (Some(Decimal::ZERO), None, None)
        );
    }
}
