use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::driver_dto::{
    CreateDriverRequest, DriverListQuery, DriverStatsResponse, DriverStatusResponse, UpdateDriverRequest,
};
use crate::models::driver::Driver;
use crate::repositories::driver_repository::{DriverRepository, NewDriver};
use crate::utils::codes::{sequential_code, DRIVER_PREFIX};
use crate::utils::errors::{conflict_error, not_found_error, AppError};

const DEFAULT_VEHICLE_TYPE: &str = "Light Vehicle";
const RECENT_LIMIT: i64 = 5;

pub struct DriverController {
    repository: DriverRepository,
}

impl DriverController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DriverRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        admin_id: Uuid,
        query: DriverListQuery,
    ) -> Result<ApiResponse<PaginatedResponse<Driver>>, AppError> {
        let (drivers, total) = self.repository.list(admin_id, &query).await?;
        Ok(ApiResponse::success(PaginatedResponse::new(drivers, &query.page_query(), total)))
    }

    pub async fn stats(&self, admin_id: Uuid) -> Result<ApiResponse<DriverStatsResponse>, AppError> {
        let (counts, vehicle_type_stats, experience_stats, recent_drivers) = futures::try_join!(
            self.repository.counts(admin_id),
            self.repository.vehicle_type_stats(admin_id),
            self.repository.experience_stats(admin_id),
            self.repository.recent(admin_id, RECENT_LIMIT),
        )?;

        Ok(ApiResponse::success(DriverStatsResponse {
            total_drivers: counts.total,
            active_drivers: counts.active,
            inactive_drivers: counts.inactive,
            available_drivers: counts.available,
            vehicle_type_stats,
            experience_stats,
            recent_drivers,
        }))
    }

    pub async fn get_by_id(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<Driver>, AppError> {
        let driver = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Driver"))?;

        Ok(ApiResponse::success(driver))
    }

    pub async fn create(&self, admin_id: Uuid, request: CreateDriverRequest) -> Result<ApiResponse<Driver>, AppError> {
        let email = request.email.trim().to_lowercase();
        let license_number = request.license_number.trim().to_uppercase();

        if self.repository.email_exists(&email, None).await? {
            return Err(conflict_error("Driver", "email", &email));
        }
        if self.repository.license_exists(&license_number, None).await? {
            return Err(conflict_error("Driver", "license number", &license_number));
        }

        let number = self.repository.next_code_number().await?;
        let driver = self
            .repository
            .create(NewDriver {
                admin_id,
                driver_code: sequential_code(DRIVER_PREFIX, number, 3),
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                email,
                mobile: request.mobile,
                license_number,
                license_expiry: request.license_expiry,
                date_of_birth: request.date_of_birth,
                address: request.address,
                emergency_contact: request.emergency_contact,
                experience: request.experience.unwrap_or(0),
                vehicle_type: request.vehicle_type.unwrap_or_else(|| DEFAULT_VEHICLE_TYPE.to_string()),
            })
            .await?;

        info!("🧑‍✈️ Conductor creado: {} ({})", driver.driver_code, driver.full_name());
        Ok(ApiResponse::success_with_message(driver, "Driver created successfully"))
    }

    pub async fn update(
        &self,
        id: Uuid,
        admin_id: Uuid,
        mut request: UpdateDriverRequest,
    ) -> Result<ApiResponse<Driver>, AppError> {
        self.repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Driver"))?;

        if let Some(email) = request.email.as_mut() {
            *email = email.trim().to_lowercase();
            if self.repository.email_exists(email, Some(id)).await? {
                return Err(conflict_error("Driver", "email", email));
            }
        }
        if let Some(license_number) = request.license_number.as_mut() {
            *license_number = license_number.trim().to_uppercase();
            if self.repository.license_exists(license_number, Some(id)).await? {
                return Err(conflict_error("Driver", "license number", license_number));
            }
        }

        let driver = self.repository.update(id, admin_id, request).await?;
        Ok(ApiResponse::success_with_message(driver, "Driver updated successfully"))
    }

    /// Un conductor con viajes no se puede borrar
    pub async fn delete(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let driver = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Driver"))?;

        if self.repository.has_trips(id).await? {
            return Err(AppError::Conflict(
                "Driver has trips and cannot be deleted".to_string(),
            ));
        }

        self.repository.delete(id, admin_id).await?;
        info!("🗑️ Conductor eliminado: {}", driver.driver_code);
        Ok(ApiResponse::message("Driver deleted successfully"))
    }

    /// Active ↔ Inactive; la disponibilidad sigue al estado
    pub async fn toggle_status(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<DriverStatusResponse>, AppError> {
        let driver = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Driver"))?;

        let status = if driver.status == "Active" { "Inactive" } else { "Active" };
        let driver = self
            .repository
            .set_status(id, admin_id, status, status == "Active")
            .await?;

        Ok(ApiResponse::success_with_message(
            DriverStatusResponse {
                id: driver.id,
                full_name: driver.full_name(),
                driver_code: driver.driver_code,
                status: driver.status,
                is_available: driver.is_available,
            },
            format!("Driver status changed to {}", status),
        ))
    }
}
