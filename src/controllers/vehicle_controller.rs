use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, GroupFilter, UpdateVehicleRequest, VehicleListQuery, VehicleStatsResponse,
    VehicleStatusResponse,
};
use crate::models::vehicle::{Vehicle, VehicleWithGroup};
use crate::repositories::vehicle_group_repository::VehicleGroupRepository;
use crate::repositories::vehicle_repository::{NewVehicle, VehicleCategory, VehicleChanges, VehicleRepository};
use crate::utils::codes::{sequential_code, VEHICLE_PREFIX};
use crate::utils::errors::{conflict_error, not_found_error, AppError};

const DEFAULT_TRANSMISSION: &str = "Manual";
const DEFAULT_STATUS: &str = "Active";
const RECENT_LIMIT: i64 = 5;

pub struct VehicleController {
    repository: VehicleRepository,
    groups: VehicleGroupRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            groups: VehicleGroupRepository::new(pool),
        }
    }

    async fn ensure_group(&self, group_id: Uuid, admin_id: Uuid) -> Result<(), AppError> {
        self.groups
            .find_by_id(group_id, admin_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::BadRequest("Invalid vehicle group".to_string()))
    }

    pub async fn list(
        &self,
        admin_id: Uuid,
        query: VehicleListQuery,
    ) -> Result<ApiResponse<PaginatedResponse<VehicleWithGroup>>, AppError> {
        let group = match query.group_id.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
            Some(raw) => Some(
                GroupFilter::parse(raw).ok_or_else(|| AppError::BadRequest(format!("Invalid group_id '{}'", raw)))?,
            ),
            None => None,
        };

        let (vehicles, total) = self.repository.list(admin_id, &query, group).await?;
        Ok(ApiResponse::success(PaginatedResponse::new(vehicles, &query.page_query(), total)))
    }

    pub async fn stats(&self, admin_id: Uuid) -> Result<ApiResponse<VehicleStatsResponse>, AppError> {
        let (counts, status_stats, vehicle_type_stats, fuel_type_stats, recent_vehicles) = futures::try_join!(
            self.repository.counts(admin_id),
            self.repository.count_by(admin_id, VehicleCategory::Status),
            self.repository.count_by(admin_id, VehicleCategory::VehicleType),
            self.repository.count_by(admin_id, VehicleCategory::FuelType),
            self.repository.recent(admin_id, RECENT_LIMIT),
        )?;

        Ok(ApiResponse::success(VehicleStatsResponse {
            total_vehicles: counts.total,
            active_vehicles: counts.active,
            available_vehicles: counts.available,
            status_stats,
            vehicle_type_stats,
            fuel_type_stats,
            recent_vehicles,
        }))
    }

    pub async fn get_by_id(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<VehicleWithGroup>, AppError> {
        let vehicle = self
            .repository
            .find_with_group(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;

        Ok(ApiResponse::success(vehicle))
    }

    pub async fn create(&self, admin_id: Uuid, request: CreateVehicleRequest) -> Result<ApiResponse<Vehicle>, AppError> {
        let registration_number = request.registration_number.trim().to_uppercase();
        if self.repository.registration_exists(&registration_number, None).await? {
            return Err(conflict_error("Vehicle", "registration number", &registration_number));
        }
        if let Some(group_id) = request.group_id {
            self.ensure_group(group_id, admin_id).await?;
        }

        let capacity = request.capacity.unwrap_or_default();
        let insurance = request.insurance.unwrap_or_default();
        let number = self.repository.next_code_number().await?;

        let vehicle = self
            .repository
            .create(NewVehicle {
                admin_id,
                vehicle_code: sequential_code(VEHICLE_PREFIX, number, 3),
                registration_number,
                make: request.make.trim().to_string(),
                model: request.model.trim().to_string(),
                year: request.year,
                vehicle_type: request.vehicle_type,
                fuel_type: request.fuel_type,
                transmission: request.transmission.unwrap_or_else(|| DEFAULT_TRANSMISSION.to_string()),
                passenger_capacity: capacity.passengers.unwrap_or(0),
                cargo_capacity: capacity.cargo.unwrap_or(0),
                color: request.color,
                insurance_policy_number: insurance.policy_number,
                insurance_provider: insurance.provider,
                insurance_expiry: insurance.expiry_date,
                status: request.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                group_id: request.group_id,
            })
            .await?;

        info!("🚚 Vehículo creado: {} ({})", vehicle.vehicle_code, vehicle.registration_number);
        Ok(ApiResponse::success_with_message(vehicle, "Vehicle created successfully"))
    }

    pub async fn update(
        &self,
        id: Uuid,
        admin_id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        self.repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;

        let registration_number = request.registration_number.map(|r| r.trim().to_uppercase());
        if let Some(registration_number) = registration_number.as_deref() {
            if self.repository.registration_exists(registration_number, Some(id)).await? {
                return Err(conflict_error("Vehicle", "registration number", registration_number));
            }
        }
        if let Some(Some(group_id)) = request.group_id {
            self.ensure_group(group_id, admin_id).await?;
        }

        let capacity = request.capacity.unwrap_or_default();
        let insurance = request.insurance.unwrap_or_default();
        let changes = VehicleChanges {
            registration_number,
            make: request.make,
            model: request.model,
            year: request.year,
            vehicle_type: request.vehicle_type,
            fuel_type: request.fuel_type,
            transmission: request.transmission,
            passenger_capacity: capacity.passengers,
            cargo_capacity: capacity.cargo,
            color: request.color,
            insurance_policy_number: insurance.policy_number,
            insurance_provider: insurance.provider,
            insurance_expiry: insurance.expiry_date,
            status: request.status,
            is_available: request.is_available,
            group_id: request.group_id,
        };

        let vehicle = self.repository.update(id, admin_id, changes).await?;
        Ok(ApiResponse::success_with_message(vehicle, "Vehicle updated successfully"))
    }

    pub async fn delete(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;

        if self.repository.has_trips(id).await? {
            return Err(AppError::Conflict(
                "Vehicle has trips and cannot be deleted".to_string(),
            ));
        }

        self.repository.delete(id, admin_id).await?;
        info!("🗑️ Vehículo eliminado: {}", vehicle.vehicle_code);
        Ok(ApiResponse::message("Vehicle deleted successfully"))
    }

    pub async fn toggle_status(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<VehicleStatusResponse>, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;

        let status = if vehicle.status == "Active" { "Inactive" } else { "Active" };
        let vehicle = self
            .repository
            .set_status(id, admin_id, status, status == "Active")
            .await?;

        Ok(ApiResponse::success_with_message(
            VehicleStatusResponse {
                id: vehicle.id,
                vehicle_code: vehicle.vehicle_code,
                registration_number: vehicle.registration_number,
                status: vehicle.status,
                is_available: vehicle.is_available,
            },
            format!("Vehicle status changed to {}", status),
        ))
    }
}
