use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::vehicle_group_dto::{
    CreateVehicleGroupRequest, UpdateVehicleGroupRequest, VehicleGroupListQuery, VehicleGroupStatsResponse,
};
use crate::models::vehicle::Vehicle;
use crate::models::vehicle_group::{VehicleGroup, VehicleGroupWithCount};
use crate::repositories::vehicle_group_repository::VehicleGroupRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError};

const RECENT_LIMIT: i64 = 5;

pub struct VehicleGroupController {
    repository: VehicleGroupRepository,
    vehicles: VehicleRepository,
}

impl VehicleGroupController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleGroupRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        admin_id: Uuid,
        query: VehicleGroupListQuery,
    ) -> Result<ApiResponse<PaginatedResponse<VehicleGroupWithCount>>, AppError> {
        let (groups, total) = self.repository.list(admin_id, &query).await?;
        Ok(ApiResponse::success(PaginatedResponse::new(groups, &query.page_query(), total)))
    }

    pub async fn stats(&self, admin_id: Uuid) -> Result<ApiResponse<VehicleGroupStatsResponse>, AppError> {
        let (counts, groups_with_counts, recent_groups) = futures::try_join!(
            self.repository.counts(admin_id),
            self.repository.all_with_counts(admin_id),
            self.repository.recent(admin_id, RECENT_LIMIT),
        )?;

        Ok(ApiResponse::success(VehicleGroupStatsResponse {
            total_groups: counts.total,
            active_groups: counts.active,
            inactive_groups: counts.inactive,
            groups_with_counts,
            recent_groups,
        }))
    }

    pub async fn get_by_id(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<VehicleGroupWithCount>, AppError> {
        let group = self
            .repository
            .find_with_count(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle group"))?;

        Ok(ApiResponse::success(group))
    }

    pub async fn vehicles(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<Vec<Vehicle>>, AppError> {
        self.repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle group"))?;

        let vehicles = self.vehicles.find_by_group(id, admin_id).await?;
        Ok(ApiResponse::success(vehicles))
    }

    pub async fn create(
        &self,
        admin_id: Uuid,
        request: CreateVehicleGroupRequest,
    ) -> Result<ApiResponse<VehicleGroup>, AppError> {
        if self.repository.name_exists(admin_id, &request.group_name, None).await? {
            return Err(conflict_error("Vehicle group", "name", request.group_name.trim()));
        }

        let description = request.description.unwrap_or_default();
        let group = self.repository.create(admin_id, &request.group_name, &description).await?;

        info!("📦 Grupo de vehículos creado: {}", group.group_name);
        Ok(ApiResponse::success_with_message(group, "Vehicle group created successfully"))
    }

    pub async fn update(
        &self,
        id: Uuid,
        admin_id: Uuid,
        request: UpdateVehicleGroupRequest,
    ) -> Result<ApiResponse<VehicleGroup>, AppError> {
        self.repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle group"))?;

        if let Some(name) = request.group_name.as_deref() {
            if self.repository.name_exists(admin_id, name, Some(id)).await? {
                return Err(conflict_error("Vehicle group", "name", name.trim()));
            }
        }

        let group = self.repository.update(id, admin_id, request).await?;
        Ok(ApiResponse::success_with_message(group, "Vehicle group updated successfully"))
    }

    pub async fn toggle_status(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<VehicleGroup>, AppError> {
        let group = self.repository.toggle_active(id, admin_id).await?;
        let message = if group.is_active {
            "Vehicle group activated"
        } else {
            "Vehicle group deactivated"
        };

        Ok(ApiResponse::success_with_message(group, message))
    }

    /// Un grupo con vehículos asignados no se puede borrar
    pub async fn delete(&self, id: Uuid, admin_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let group = self
            .repository
            .find_by_id(id, admin_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle group"))?;

        let assigned = self.repository.vehicle_count(id).await?;
        if assigned > 0 {
            return Err(AppError::Conflict(format!(
                "Vehicle group has {} assigned vehicles and cannot be deleted",
                assigned
            )));
        }

        self.repository.delete(id, admin_id).await?;
        info!("🗑️ Grupo de vehículos eliminado: {}", group.group_name);
        Ok(ApiResponse::message("Vehicle group deleted successfully"))
    }
}
