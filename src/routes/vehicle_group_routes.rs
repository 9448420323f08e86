use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::vehicle_group_controller::VehicleGroupController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::vehicle_group_dto::{
    CreateVehicleGroupRequest, UpdateVehicleGroupRequest, VehicleGroupListQuery, VehicleGroupStatsResponse,
};
use crate::middleware::auth::AuthenticatedAdmin;
use crate::models::vehicle::Vehicle;
use crate::models::vehicle_group::{VehicleGroup, VehicleGroupWithCount};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_group_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route("/stats", get(group_stats))
        .route("/:id", get(get_group).put(update_group).delete(delete_group))
        .route("/:id/vehicles", get(group_vehicles))
        .route("/:id/toggle-status", patch(toggle_group_status))
}

async fn list_groups(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Query(query): Query<VehicleGroupListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<VehicleGroupWithCount>>>, AppError> {
    let controller = VehicleGroupController::new(state.pool.clone());
    Ok(Json(controller.list(admin.admin_id, query).await?))
}

async fn group_stats(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
) -> Result<Json<ApiResponse<VehicleGroupStatsResponse>>, AppError> {
    let controller = VehicleGroupController::new(state.pool.clone());
    Ok(Json(controller.stats(admin.admin_id).await?))
}

async fn get_group(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleGroupWithCount>>, AppError> {
    let controller = VehicleGroupController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id, admin.admin_id).await?))
}

async fn group_vehicles(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    let controller = VehicleGroupController::new(state.pool.clone());
    Ok(Json(controller.vehicles(id, admin.admin_id).await?))
}

async fn create_group(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Json(request): Json<CreateVehicleGroupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleGroup>>), AppError> {
    request.validate()?;
    let controller = VehicleGroupController::new(state.pool.clone());
    let response = controller.create(admin.admin_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_group(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleGroupRequest>,
) -> Result<Json<ApiResponse<VehicleGroup>>, AppError> {
    request.validate()?;
    let controller = VehicleGroupController::new(state.pool.clone());
    Ok(Json(controller.update(id, admin.admin_id, request).await?))
}

async fn delete_group(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleGroupController::new(state.pool.clone());
    Ok(Json(controller.delete(id, admin.admin_id).await?))
}

async fn toggle_group_status(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleGroup>>, AppError> {
    let controller = VehicleGroupController::new(state.pool.clone());
    Ok(Json(controller.toggle_status(id, admin.admin_id).await?))
}
