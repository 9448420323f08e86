use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleListQuery, VehicleStatsResponse, VehicleStatusResponse,
};
use crate::middleware::auth::AuthenticatedAdmin;
use crate::models::vehicle::{Vehicle, VehicleWithGroup};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/stats", get(vehicle_stats))
        .route("/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
        .route("/:id/toggle-status", patch(toggle_vehicle_status))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Query(query): Query<VehicleListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<VehicleWithGroup>>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.list(admin.admin_id, query).await?))
}

async fn vehicle_stats(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
) -> Result<Json<ApiResponse<VehicleStatsResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.stats(admin.admin_id).await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleWithGroup>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id, admin.admin_id).await?))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vehicle>>), AppError> {
    request.validate()?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(admin.admin_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    request.validate()?;
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.update(id, admin.admin_id, request).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.delete(id, admin.admin_id).await?))
}

async fn toggle_vehicle_status(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleStatusResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.toggle_status(id, admin.admin_id).await?))
}
