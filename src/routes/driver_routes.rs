use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::driver_controller::DriverController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::driver_dto::{
    CreateDriverRequest, DriverListQuery, DriverStatsResponse, DriverStatusResponse, UpdateDriverRequest,
};
use crate::middleware::auth::AuthenticatedAdmin;
use crate::models::driver::Driver;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/stats", get(driver_stats))
        .route("/:id", get(get_driver).put(update_driver).delete(delete_driver))
        .route("/:id/toggle-status", patch(toggle_driver_status))
}

async fn list_drivers(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Query(query): Query<DriverListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<Driver>>>, AppError> {
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.list(admin.admin_id, query).await?))
}

async fn driver_stats(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
) -> Result<Json<ApiResponse<DriverStatsResponse>>, AppError> {
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.stats(admin.admin_id).await?))
}

async fn get_driver(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id, admin.admin_id).await?))
}

async fn create_driver(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Json(request): Json<CreateDriverRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Driver>>), AppError> {
    request.validate()?;
    let controller = DriverController::new(state.pool.clone());
    let response = controller.create(admin.admin_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_driver(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    request.validate()?;
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.update(id, admin.admin_id, request).await?))
}

async fn delete_driver(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.delete(id, admin.admin_id).await?))
}

async fn toggle_driver_status(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DriverStatusResponse>>, AppError> {
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.toggle_status(id, admin.admin_id).await?))
}
