use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::trip_controller::TripController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::trip_dto::{
    CreateTripRequest, TripListQuery, TripResponse, TripStatsResponse, UpdateTripRequest, UpdateTripStatusRequest,
};
use crate::middleware::auth::AuthenticatedAdmin;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route("/stats", get(trip_stats))
        .route("/:id", get(get_trip).put(update_trip).delete(delete_trip))
        .route("/:id/status", patch(update_trip_status))
}

fn controller(state: &AppState) -> TripController {
    TripController::new(state.pool.clone(), state.calculator)
}

async fn list_trips(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Query(query): Query<TripListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<TripResponse>>>, AppError> {
    Ok(Json(controller(&state).list(admin.admin_id, query).await?))
}

async fn trip_stats(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
) -> Result<Json<ApiResponse<TripStatsResponse>>, AppError> {
    Ok(Json(controller(&state).stats(admin.admin_id).await?))
}

async fn get_trip(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    Ok(Json(controller(&state).get_by_id(id, admin.admin_id).await?))
}

async fn create_trip(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Json(request): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TripResponse>>), AppError> {
    request.validate()?;
    let response = controller(&state).create(admin.admin_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_trip(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    request.validate()?;
    Ok(Json(controller(&state).update(id, admin.admin_id, request).await?))
}

async fn update_trip_status(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTripStatusRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    request.validate()?;
    Ok(Json(controller(&state).update_status(id, admin.admin_id, request).await?))
}

async fn delete_trip(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    Ok(Json(controller(&state).delete(id, admin.admin_id).await?))
}
