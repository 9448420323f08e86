use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::project_controller::ProjectController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::project_dto::{CreateProjectRequest, ProjectListQuery, ProjectStatsResponse, UpdateProjectRequest};
use crate::middleware::auth::AuthenticatedAdmin;
use crate::models::project::Project;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_project_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/stats", get(project_stats))
        .route("/:id", get(get_project).put(update_project).delete(delete_project))
        .route("/:id/toggle-status", patch(toggle_project_status))
}

async fn list_projects(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<Project>>>, AppError> {
    let controller = ProjectController::new(state.pool.clone());
    Ok(Json(controller.list(admin.admin_id, query).await?))
}

async fn project_stats(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
) -> Result<Json<ApiResponse<ProjectStatsResponse>>, AppError> {
    let controller = ProjectController::new(state.pool.clone());
    Ok(Json(controller.stats(admin.admin_id).await?))
}

async fn get_project(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Project>>, AppError> {
    let controller = ProjectController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id, admin.admin_id).await?))
}

async fn create_project(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), AppError> {
    request.validate()?;
    let controller = ProjectController::new(state.pool.clone());
    let response = controller.create(admin.admin_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_project(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, AppError> {
    request.validate()?;
    let controller = ProjectController::new(state.pool.clone());
    Ok(Json(controller.update(id, admin.admin_id, request).await?))
}

async fn delete_project(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ProjectController::new(state.pool.clone());
    Ok(Json(controller.delete(id, admin.admin_id).await?))
}

async fn toggle_project_status(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Project>>, AppError> {
    let controller = ProjectController::new(state.pool.clone());
    Ok(Json(controller.toggle_status(id, admin.admin_id).await?))
}
