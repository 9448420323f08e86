use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::report_controller::ReportController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::report_dto::{
    DashboardResponse, DriverReportRow, ProjectReportRow, Report, ReportQuery, TripReportRow, VehicleReportRow,
};
use crate::middleware::auth::AuthenticatedAdmin;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/vehicles", get(vehicle_report))
        .route("/drivers", get(driver_report))
        .route("/projects", get(project_report))
        .route("/trips", get(trip_report))
}

fn controller(state: &AppState) -> ReportController {
    ReportController::new(state.pool.clone(), state.aggregator())
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<DashboardResponse>>, AppError> {
    Ok(Json(controller(&state).dashboard(admin.admin_id, query).await?))
}

async fn vehicle_report(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<Report<VehicleReportRow>>>, AppError> {
    Ok(Json(controller(&state).vehicles(admin.admin_id, query).await?))
}

async fn driver_report(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<Report<DriverReportRow>>>, AppError> {
    Ok(Json(controller(&state).drivers(admin.admin_id, query).await?))
}

async fn project_report(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<Report<ProjectReportRow>>>, AppError> {
    Ok(Json(controller(&state).projects(admin.admin_id, query).await?))
}

async fn trip_report(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<Report<TripReportRow>>>, AppError> {
    Ok(Json(controller(&state).trips(admin.admin_id, query).await?))
}
