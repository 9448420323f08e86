use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{
    AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, ProfileResponse, RegisterRequest,
    ResetPasswordRequest, UpdateProfileRequest,
};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedAdmin};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas de autenticación. `/profile` exige JWT.
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgotPassword", put(forgot_password))
        .route("/resetPassword", put(reset_password))
        .merge(protected)
}

fn controller(state: &AppState) -> AuthController {
    AuthController::new(state.pool.clone(), state.jwt_config())
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    request.validate()?;
    let response = controller(&state).register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    request.validate()?;
    let response = controller(&state).login(request).await?;
    Ok(Json(response))
}

async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<ForgotPasswordResponse>>, AppError> {
    request.validate()?;
    // Sin envío de correo, el token solo se devuelve fuera de producción
    let expose_token = !state.config.is_production();
    let response = controller(&state).forgot_password(request, expose_token).await?;
    Ok(Json(response))
}

async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    request.validate()?;
    let response = controller(&state).reset_password(request).await?;
    Ok(Json(response))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
) -> Result<Json<ApiResponse<ProfileResponse>>, AppError> {
    let response = controller(&state).profile(admin.admin_id).await?;
    Ok(Json(response))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, AppError> {
    request.validate()?;
    let response = controller(&state).update_profile(admin.admin_id, request).await?;
    Ok(Json(response))
}
