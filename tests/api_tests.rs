use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use tower::ServiceExt;

use transport_backoffice::config::{DatabaseConfig, EnvironmentConfig};
use transport_backoffice::utils::jwt::{generate_token, JwtConfig};
use transport_backoffice::{create_router, AppState};

/// Router con un pool perezoso: ninguna de estas pruebas llega a la base de datos
fn create_test_app() -> Router {
    let config = EnvironmentConfig::default();
    let pool = DatabaseConfig::new(config.database_url.clone())
        .create_lazy_pool()
        .expect("lazy pool");
    create_router(AppState::new(pool, config))
}

fn basic_auth() -> String {
    format!("Basic {}", STANDARD.encode("admin:admin"))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check_is_public() {
    let response = create_test_app()
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_basic_auth_is_required() {
    let response = create_test_app()
        .oneshot(Request::get("/api/welcome").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_wrong_basic_credentials_are_rejected() {
    let response = create_test_app()
        .oneshot(
            Request::get("/api/test-auth")
                .header(header::AUTHORIZATION, format!("Basic {}", STANDARD.encode("admin:nope")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_endpoint_with_basic_credentials() {
    let response = create_test_app()
        .oneshot(
            Request::get("/api/test-auth")
                .header(header::AUTHORIZATION, basic_auth())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_tenant_routes_require_token() {
    let response = create_test_app()
        .oneshot(
            Request::get("/api/driver")
                .header(header::AUTHORIZATION, basic_auth())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let response = create_test_app()
        .oneshot(
            Request::get("/api/trip/stats")
                .header(header::AUTHORIZATION, basic_auth())
                .header("token", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let other = JwtConfig {
        secret: "another-secret".to_string(),
        ..JwtConfig::from(&EnvironmentConfig::default())
    };
    let token = generate_token(uuid::Uuid::new_v4(), &other).unwrap();

    let response = create_test_app()
        .oneshot(
            Request::get("/api/report/dashboard")
                .header(header::AUTHORIZATION, basic_auth())
                .header("token", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_invalid_payload() {
    let response = create_test_app()
        .oneshot(
            Request::post("/api/auth/register")
                .header(header::AUTHORIZATION, basic_auth())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "admin_name": "",
                        "email": "not-an-email",
                        "password": "short",
                        "mobile": "123",
                        "company_name": "Fleet"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_route_returns_not_found() {
    let response = create_test_app()
        .oneshot(
            Request::get("/api/does-not-exist")
                .header(header::AUTHORIZATION, basic_auth())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "ROUTE_NOT_FOUND");
    assert_eq!(body["message"], "Route /api/does-not-exist not found");
}

#[tokio::test]
async fn test_path_outside_api_returns_not_found() {
    let response = create_test_app()
        .oneshot(Request::get("/dashboard/old").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Route /dashboard/old not found");
}

#[tokio::test]
async fn test_forgot_password_requires_valid_email() {
    let response = create_test_app()
        .oneshot(
            Request::put("/api/auth/forgotPassword")
                .header(header::AUTHORIZATION, basic_auth())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "email": "nobody" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_reset_password_rejects_short_password() {
    let response = create_test_app()
        .oneshot(
            Request::put("/api/auth/resetPassword")
                .header(header::AUTHORIZATION, basic_auth())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "token": "abc123", "new_password": "123" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
