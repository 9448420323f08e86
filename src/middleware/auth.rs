//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación del administrador autenticado.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    repositories::admin_repository::AdminRepository,
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_bearer, verify_token},
    },
};

/// Cabecera propia para el JWT; `Authorization` queda para la autenticación básica
pub const TOKEN_HEADER: &str = "token";

/// Administrador autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub admin_id: Uuid,
    pub email: String,
    pub admin_name: String,
    pub company_name: String,
}

/// Buscar el token en la cabecera `token` y, si no, en `Authorization`
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer)
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(extract_bearer)
        })
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Access token is required".to_string()))?;

    // El token se valida antes de tocar la base de datos
    let claims = verify_token(token, &state.jwt_config())?;
    let admin_id = claims.admin_id()?;

    let admin = AdminRepository::new(state.pool.clone())
        .find_by_id(admin_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid token - admin not found".to_string()))?;

    if !admin.is_active {
        return Err(AppError::Unauthorized("Account is deactivated".to_string()));
    }

    debug!("🔐 Admin autenticado: {}", admin.email);

    request.extensions_mut().insert(AuthenticatedAdmin {
        admin_id: admin.id,
        email: admin.email,
        admin_name: admin.admin_name,
        company_name: admin.company_name,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("Bearer from-token"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-auth"));

        assert_eq!(extract_token(&headers), Some("from-token"));
    }

    #[test]
    fn test_falls_back_to_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("not-bearer"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-auth"));

        assert_eq!(extract_token(&headers), Some("from-auth"));
    }

    #[test]
    fn test_basic_credentials_are_not_a_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        assert_eq!(extract_token(&headers), None);
    }
}
