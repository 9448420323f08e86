//! Middleware de autenticación básica
//!
//! Todas las rutas de la API exigen unas credenciales compartidas en
//! `Authorization: Basic ...`, salvo el health check.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{state::AppState, utils::errors::AppError};

const PUBLIC_PATHS: &[&str] = &["/health", "/api/health"];

/// Decodificar `Basic <base64(user:password)>`
pub fn parse_basic_credentials(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| value.starts_with("Basic "))
        .ok_or_else(|| AppError::Unauthorized("Basic authentication required".to_string()))?;

    let (username, password) = parse_basic_credentials(header_value)
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    if username != state.config.basic_auth_username || password != state.config.basic_auth_password {
        return Err(AppError::Unauthorized(
            "Invalid basic authentication credentials".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_credentials() {
        let value = format!("Basic {}", STANDARD.encode("fleet:s3cr:et"));
        assert_eq!(
            parse_basic_credentials(&value),
            Some(("fleet".to_string(), "s3cr:et".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_basic_credentials("Basic !!!"), None);
        assert_eq!(parse_basic_credentials("Bearer abc"), None);
        let no_colon = format!("Basic {}", STANDARD.encode("nocolon"));
        assert_eq!(parse_basic_credentials(&no_colon), None);
    }
}
