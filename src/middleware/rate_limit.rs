//! Middleware de Rate Limiting
//!
//! Ventana fija en memoria por IP de cliente. Hay un limitador general para
//! la API y otro más estricto para `/api/auth`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tokio::sync::Mutex;
use tracing::warn;

use crate::utils::errors::AppError;

/// Rutas que nunca cuentan para el limitador general
const EXEMPT_PATHS: &[&str] = &["/health", "/welcome", "/api/health", "/api/welcome"];

#[derive(Debug, Clone, Copy)]
struct Window {
    requests: u32,
    started: Instant,
}

/// Estado de un limitador
#[derive(Clone)]
pub struct RateLimitState {
    windows: Arc<Mutex<HashMap<String, Window>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimitState {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    /// Contar una request de `client` en el instante `now`
    pub async fn check_at(&self, client: &str, now: Instant) -> Result<(), AppError> {
        let mut windows = self.windows.lock().await;
        windows.retain(|_, w| now.duration_since(w.started) < self.window);

        let entry = windows.entry(client.to_string()).or_insert(Window {
            requests: 0,
            started: now,
        });

        if entry.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }
        entry.requests += 1;
        Ok(())
    }

    pub async fn check(&self, client: &str) -> Result<(), AppError> {
        self.check_at(client, Instant::now()).await
    }
}

/// IP del cliente según `x-forwarded-for` o `x-real-ip`
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|h| h.to_str().ok()))
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Limitador general de la API
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path();
    let exempt = EXEMPT_PATHS.contains(&path) || path.starts_with("/auth") || path.starts_with("/api/auth");

    if !exempt {
        let ip = client_ip(request.headers());
        if let Err(e) = limiter.check(&ip).await {
            warn!("🚦 Rate limit excedido para {}", ip);
            return Err(e);
        }
    }

    Ok(next.run(request).await)
}

/// Limitador de los endpoints de autenticación
pub async fn auth_rate_limit_middleware(
    State(limiter): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(request.headers());
    if let Err(e) = limiter.check(&ip).await {
        warn!("🚦 Demasiados intentos de autenticación desde {}", ip);
        return Err(e);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn test_limit_is_enforced_per_client() {
        let limiter = RateLimitState::new(2, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("1.1.1.1", now).await.is_ok());
        assert!(limiter.check_at("1.1.1.1", now).await.is_ok());
        assert!(matches!(
            limiter.check_at("1.1.1.1", now).await,
            Err(AppError::RateLimitExceeded)
        ));
        assert!(limiter.check_at("2.2.2.2", now).await.is_ok());
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimitState::new(1, Duration::from_secs(10));
        let start = Instant::now();

        assert!(limiter.check_at("ip", start).await.is_ok());
        assert!(limiter.check_at("ip", start + Duration::from_secs(5)).await.is_err());
        assert!(limiter.check_at("ip", start + Duration::from_secs(11)).await.is_ok());
    }

    #[test]
    fn test_client_ip() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), "unknown");

        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), "10.0.0.2");

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&headers), "203.0.113.7");
    }
}
