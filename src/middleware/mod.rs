//! Middleware del sistema
//!
//! Este módulo contiene el middleware para autenticación, CORS, rate limiting
//! y otras funcionalidades de seguridad.

pub mod auth;
pub mod basic_auth;
pub mod cors;
pub mod rate_limit;

pub use auth::{auth_middleware, AuthenticatedAdmin};
pub use basic_auth::basic_auth_middleware;
pub use cors::cors_middleware;
pub use rate_limit::{auth_rate_limit_middleware, rate_limit_middleware, RateLimitState};
