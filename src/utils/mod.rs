//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT, tokens de recuperación y generación de códigos.

pub mod codes;
pub mod errors;
pub mod jwt;
pub mod password_reset;
pub mod validation;

pub use errors::{AppError, AppResult};
