//! Modelo de Admin
//!
//! El administrador es el inquilino del sistema: todos los conductores,
//! vehículos, proyectos y viajes le pertenecen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const LICENSE_TYPES: &[&str] = &["Basic", "Standard", "Premium"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub admin_code: String,
    pub company_name: String,
    pub admin_name: String,
    pub email: String,
    pub mobile: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub license_type: String,
    pub company_size: String,
    pub subscription_period: i32,
    pub subscription_end: DateTime<Utc>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
