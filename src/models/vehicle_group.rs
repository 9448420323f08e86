//! Modelo de VehicleGroup

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleGroup {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub group_name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Grupo con el número de vehículos asignados
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VehicleGroupWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub group: VehicleGroup,
    pub vehicle_count: i64,
}
