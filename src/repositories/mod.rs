//! Repositorios
//!
//! Acceso a PostgreSQL por recurso. Todas las consultas de recursos de un
//! inquilino filtran por `admin_id`.

pub mod admin_repository;
pub mod driver_repository;
pub mod project_repository;
pub mod trip_repository;
pub mod vehicle_group_repository;
pub mod vehicle_repository;

use sqlx::PgPool;

use crate::utils::errors::AppError;

/// Siguiente número de un código secuencial (`VEH001`, `PRJ02`...)
pub(crate) async fn next_code_number(
    pool: &PgPool,
    table: &'static str,
    column: &'static str,
    prefix: &'static str,
) -> Result<i64, AppError> {
    let sql = format!(
        "SELECT COALESCE(MAX(CAST(SUBSTRING({column} FROM {start}) AS BIGINT)), 0) + 1 \
         FROM {table} WHERE {column} ~ '^{prefix}[0-9]+$'",
        column = column,
        table = table,
        prefix = prefix,
        start = prefix.len() + 1,
    );

    let next: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(next)
}
