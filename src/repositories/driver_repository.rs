use chrono::NaiveDate;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common_dto::CategoryCount;
use crate::dto::driver_dto::{DriverListQuery, DriverSummary, UpdateDriverRequest};
use crate::models::driver::{Address, Driver, EmergencyContact};
use crate::utils::errors::AppError;

/// Datos de un conductor nuevo
pub struct NewDriver {
    pub admin_id: Uuid,
    pub driver_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub license_number: String,
    pub license_expiry: NaiveDate,
    pub date_of_birth: NaiveDate,
    pub address: Option<Address>,
    pub emergency_contact: Option<EmergencyContact>,
    pub experience: i32,
    pub vehicle_type: String,
}

/// Recuentos globales de conductores
#[derive(Debug, sqlx::FromRow)]
pub struct DriverCounts {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub available: i64,
}

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, admin_id: Uuid, filters: &DriverListQuery) {
        builder.push(" WHERE admin_id = ").push_bind(admin_id);

        if let Some(pattern) = filters.page_query().search_pattern() {
            builder.push(" AND (");
            let mut columns = builder.separated(" OR ");
            for column in ["driver_code", "first_name", "last_name", "email", "mobile", "license_number"] {
                columns.push(format!("{} ILIKE ", column));
                columns.push_bind_unseparated(pattern.clone());
            }
            builder.push(")");
        }
        if let Some(status) = filters.status.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND status = ").push_bind(status.to_string());
        }
        if let Some(vehicle_type) = filters.vehicle_type.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND vehicle_type = ").push_bind(vehicle_type.to_string());
        }
    }

    pub async fn list(&self, admin_id: Uuid, filters: &DriverListQuery) -> Result<(Vec<Driver>, i64), AppError> {
        let page = filters.page_query();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM drivers");
        Self::push_filters(&mut count, admin_id, filters);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM drivers");
        Self::push_filters(&mut select, admin_id, filters);
        select
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let drivers = select.build_query_as::<Driver>().fetch_all(&self.pool).await?;

        Ok((drivers, total))
    }

    pub async fn find_by_id(&self, id: Uuid, admin_id: Uuid) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    /// Conductores del inquilino, opcionalmente por estado
    pub async fn find_by_admin(&self, admin_id: Uuid, status: Option<&str>) -> Result<Vec<Driver>, AppError> {
        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT * FROM drivers
            WHERE admin_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(admin_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    pub async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM drivers WHERE email = $1 AND ($2::UUID IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn license_exists(&self, license_number: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM drivers WHERE license_number = $1 AND ($2::UUID IS NULL OR id <> $2))",
        )
        .bind(license_number)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn next_code_number(&self) -> Result<i64, AppError> {
        super::next_code_number(&self.pool, "drivers", "driver_code", "DRV").await
    }

    pub async fn create(&self, driver: NewDriver) -> Result<Driver, AppError> {
        let created = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (
                id, admin_id, driver_code, first_name, last_name, email, mobile,
                license_number, license_expiry, date_of_birth, address, emergency_contact,
                experience, vehicle_type
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(driver.admin_id)
        .bind(driver.driver_code)
        .bind(driver.first_name)
        .bind(driver.last_name)
        .bind(driver.email)
        .bind(driver.mobile)
        .bind(driver.license_number)
        .bind(driver.license_expiry)
        .bind(driver.date_of_birth)
        .bind(driver.address.map(Json))
        .bind(driver.emergency_contact.map(Json))
        .bind(driver.experience)
        .bind(driver.vehicle_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, id: Uuid, admin_id: Uuid, changes: UpdateDriverRequest) -> Result<Driver, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                mobile = COALESCE($6, mobile),
                license_number = COALESCE($7, license_number),
                license_expiry = COALESCE($8, license_expiry),
                date_of_birth = COALESCE($9, date_of_birth),
                address = COALESCE($10, address),
                emergency_contact = COALESCE($11, emergency_contact),
                experience = COALESCE($12, experience),
                vehicle_type = COALESCE($13, vehicle_type),
                status = COALESCE($14, status),
                is_available = COALESCE($15, is_available),
                updated_at = NOW()
            WHERE id = $1 AND admin_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.email)
        .bind(changes.mobile)
        .bind(changes.license_number)
        .bind(changes.license_expiry)
        .bind(changes.date_of_birth)
        .bind(changes.address.map(Json))
        .bind(changes.emergency_contact.map(Json))
        .bind(changes.experience)
        .bind(changes.vehicle_type)
        .bind(changes.status)
        .bind(changes.is_available)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;

        Ok(driver)
    }

    pub async fn set_status(&self, id: Uuid, admin_id: Uuid, status: &str, is_available: bool) -> Result<Driver, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers SET status = $3, is_available = $4, updated_at = NOW()
            WHERE id = $1 AND admin_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_id)
        .bind(status)
        .bind(is_available)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;

        Ok(driver)
    }

    pub async fn has_trips(&self, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM trips WHERE driver_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn delete(&self, id: Uuid, admin_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn counts(&self, admin_id: Uuid) -> Result<DriverCounts, AppError> {
        let counts = sqlx::query_as::<_, DriverCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'Active') AS active,
                   COUNT(*) FILTER (WHERE status = 'Inactive') AS inactive,
                   COUNT(*) FILTER (WHERE is_available) AS available
            FROM drivers WHERE admin_id = $1
            "#,
        )
        .bind(admin_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn vehicle_type_stats(&self, admin_id: Uuid) -> Result<Vec<CategoryCount>, AppError> {
        let stats = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT vehicle_type AS category, COUNT(*) AS count
            FROM drivers WHERE admin_id = $1
            GROUP BY vehicle_type ORDER BY count DESC, category
            "#,
        )
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    pub async fn experience_stats(&self, admin_id: Uuid) -> Result<Vec<CategoryCount>, AppError> {
        let stats = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT CASE
                       WHEN experience < 1 THEN 'Less than 1 year'
                       WHEN experience < 5 THEN '1-5 years'
                       WHEN experience < 10 THEN '5-10 years'
                       ELSE 'More than 10 years'
                   END AS category,
                   COUNT(*) AS count
            FROM drivers WHERE admin_id = $1
            GROUP BY 1 ORDER BY MIN(experience)
            "#,
        )
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    pub async fn recent(&self, admin_id: Uuid, limit: i64) -> Result<Vec<DriverSummary>, AppError> {
        let drivers = sqlx::query_as::<_, DriverSummary>(
            r#"
            SELECT id, driver_code, first_name, last_name, status, created_at
            FROM drivers WHERE admin_id = $1
            ORDER BY created_at DESC LIMIT $2
            "#,
        )
        .bind(admin_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }
}
