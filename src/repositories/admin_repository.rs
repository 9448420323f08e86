use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::admin::Admin;
use crate::utils::errors::AppError;

/// Datos de un administrador nuevo
pub struct NewAdmin {
    pub admin_code: String,
    pub company_name: String,
    pub admin_name: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: String,
    pub license_type: String,
    pub company_size: String,
    pub subscription_period: i32,
    pub subscription_end: DateTime<Utc>,
}

pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM admins WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn next_code_number(&self) -> Result<i64, AppError> {
        super::next_code_number(&self.pool, "admins", "admin_code", "ADM").await
    }

    pub async fn create(&self, admin: NewAdmin) -> Result<Admin, AppError> {
        let created = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (
                id, admin_code, company_name, admin_name, email, mobile, password_hash,
                license_type, company_size, subscription_period, subscription_end
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(admin.admin_code)
        .bind(admin.company_name)
        .bind(admin.admin_name)
        .bind(admin.email)
        .bind(admin.mobile)
        .bind(admin.password_hash)
        .bind(admin.license_type)
        .bind(admin.company_size)
        .bind(admin.subscription_period)
        .bind(admin.subscription_end)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn touch_last_login(&self, id: Uuid) -> Result<Admin, AppError> {
        let admin = sqlx::query_as::<_, Admin>(
            "UPDATE admins SET last_login = NOW(), updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        admin_name: Option<String>,
        mobile: Option<String>,
    ) -> Result<Admin, AppError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            UPDATE admins
            SET admin_name = COALESCE($2, admin_name),
                mobile = COALESCE($3, mobile),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_name)
        .bind(mobile)
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE admins
            SET reset_password_token = $2,
                reset_password_expires = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE reset_password_token = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    /// Guardar la nueva contraseña y consumir el token
    pub async fn reset_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE admins
            SET password_hash = $2,
                reset_password_token = NULL,
                reset_password_expires = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
