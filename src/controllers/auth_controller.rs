use chrono::{Months, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::auth_dto::{
    AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, ProfileResponse, RegisterRequest,
    ResetPasswordRequest, UpdateProfileRequest,
};
use crate::dto::common_dto::ApiResponse;
use crate::repositories::admin_repository::{AdminRepository, NewAdmin};
use crate::utils::codes::{sequential_code, ADMIN_PREFIX};
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::jwt::{generate_token, JwtConfig};
use crate::utils::password_reset::{generate_reset_token, hash_reset_token, is_reset_token_valid};

const DEFAULT_LICENSE_TYPE: &str = "Basic";
const DEFAULT_COMPANY_SIZE: &str = "1-10";
const DEFAULT_SUBSCRIPTION_MONTHS: i32 = 12;

pub struct AuthController {
    repository: AdminRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            repository: AdminRepository::new(pool),
            jwt,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<ApiResponse<AuthResponse>, AppError> {
        let email = request.email.trim().to_lowercase();

        if self.repository.email_exists(&email).await? {
            return Err(conflict_error("Admin", "email", &email));
        }

        let password_hash =
            bcrypt::hash(&request.password, bcrypt::DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?;

        let subscription_period = request.subscription_period.unwrap_or(DEFAULT_SUBSCRIPTION_MONTHS);
        let subscription_end = Utc::now()
            .checked_add_months(Months::new(subscription_period as u32))
            .ok_or_else(|| AppError::BadRequest("Invalid subscription period".to_string()))?;

        let number = self.repository.next_code_number().await?;
        let admin = self
            .repository
            .create(NewAdmin {
                admin_code: sequential_code(ADMIN_PREFIX, number, 3),
                company_name: request.company_name.trim().to_string(),
                admin_name: request.admin_name.trim().to_string(),
                email,
                mobile: request.mobile,
                password_hash,
                license_type: request.license_type.unwrap_or_else(|| DEFAULT_LICENSE_TYPE.to_string()),
                company_size: request.company_size.unwrap_or_else(|| DEFAULT_COMPANY_SIZE.to_string()),
                subscription_period,
                subscription_end,
            })
            .await?;

        info!("🆕 Admin registrado: {} ({})", admin.admin_code, admin.email);

        let token = generate_token(admin.id, &self.jwt)?;
        Ok(ApiResponse::success_with_message(
            AuthResponse { token, admin },
            "Admin registered successfully",
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<ApiResponse<AuthResponse>, AppError> {
        let email = request.email.trim().to_lowercase();
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let admin = self.repository.find_by_email(&email).await?.ok_or_else(invalid)?;

        if !admin.is_active {
            warn!("🚫 Login de cuenta desactivada: {}", email);
            return Err(AppError::Unauthorized("Account is deactivated".to_string()));
        }

        let valid = bcrypt::verify(&request.password, &admin.password_hash).map_err(|e| AppError::Hash(e.to_string()))?;
        if !valid {
            warn!("🔑 Contraseña incorrecta para {}", email);
            return Err(invalid());
        }

        let admin = self.repository.touch_last_login(admin.id).await?;
        let token = generate_token(admin.id, &self.jwt)?;

        info!("✅ Login correcto: {}", admin.email);
        Ok(ApiResponse::success_with_message(
            AuthResponse { token, admin },
            "Login successful",
        ))
    }

    /// Generar un token de recuperación de 10 minutos. `expose_token` lo
    /// devuelve en la respuesta.
    pub async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
        expose_token: bool,
    ) -> Result<ApiResponse<ForgotPasswordResponse>, AppError> {
        let email = request.email.trim().to_lowercase();
        let admin = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("Email not found".to_string()))?;

        let reset = generate_reset_token(Utc::now());
        self.repository
            .set_reset_token(admin.id, &reset.token_hash, reset.expires_at)
            .await?;

        info!("📧 Token de recuperación generado para {}", admin.email);
        Ok(ApiResponse::success_with_message(
            ForgotPasswordResponse {
                reset_token: expose_token.then_some(reset.token),
                expires_at: reset.expires_at,
            },
            "Password reset instructions sent to your email",
        ))
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<ApiResponse<()>, AppError> {
        let invalid = || AppError::BadRequest("Invalid or expired reset token".to_string());

        let admin = self
            .repository
            .find_by_reset_token(&hash_reset_token(&request.token))
            .await?
            .ok_or_else(invalid)?;

        if !is_reset_token_valid(admin.reset_password_expires, Utc::now()) {
            warn!("⌛ Token de recuperación caducado para {}", admin.email);
            return Err(invalid());
        }

        let password_hash =
            bcrypt::hash(&request.new_password, bcrypt::DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?;
        self.repository.reset_password(admin.id, &password_hash).await?;

        info!("🔑 Contraseña restablecida: {}", admin.email);
        Ok(ApiResponse::message("Password reset successfully"))
    }

    pub async fn profile(&self, admin_id: Uuid) -> Result<ApiResponse<ProfileResponse>, AppError> {
        let admin = self
            .repository
            .find_by_id(admin_id)
            .await?
            .ok_or_else(|| not_found_error("Admin"))?;

        Ok(ApiResponse::success(ProfileResponse { admin }))
    }

    pub async fn update_profile(
        &self,
        admin_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<ApiResponse<ProfileResponse>, AppError> {
        let admin = self
            .repository
            .update_profile(
                admin_id,
                request.admin_name.map(|name| name.trim().to_string()),
                request.mobile,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            ProfileResponse { admin },
            "Profile updated successfully",
        ))
    }
}
