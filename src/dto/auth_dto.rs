use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::admin::Admin;
use crate::utils::validation::{validate_license_type, validate_mobile, validate_not_blank};

// Registro de un nuevo administrador
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub company_name: String,
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub admin_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_mobile")]
    pub mobile: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[validate(custom = "validate_license_type")]
    pub license_type: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub company_size: Option<String>,
    /// Meses
    #[validate(range(min = 1, max = 60))]
    pub subscription_period: Option<i32>,
}

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub admin_name: Option<String>,
    #[validate(custom = "validate_mobile")]
    pub mobile: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1), custom = "validate_not_blank")]
    pub token: String,
    #[validate(length(min = 6, max = 128))]
    pub new_password: String,
}

/// El token en claro solo viaja en la respuesta fuera de producción,
/// mientras no haya envío de correo.
#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

// Token más el administrador autenticado
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub admin: Admin,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub admin: Admin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "company_name": "Acme Haulage",
            "admin_name": "Ravi",
            "email": "ravi@acme.test",
            "mobile": "9876543210",
            "password": "secret1",
            "license_type": "Premium",
            "subscription_period": 24
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "company_name": "Acme Haulage",
            "admin_name": "Ravi",
            "email": "not-an-email",
            "mobile": "98",
            "password": "123",
            "license_type": "Gold",
            "subscription_period": 61
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["email", "mobile", "password", "license_type", "subscription_period"] {
            assert!(fields.contains_key(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_reset_password_validation() {
        let request: ResetPasswordRequest = serde_json::from_value(serde_json::json!({
            "token": "9f86d081884c7d65",
            "new_password": "newsecret"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let request: ResetPasswordRequest = serde_json::from_value(serde_json::json!({
            "token": "   ",
            "new_password": "short"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("token"));
        assert!(errors.field_errors().contains_key("new_password"));
    }
}
