//! Tokens de recuperación de contraseña
//!
//! El token en claro solo sale una vez hacia el administrador; en la base de
//! datos se guarda su hash SHA-256 junto con la caducidad.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Minutos de validez de un token
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

#[derive(Debug, Clone)]
pub struct ResetToken {
    pub token: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Hash hexadecimal con el que se busca el token
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Token aleatorio de 32 bytes en hexadecimal, caducando a los 10 minutos
pub fn generate_reset_token(now: DateTime<Utc>) -> ResetToken {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    let token: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();

    ResetToken {
        token_hash: hash_reset_token(&token),
        token,
        expires_at: now + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
    }
}

/// Un token sin caducidad o ya caducado no sirve
pub fn is_reset_token_valid(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.map(|expires| expires > now).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn test_generated_token_matches_its_hash() {
        let reset = generate_reset_token(at(0));

        assert_eq!(reset.token.len(), 64);
        assert!(reset.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(reset.token_hash, hash_reset_token(&reset.token));
        assert_ne!(reset.token_hash, reset.token);
        assert_eq!(reset.expires_at, at(10));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_reset_token(at(0)).token, generate_reset_token(at(0)).token);
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(
            hash_reset_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_reset_token(" abc "), hash_reset_token("abc"));
    }

    #[test]
    fn test_expiry() {
        let reset = generate_reset_token(at(0));

        assert!(is_reset_token_valid(Some(reset.expires_at), at(9)));
        assert!(!is_reset_token_valid(Some(reset.expires_at), at(10)));
        assert!(!is_reset_token_valid(Some(reset.expires_at), at(11)));
        assert!(!is_reset_token_valid(None, at(0)));
    }
}
