//! HS256 JWT validation
//!
//! Tokens are issued by the auth frontend with a shared secret. This service
//! only needs to validate them and pull out the user id; the encoding side is
//! kept for tests and local tooling.

use crate::auth::models::JwtClaims;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pixlift_core::AppError;
use uuid::Uuid;

/// JWT service validating HS256 tokens signed with a shared secret
pub struct JwtService {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Token has expired".to_string())
                    }
                    _ => AppError::Unauthorized("Invalid or expired token".to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Issue a token for a user, valid for `ttl_seconds` from now
    pub fn issue_token(&self, user_id: Uuid, ttl_seconds: i64) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = JwtClaims {
            sub: user_id,
            exp: now + ttl_seconds,
            iat: now,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }
}
