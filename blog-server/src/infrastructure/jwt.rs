use crate::domain::{AuthToken, DomainError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    /// Id of the server-side `auth_tokens` row backing this token.
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, ttl_hours: i64) -> Result<Self, DomainError> {
        tracing::debug!(
            "Initializing JwtService with secret length: {}",
            secret.len()
        );

        if secret.is_empty() {
            return Err(DomainError::InternalError(
                "JWT secret must not be empty".to_string(),
            ));
        }

        if secret.len() < 32 {
            tracing::warn!(
                "JWT secret is too short ({} chars). Minimum recommended is 32 chars.",
                secret.len()
            );
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        })
    }

    /// Signs a fresh token and returns it with the record that has to be persisted for it.
    pub fn issue(&self, user_id: i64, username: &str) -> Result<(String, AuthToken), DomainError> {
        tracing::debug!(
            "Generating token for user_id: {}, username: {}",
            user_id,
            username
        );

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| DomainError::InternalError("Token expiry overflow".to_string()))?;

        let record = AuthToken {
            id: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at,
        };

        let claims = Claims {
            user_id,
            username: username.to_string(),
            jti: record.id.clone(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        match encode(&Header::default(), &claims, &self.encoding_key) {
            Ok(token) => {
                tracing::debug!("Token encoded successfully");
                Ok((token, record))
            }
            Err(e) => {
                tracing::error!("Failed to encode token: {}", e);
                Err(DomainError::InternalError(format!(
                    "Failed to generate token: {}",
                    e
                )))
            }
        }
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, DomainError> {
        match decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(token_data) => {
                tracing::debug!("Token verified for user_id: {}", token_data.claims.user_id);
                Ok(token_data.claims)
            }
            Err(e) => {
                tracing::warn!("Token verification failed: {}", e);
                Err(DomainError::Unauthorized("Invalid token.".to_string()))
            }
        }
    }
}
