//! Identity provider token verification
//!
//! The provider signs access tokens with a shared HS256 secret. This service
//! never issues tokens; it only checks signature, expiry and audience.

use anyhow::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Claims carried by provider access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| anyhow::anyhow!("Subject is not a user id"))
    }
}

/// Verifier with a pre-computed decoding key
#[derive(Clone)]
pub struct JwtService {
    decoding: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl JwtService {
    /// Call once at startup and keep in `AppState`
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);

        Self {
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Arc::new(validation),
        }
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn mint(sub: &str, aud: &str, expires_in: Duration, secret: &str) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            exp: (now + expires_in).timestamp(),
            iat: Some(now.timestamp()),
            aud: aud.to_string(),
            email: Some("ana@example.com".to_string()),
            role: Some("authenticated".to_string()),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn service() -> JwtService {
        JwtService::new(SECRET, "authenticated")
    }

    #[test]
    fn test_valid_provider_token() {
        let user_id = Uuid::new_v4();
        let token = mint(&user_id.to_string(), "authenticated", Duration::hours(1), SECRET);

        let claims = service().validate_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let token = mint(&Uuid::new_v4().to_string(), "anon", Duration::hours(1), SECRET);
        assert!(service().validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = mint(&Uuid::new_v4().to_string(), "authenticated", Duration::hours(-2), SECRET);
        assert!(service().validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = mint(&Uuid::new_v4().to_string(), "authenticated", Duration::hours(1), "other");
        assert!(service().validate_token(&token).is_err());
    }

    #[test]
    fn test_non_uuid_subject() {
        let token = mint("service-account", "authenticated", Duration::hours(1), SECRET);
        let claims = service().validate_token(&token).unwrap();
        assert!(claims.user_id().is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(service().validate_token("invalid.token.here").is_err());
    }
}
