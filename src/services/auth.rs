use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::instrument;

use crate::{config::Config, error::AppResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub exp: i64,
    pub iat: i64,
}

/// Bearer-token identity. Tokens are issued by the host application; this
/// service only needs to verify them.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    #[instrument(name = "auth.validate_token", skip(self, token))]
    pub fn validate_token(&self, token: &str) -> AppResult<i32> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims.sub)
    }

    pub fn issue_token(&self, user_id: i32, expires_in: Duration) -> AppResult<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + expires_in;

        let claims = Claims {
            sub: user_id,
            exp: exp.unix_timestamp(),
            iat: now.unix_timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> AuthService {
        AuthService::new(&Config::for_testing(secret))
    }

    #[test]
    fn test_issue_and_validate_token() {
        let auth = service("test-secret-key-for-jwt");
        let token = auth
            .issue_token(42, Duration::hours(24))
            .expect("encoding should succeed");

        assert_eq!(auth.validate_token(&token).expect("valid token"), 42);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = service("test-secret-key-for-jwt");
        let token = auth
            .issue_token(42, Duration::hours(-1))
            .expect("encoding should succeed");

        assert!(auth.validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = service("test-secret-key-for-jwt")
            .issue_token(42, Duration::hours(24))
            .expect("encoding should succeed");

        assert!(service("wrong-secret").validate_token(&token).is_err());
    }

    #[test]
    fn test_claims_serialization() {
        let claims = Claims {
            sub: 42,
            exp: 1_700_000_000,
            iat: 1_600_000_000,
        };
        let json = serde_json::to_string(&claims).expect("serialization should succeed");
        let parsed: Claims = serde_json::from_str(&json).expect("deserialization should succeed");

        assert_eq!(claims.sub, parsed.sub);
        assert_eq!(claims.exp, parsed.exp);
        assert_eq!(claims.iat, parsed.iat);
    }
}
