use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tubely_core::AppError;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    /// User id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// HMAC secret and issuer shared by token minting and validation
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    issuer: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Mint an access token for `user_id` that expires after `ttl`.
    pub fn generate_access_token(&self, user_id: Uuid, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))
    }

    /// Validate signature, issuer and expiry, returning the user id in `sub`.
    pub fn validate_token(&self, token: &str) -> Result<Uuid, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            AppError::Unauthorized("Couldn't validate JWT".to_string())
        })?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    let header = header
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Malformed authorization header".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized(
            "Malformed authorization header".to_string(),
        ));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

    #[test]
    fn test_token_round_trip() {
        let jwt = JwtConfig::new(SECRET, "tubely-access");
        let user_id = Uuid::new_v4();
        let token = jwt
            .generate_access_token(user_id, Duration::hours(1))
            .unwrap();
        assert_eq!(jwt.validate_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = JwtConfig::new(SECRET, "tubely-access");
        let token = jwt
            .generate_access_token(Uuid::new_v4(), Duration::hours(-2))
            .unwrap();
        assert!(matches!(
            jwt.validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let minted = JwtConfig::new(SECRET, "someone-else");
        let token = minted
            .generate_access_token(Uuid::new_v4(), Duration::hours(1))
            .unwrap();
        let jwt = JwtConfig::new(SECRET, "tubely-access");
        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let minted = JwtConfig::new("another-secret-that-is-long-enough-too", "tubely-access");
        let token = minted
            .generate_access_token(Uuid::new_v4(), Duration::hours(1))
            .unwrap();
        let jwt = JwtConfig::new(SECRET, "tubely-access");
        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
        assert!(matches!(bearer_token(None), Err(AppError::Unauthorized(_))));
        assert!(bearer_token(Some("Basic dXNlcg==")).is_err());
        assert!(bearer_token(Some("Bearer   ")).is_err());
    }
}
