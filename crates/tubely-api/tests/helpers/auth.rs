use chrono::Duration;
use tubely_api::auth::JwtConfig;
use uuid::Uuid;

/// Mint a one-hour access token for `user_id`.
pub fn token_for(jwt: &JwtConfig, user_id: Uuid) -> String {
    jwt.generate_access_token(user_id, Duration::hours(1))
        .expect("Failed to sign test token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
