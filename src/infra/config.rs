use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use time::Duration;

pub struct AppConfig {
    /// Signing secret for session tokens. Read once at startup.
    pub jwt_secret: SecretString,
    pub access_token_ttl: Duration,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    /// Mark the session cookie `Secure`. Enable when served over HTTPS.
    pub cookie_secure: bool,
    pub database_url: String,
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Panics when a required variable is missing or invalid: a server without a
    /// usable signing secret, a positive token lifetime or a database must not start.
    pub fn from_env() -> Self {
        let jwt_secret = signing_secret(get_env::<String>("JWT_SECRET"))
            .unwrap_or_else(|e| panic!("{e}"));

        let access_token_ttl = token_ttl(get_env_default("ACCESS_TOKEN_TTL_SECS", 86_400))
            .unwrap_or_else(|e| panic!("{e}"));

        let bind_addr: SocketAddr = get_env_default(
            "BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 8000)),
        );
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");
        let cookie_secure: bool = get_env_default("COOKIE_SECURE", false);
        let database_url: String = get_env("DATABASE_URL");
        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 5);

        Self {
            jwt_secret,
            access_token_ttl,
            bind_addr,
            cors_origin,
            cookie_secure,
            database_url,
            db_max_connections,
        }
    }
}

/// Tokens must be signed with a non-blank key.
pub fn signing_secret(raw: String) -> Result<SecretString, &'static str> {
    if raw.trim().is_empty() {
        return Err("JWT_SECRET must not be empty");
    }
    Ok(SecretString::new(raw.into()))
}

/// Issued tokens must expire strictly after issuance.
pub fn token_ttl(secs: i64) -> Result<Duration, &'static str> {
    if secs < 1 {
        return Err("ACCESS_TOKEN_TTL_SECS must be at least 1");
    }
    Ok(Duration::seconds(secs))
}
