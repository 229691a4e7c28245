use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Root directory for uploaded files, served read-only at `public_base`.
    pub root: PathBuf,
    /// URL prefix under which `root` is exposed.
    pub public_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub password_limit: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub uploads: UploadConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "chefhub".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "chefhub-chefs".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let uploads = UploadConfig {
            root: std::env::var("UPLOADS_ROOT")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            public_base: std::env::var("UPLOADS_PUBLIC_BASE").unwrap_or_else(|_| "/static".into()),
        };
        let rate_limit = RateLimitConfig {
            password_limit: std::env::var("PASSWORD_RATE_LIMIT")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(5),
            window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60),
        };
        Ok(Self {
            database_url,
            jwt,
            uploads,
            rate_limit,
        })
    }
}
