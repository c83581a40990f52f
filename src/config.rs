use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub admin: AdminBootstrap,
}

/// Account created on startup when the database has no admin yet.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .context("JWT_SECRET is not set")?;
        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("APP_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_ttl_hours = lookup("SESSION_TTL_HOURS")
            .and_then(|h| h.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(24);
        let cookie_secure = lookup("COOKIE_SECURE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let admin = AdminBootstrap {
            full_name: lookup("ADMIN_NAME").unwrap_or_else(|| "Admin".to_string()),
            email: lookup("ADMIN_EMAIL").unwrap_or_else(|| "admin@parking.local".to_string()),
            password: lookup("ADMIN_PASSWORD").unwrap_or_else(|| "admin99".to_string()),
            mobile: lookup("ADMIN_MOBILE").unwrap_or_else(|| "9919991900".to_string()),
        };

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            session_ttl_hours,
            cookie_secure,
            admin,
        })
    }
}
