//! Signed session tokens and the cookie that carries them.

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, Duration, Utc};
use cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    error::{AppError, AppResult},
    models::Role,
};

pub const SESSION_COOKIE: &str = "parking_session";

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Who a verified token belongs to. `version` must match the user's current
/// session version, which logout bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub version: i32,
}

pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    role: Role,
    version: i32,
    ttl: Duration,
) -> AppResult<IssuedToken> {
    let expires_at = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::internal("Failed to set expiration"))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.as_str().to_string(),
        ver: version,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AppError::internal)?;

    Ok(IssuedToken { token, expires_at })
}

/// Validates signature and expiry.
pub fn verify_token(secret: &str, token: &str) -> AppResult<SessionClaims> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired session".into()))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in session".into()))?;

    Ok(SessionClaims {
        user_id,
        version: decoded.claims.ver,
    })
}

/// Session token from the cookie, falling back to an `Authorization: Bearer` header.
pub fn token_from_headers(headers: &HeaderMap) -> AppResult<Option<String>> {
    if let Some(token) = session_token_from_cookies(headers) {
        return Ok(Some(token));
    }

    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
        .trim();
    if token.is_empty() {
        return Ok(None);
    }
    Ok(Some(token.to_string()))
}

/// Non-empty `parking_session` value across all `Cookie` headers, quotes stripped.
pub fn session_token_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE && !cookie.value_trimmed().is_empty())
        .map(|cookie| cookie.value_trimmed().to_string())
}

pub fn session_cookie(token: &str, ttl: Duration, secure: bool) -> Cookie<'static> {
    build_cookie(
        token.to_string(),
        CookieDuration::seconds(ttl.num_seconds().max(0)),
        secure,
    )
}

pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    build_cookie(String::new(), CookieDuration::ZERO, secure)
}

fn build_cookie(value: String, max_age: CookieDuration, secure: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age);
    if secure {
        builder = builder.secure(true);
    }
    builder.build()
}

/// `Set-Cookie` header value for a cookie built above.
pub fn set_cookie_header(cookie: &Cookie<'_>) -> AppResult<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string()).map_err(AppError::internal)
}
