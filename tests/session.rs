use axum::http::{HeaderMap, HeaderValue, header};
use chrono::Duration;
use cookie::{SameSite, time::Duration as CookieDuration};
use parking_reservation_api::{
    error::AppError,
    models::Role,
    session::{
        SESSION_COOKIE, clear_session_cookie, issue_token, session_cookie,
        session_token_from_cookies, set_cookie_header, token_from_headers, verify_token,
    },
};
use uuid::Uuid;

const SECRET: &str = "test-secret";

#[test]
fn issued_token_verifies_to_same_user() {
    let user_id = Uuid::new_v4();
    let issued = issue_token(SECRET, user_id, Role::User, 3, Duration::hours(1)).unwrap();

    let claims = verify_token(SECRET, &issued.token).unwrap();
    assert_eq!(claims.user_id, user_id);
    assert_eq!(claims.version, 3);
    assert!(issued.expires_at > chrono::Utc::now());
}

#[test]
fn token_signed_with_other_secret_is_rejected() {
    let issued = issue_token("other", Uuid::new_v4(), Role::Admin, 0, Duration::hours(1)).unwrap();
    let err = verify_token(SECRET, &issued.token).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[test]
fn expired_token_is_rejected() {
    let issued = issue_token(SECRET, Uuid::new_v4(), Role::User, 0, Duration::hours(-2)).unwrap();
    let err = verify_token(SECRET, &issued.token).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[test]
fn garbage_token_is_rejected() {
    assert!(matches!(
        verify_token(SECRET, "not-a-jwt"),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn session_cookie_is_found_among_others() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_static("theme=dark; parking_session=abc.def.ghi; lang=en"),
    );

    assert_eq!(
        session_token_from_cookies(&headers).as_deref(),
        Some("abc.def.ghi")
    );
}

#[test]
fn quoted_session_cookie_is_unquoted() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_static("parking_session=\"abc.def.ghi\""),
    );

    assert_eq!(
        token_from_headers(&headers).unwrap().as_deref(),
        Some("abc.def.ghi")
    );
}

#[test]
fn quoted_cookie_carries_a_verifiable_token() {
    let user_id = Uuid::new_v4();
    let issued = issue_token(SECRET, user_id, Role::User, 0, Duration::hours(1)).unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("{SESSION_COOKIE}=\"{}\"", issued.token)).unwrap(),
    );

    let token = token_from_headers(&headers).unwrap().unwrap();
    assert_eq!(verify_token(SECRET, &token).unwrap().user_id, user_id);
}

#[test]
fn session_cookie_in_second_cookie_header_is_found() {
    let mut headers = HeaderMap::new();
    headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
    headers.append(header::COOKIE, HeaderValue::from_static("parking_session=tok"));

    assert_eq!(session_token_from_cookies(&headers).as_deref(), Some("tok"));
}

#[test]
fn empty_session_cookie_counts_as_absent() {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_static("parking_session="));
    assert_eq!(token_from_headers(&headers).unwrap(), None);
}

#[test]
fn cookie_takes_precedence_over_bearer_header() {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_static("parking_session=from-cookie"));
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

    assert_eq!(
        token_from_headers(&headers).unwrap().as_deref(),
        Some("from-cookie")
    );
}

#[test]
fn bearer_header_is_used_without_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer  tok  "));
    assert_eq!(token_from_headers(&headers).unwrap().as_deref(), Some("tok"));
}

#[test]
fn non_bearer_scheme_is_rejected() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
    assert!(matches!(
        token_from_headers(&headers),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn no_credentials_yields_none() {
    assert_eq!(token_from_headers(&HeaderMap::new()).unwrap(), None);
}

#[test]
fn session_cookie_attributes() {
    let cookie = session_cookie("tok", Duration::hours(24), false);

    assert_eq!(cookie.name(), SESSION_COOKIE);
    assert_eq!(cookie.value(), "tok");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(CookieDuration::hours(24)));
    assert_ne!(cookie.secure(), Some(true));

    let secure = session_cookie("tok", Duration::hours(1), true);
    assert_eq!(secure.secure(), Some(true));
}

#[test]
fn set_cookie_header_renders_attributes() {
    let header = set_cookie_header(&session_cookie("tok", Duration::hours(24), true)).unwrap();
    let header = header.to_str().unwrap();

    assert!(header.starts_with("parking_session=tok"));
    assert!(header.contains("HttpOnly"));
    assert!(header.contains("SameSite=Lax"));
    assert!(header.contains("Path=/"));
    assert!(header.contains("Max-Age=86400"));
    assert!(header.contains("Secure"));
}

#[test]
fn cleared_cookie_expires_immediately() {
    let cookie = clear_session_cookie(false);

    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    assert_eq!(cookie.path(), Some("/"));

    let header = set_cookie_header(&cookie).unwrap();
    assert!(header.to_str().unwrap().contains("Max-Age=0"));
}
