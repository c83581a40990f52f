use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, HeaderValue, header::SET_COOKIE},
    response::AppendHeaders,
    routing::{get, post},
};
use chrono::Duration;

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest, SessionInfo},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::auth_service::{current_session, login_user, logout_user, register_user},
    session::{clear_session_cookie, session_cookie, set_cookie_header},
    state::AppState,
};

/// JSON body plus a `Set-Cookie` header for the session.
type WithCookie<T> = (
    AppendHeaders<[(HeaderName, HeaderValue); 1]>,
    Json<ApiResponse<T>>,
);

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Register user", body = ApiResponse<User>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email or mobile already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = register_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user and set the session cookie", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<WithCookie<LoginResponse>> {
    let resp = login_user(&state, payload).await?;
    let token = resp
        .data
        .as_ref()
        .map(|data| data.token.as_str())
        .ok_or_else(|| AppError::internal("login produced no token"))?;
    let cookie = set_cookie_header(&session_cookie(
        token,
        Duration::hours(state.config.session_ttl_hours),
        state.config.cookie_secure,
    ))?;
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "End all of the caller's sessions and clear the cookie"),
        (status = 401, description = "Not logged in")
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<WithCookie<serde_json::Value>> {
    let resp = logout_user(&state, &user).await?;
    let cookie = set_cookie_header(&clear_session_cookie(state.config.cookie_secure))?;
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user and their dashboard", body = ApiResponse<SessionInfo>),
        (status = 401, description = "Not logged in")
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SessionInfo>>> {
    let resp = current_session(&state, &user).await?;
    Ok(Json(resp))
}
