use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Duration;
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::{
    audit::{AuditAction, record},
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest, SessionInfo},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Role, User},
    response::{ApiResponse, FlashLevel, Meta},
    session::issue_token,
    state::AppState,
    validation,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(AppError::internal)
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let full_name = validation::required("Full name", &payload.full_name)?;
    let email = validation::normalize_email(&payload.email)?;
    let mobile = validation::normalize_mobile(&payload.mobile)?;
    let gender = validation::normalize_gender(payload.gender.as_deref())?;
    validation::validate_password(&payload.password)?;

    let email_taken = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
        .is_some();
    if email_taken {
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let mobile_taken = Users::find()
        .filter(UserCol::Mobile.eq(mobile.as_str()))
        .one(&state.orm)
        .await?
        .is_some();
    if mobile_taken {
        return Err(AppError::Conflict("Mobile already registered".into()));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        full_name: Set(full_name),
        email: Set(email),
        mobile: Set(mobile),
        gender: Set(gender),
        password_hash: Set(password_hash),
        role: Set(Role::User.as_str().to_string()),
        session_version: Set(0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(duplicate_user_error)?;

    tracing::info!(user_id = %user.id, "user registered");
    record(
        &state.pool,
        Some(user.id),
        AuditAction::UserRegister,
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Registration successful! Please login",
        User::from(user),
        Some(Meta::empty()),
    ))
}

/// A concurrent registration can slip past the lookups above; the unique
/// indexes still catch it.
fn duplicate_user_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("mobile") => {
            AppError::Conflict("Mobile already registered".into())
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Email already exists".into())
        }
        _ => AppError::OrmError(err),
    }
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let invalid = || AppError::Unauthorized("Invalid email or password".into());
    let email = payload.email.trim().to_lowercase();

    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password_hash) {
        tracing::debug!(user_id = %user.id, "password mismatch");
        return Err(invalid());
    }

    let version = user.session_version;
    let user = User::from(user);
    let ttl = Duration::hours(state.config.session_ttl_hours);
    let issued = issue_token(&state.config.jwt_secret, user.id, user.role, version, ttl)?;

    record(
        &state.pool,
        Some(user.id),
        AuditAction::UserLogin,
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    let resp = LoginResponse {
        token: issued.token,
        role: user.role,
        dashboard: user.role.dashboard_path().to_string(),
        expires_at: issued.expires_at,
    };

    Ok(ApiResponse::success(
        "Login successful",
        resp,
        Some(Meta::empty()),
    ))
}

/// Ends every session of the caller: tokens issued before this call stop
/// verifying, whether they travel in the cookie or a Bearer header.
pub async fn logout_user(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    Users::update_many()
        .col_expr(
            UserCol::SessionVersion,
            Expr::col(UserCol::SessionVersion).add(1),
        )
        .filter(UserCol::Id.eq(user.user_id))
        .exec(&state.orm)
        .await?;

    tracing::info!(user_id = %user.user_id, "user logged out");
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::UserLogout,
        serde_json::json!({ "user_id": user.user_id }),
    )
    .await;

    Ok(ApiResponse::with_level(
        FlashLevel::Info,
        "You have been logged out",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn current_session(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<SessionInfo>> {
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let user = User::from(model);
    let dashboard = user.role.dashboard_path().to_string();

    Ok(ApiResponse::info(
        "Session",
        SessionInfo { user, dashboard },
        Some(Meta::empty()),
    ))
}

/// Creates the configured admin account unless an admin already exists.
/// Returns the id of the account it created.
pub async fn ensure_default_admin(state: &AppState) -> AppResult<Option<Uuid>> {
    let existing = Users::find()
        .filter(UserCol::Role.eq(Role::Admin.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Ok(None);
    }

    let bootstrap = &state.config.admin;
    let email = validation::normalize_email(&bootstrap.email)?;
    let mobile = validation::normalize_mobile(&bootstrap.mobile)?;
    let password_hash = hash_password(&bootstrap.password)?;

    let admin = UserActive {
        id: Set(Uuid::new_v4()),
        full_name: Set(bootstrap.full_name.clone()),
        email: Set(email),
        mobile: Set(mobile),
        gender: Set(None),
        password_hash: Set(password_hash),
        role: Set(Role::Admin.as_str().to_string()),
        session_version: Set(0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(duplicate_user_error)?;

    tracing::warn!(email = %admin.email, "created default admin account; change its password");
    record(
        &state.pool,
        Some(admin.id),
        AuditAction::AdminBootstrap,
        serde_json::json!({ "user_id": admin.id }),
    )
    .await;

    Ok(Some(admin.id))
}
