use axum::extract::FromRequestParts;
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    entity::Users,
    error::AppError,
    models::{Role, User},
    session::{token_from_headers, verify_token},
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
        }
    }
}

pub fn ensure_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Admin)
}

/// Resolves the session and re-reads the user, so role changes, deleted
/// accounts and logouts take effect on the next request.
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers)?
            .ok_or_else(|| AppError::Unauthorized("Please log in to continue".into()))?;

        let claims = verify_token(&state.config.jwt_secret, &token)?;

        let user = Users::find_by_id(claims.user_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Session user no longer exists".into()))?;
        if user.session_version != claims.version {
            return Err(AppError::Unauthorized(
                "Session has ended, please log in again".into(),
            ));
        }

        Ok(AuthUser::from(&User::from(user)))
    }
}
