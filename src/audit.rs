use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserRegister,
    UserLogin,
    UserLogout,
    LotCreate,
    LotUpdate,
    LotDelete,
    SpotReserve,
    SpotRelease,
    AdminBootstrap,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UserRegister => "user_register",
            AuditAction::UserLogin => "user_login",
            AuditAction::UserLogout => "user_logout",
            AuditAction::LotCreate => "lot_create",
            AuditAction::LotUpdate => "lot_update",
            AuditAction::LotDelete => "lot_delete",
            AuditAction::SpotReserve => "spot_reserve",
            AuditAction::SpotRelease => "spot_release",
            AuditAction::AdminBootstrap => "admin_bootstrap",
        }
    }

    pub fn resource(&self) -> &'static str {
        match self {
            AuditAction::UserRegister
            | AuditAction::UserLogin
            | AuditAction::UserLogout
            | AuditAction::AdminBootstrap => "users",
            AuditAction::LotCreate | AuditAction::LotUpdate | AuditAction::LotDelete => {
                "parking_lots"
            }
            AuditAction::SpotReserve | AuditAction::SpotRelease => "reservations",
        }
    }
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: AuditAction,
    metadata: Option<Value>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action.as_str())
    .bind(action.resource())
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Audit writes never fail the request that triggered them.
pub async fn record(pool: &DbPool, user_id: Option<Uuid>, action: AuditAction, metadata: Value) {
    if let Err(err) = log_audit(pool, user_id, action, Some(metadata)).await {
        tracing::warn!(error = %err, action = action.as_str(), "audit log failed");
    }
}
