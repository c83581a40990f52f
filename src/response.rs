use serde::Serialize;
use utoipa::ToSchema;

/// Severity of the user-facing message carried by every response.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Info,
    Danger,
}

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub level: FlashLevel,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self::with_level(FlashLevel::Success, message, data, meta)
    }

    /// Informational read, e.g. listings and dashboards.
    pub fn info(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self::with_level(FlashLevel::Info, message, data, meta)
    }

    pub fn with_level(
        level: FlashLevel,
        message: impl Into<String>,
        data: T,
        meta: Option<Meta>,
    ) -> Self {
        Self {
            message: message.into(),
            level,
            data: Some(data),
            meta,
        }
    }
}
