use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    /// `(page, per_page, offset)`; the offset saturates for absurd page numbers.
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

// Paging fields stay inline: `#[serde(flatten)]` under `Query` deserializes numbers as strings.

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LotListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub postal_code: Option<String>,
}

impl LotListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Matches name, email or mobile.
    pub q: Option<String>,
}

impl UserListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ParkingSearchQuery {
    pub postal_code: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReservationListQuery {
    pub sort_order: Option<SortOrder>,
}
