use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{
        lots::{AdminDashboard, CreateLotRequest, LotList, LotWithSpots, UpdateLotRequest},
        users::{UserList, UserReservations},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::{LotListQuery, ReservationListQuery, UserListQuery},
    services::{admin_service, lot_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/lots", get(list_lots).post(create_lot))
        .route("/lots/{id}", get(get_lot).put(update_lot).delete(delete_lot))
        .route("/users", get(list_users))
        .route("/users/{id}/reservations", get(user_reservations))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Lots with occupancy, spot totals and user count", body = ApiResponse<AdminDashboard>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Forbidden"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminDashboard>>> {
    let resp = admin_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/lots",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("postal_code" = Option<String>, Query, description = "Filter by postal code")
    ),
    responses(
        (status = 200, description = "List parking lots", body = ApiResponse<LotList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_lots(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<LotListQuery>,
) -> AppResult<Json<ApiResponse<LotList>>> {
    let resp = lot_service::list_lots(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/lots",
    request_body = CreateLotRequest,
    responses(
        (status = 200, description = "Create a lot and its spots", body = ApiResponse<LotWithSpots>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_lot(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateLotRequest>,
) -> AppResult<Json<ApiResponse<LotWithSpots>>> {
    let resp = lot_service::create_lot(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/lots/{id}",
    params(("id" = Uuid, Path, description = "Lot ID")),
    responses(
        (status = 200, description = "Lot with its spots", body = ApiResponse<LotWithSpots>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_lot(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LotWithSpots>>> {
    let resp = lot_service::get_lot(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/lots/{id}",
    params(("id" = Uuid, Path, description = "Lot ID")),
    request_body = UpdateLotRequest,
    responses(
        (status = 200, description = "Update a lot, growing or shrinking its spots", body = ApiResponse<LotWithSpots>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "A spot that would be removed is occupied"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_lot(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLotRequest>,
) -> AppResult<Json<ApiResponse<LotWithSpots>>> {
    let resp = lot_service::update_lot(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/lots/{id}",
    params(("id" = Uuid, Path, description = "Lot ID")),
    responses(
        (status = 200, description = "Lot deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Lot has occupied spots"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_lot(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = lot_service::delete_lot(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search name, email or mobile")
    ),
    responses(
        (status = 200, description = "Registered (non-admin) users", body = ApiResponse<UserList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}/reservations",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ("sort_order" = Option<String>, Query, description = "Check-in order: asc, desc (default)")
    ),
    responses(
        (status = 200, description = "A user's reservations", body = ApiResponse<UserReservations>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn user_reservations(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ReservationListQuery>,
) -> AppResult<Json<ApiResponse<UserReservations>>> {
    let resp = admin_service::user_reservations(&state, &user, id, query).await?;
    Ok(Json(resp))
}
