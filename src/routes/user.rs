use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::parking::{
        AvailableLotList, ReleaseReceipt, ReservationDetail, ReservationHistory, ReserveRequest,
        UserDashboard,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::ParkingSearchQuery,
    services::parking_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/parking", get(search_parking))
        .route("/lots/{id}/reserve", post(reserve_spot))
        .route("/reservations", get(my_reservations))
        .route("/reservations/{id}/release", post(release_spot))
}

#[utoipa::path(
    get,
    path = "/api/user/dashboard",
    responses(
        (status = 200, description = "Active and five most recent reservations", body = ApiResponse<UserDashboard>),
        (status = 401, description = "Not logged in"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Parking"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserDashboard>>> {
    let resp = parking_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/user/parking",
    params(
        ("postal_code" = Option<String>, Query, description = "Postal code; all lots when empty")
    ),
    responses(
        (status = 200, description = "Lots with free spots", body = ApiResponse<AvailableLotList>),
        (status = 401, description = "Not logged in"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Parking"
)]
pub async fn search_parking(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ParkingSearchQuery>,
) -> AppResult<Json<ApiResponse<AvailableLotList>>> {
    let resp = parking_service::search_lots(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/user/lots/{id}/reserve",
    params(("id" = Uuid, Path, description = "Lot ID")),
    request_body = ReserveRequest,
    responses(
        (status = 200, description = "First free spot reserved", body = ApiResponse<ReservationDetail>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Lot not found"),
        (status = 409, description = "No available spots in this lot"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Parking"
)]
pub async fn reserve_spot(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReserveRequest>,
) -> AppResult<Json<ApiResponse<ReservationDetail>>> {
    let resp = parking_service::reserve_spot(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/user/reservations/{id}/release",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Checked out; fee computed and spot freed", body = ApiResponse<ReleaseReceipt>),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation already released"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Parking"
)]
pub async fn release_spot(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReleaseReceipt>>> {
    let resp = parking_service::release_spot(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/user/reservations",
    responses(
        (status = 200, description = "Active and past reservations with durations", body = ApiResponse<ReservationHistory>),
        (status = 401, description = "Not logged in"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Parking"
)]
pub async fn my_reservations(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ReservationHistory>>> {
    let resp = parking_service::my_reservations(&state, &user).await?;
    Ok(Json(resp))
}
