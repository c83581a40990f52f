use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use uuid::Uuid;

use crate::{
    dto::{
        lots::AdminDashboard,
        users::{UserList, UserReservations},
    },
    entity::{
        parking_lots::{Column as LotCol, Entity as ParkingLots},
        reservations::Column as ResCol,
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{ParkingLot, Role, User},
    response::{ApiResponse, Meta},
    routes::params::{ReservationListQuery, SortOrder, UserListQuery},
    services::{
        lot_service::{spot_counts, summarize},
        reservation_query::fetch_details,
    },
    state::AppState,
    validation,
};

pub async fn dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AdminDashboard>> {
    ensure_admin(user)?;

    let lots: Vec<ParkingLot> = ParkingLots::find()
        .order_by_asc(LotCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ParkingLot::from)
        .collect();

    let counts = spot_counts(&state.orm, None).await?;
    let available_spots: i64 = counts.values().map(|c| c.available).sum();
    let occupied_spots: i64 = counts.values().map(|c| c.occupied).sum();

    let users_count = Users::find()
        .filter(UserCol::Role.eq(Role::User.as_str()))
        .count(&state.orm)
        .await? as i64;

    Ok(ApiResponse::info(
        "Admin dashboard",
        AdminDashboard {
            lots: summarize(lots, &counts),
            available_spots,
            occupied_spots,
            users_count,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all().add(UserCol::Role.eq(Role::User.as_str()));
    if let Some(search) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", validation::escape_like(search));
        condition = condition.add(
            Condition::any()
                .add(Expr::col(UserCol::FullName).ilike(pattern.clone()))
                .add(Expr::col(UserCol::Email).ilike(pattern.clone()))
                .add(Expr::col(UserCol::Mobile).ilike(pattern)),
        );
    }

    let finder = Users::find()
        .filter(condition)
        .order_by_asc(UserCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::info(
        "Users",
        UserList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn user_reservations(
    state: &AppState,
    user: &AuthUser,
    user_id: Uuid,
    query: ReservationListQuery,
) -> AppResult<ApiResponse<UserReservations>> {
    ensure_admin(user)?;

    let target = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let reservations = fetch_details(
        &state.orm,
        ResCol::UserId.eq(target.id),
        query.sort_order.unwrap_or(SortOrder::Desc),
        None,
    )
    .await?;

    let total = reservations.len() as i64;
    Ok(ApiResponse::info(
        "User reservations",
        UserReservations {
            user: User::from(target),
            reservations,
        },
        Some(Meta::new(1, total, total)),
    ))
}
