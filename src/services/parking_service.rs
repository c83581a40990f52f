use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait,
};
use sea_orm::sea_query::{LockBehavior, LockType};
use uuid::Uuid;

use crate::{
    audit::{AuditAction, record},
    dto::parking::{
        AvailableLot, AvailableLotList, ReleaseReceipt, ReservationDetail, ReservationHistory,
        ReserveRequest, UserDashboard,
    },
    entity::{
        parking_lots::{Column as LotCol, Entity as ParkingLots},
        parking_spots::{ActiveModel as SpotActive, Column as SpotCol, Entity as ParkingSpots},
        reservations::{
            ActiveModel as ReservationActive, Column as ResCol, Entity as Reservations,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ParkingLot, SpotStatus, spot_label},
    pricing::{billable_hours, compute_fee, stay_duration},
    response::{ApiResponse, Meta},
    routes::params::{ParkingSearchQuery, SortOrder},
    services::{lot_service::spot_counts, reservation_query::fetch_details},
    state::AppState,
    validation,
};

const RECENT_RESERVATIONS: u64 = 5;

pub async fn dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<UserDashboard>> {
    let active_reservations = fetch_details(
        &state.orm,
        ResCol::UserId
            .eq(user.user_id)
            .and(ResCol::CheckOut.is_null()),
        SortOrder::Desc,
        None,
    )
    .await?;

    let recent_reservations = fetch_details(
        &state.orm,
        ResCol::UserId
            .eq(user.user_id)
            .and(ResCol::CheckOut.is_not_null()),
        SortOrder::Desc,
        Some(RECENT_RESERVATIONS),
    )
    .await?;

    Ok(ApiResponse::info(
        "User dashboard",
        UserDashboard {
            active_reservations,
            recent_reservations,
        },
        Some(Meta::empty()),
    ))
}

/// Lots with at least one free spot, optionally restricted to a postal code.
pub async fn search_lots(
    state: &AppState,
    _user: &AuthUser,
    query: ParkingSearchQuery,
) -> AppResult<ApiResponse<AvailableLotList>> {
    let mut condition = Condition::all();
    if let Some(code) = query.postal_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        condition = condition.add(LotCol::PostalCode.eq(code.to_uppercase()));
    }

    let lots = ParkingLots::find()
        .filter(condition)
        .order_by_asc(LotCol::Name)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = lots.iter().map(|l| l.id).collect();
    let counts = spot_counts(&state.orm, Some(&ids)).await?;

    let items: Vec<AvailableLot> = lots
        .into_iter()
        .filter_map(|lot| {
            let available = counts.get(&lot.id).map(|c| c.available).unwrap_or(0);
            (available > 0).then(|| AvailableLot {
                lot: ParkingLot::from(lot),
                available_spots: available,
            })
        })
        .collect();

    let total = items.len() as i64;
    let message = if items.is_empty() {
        "No parking lots with free spots found"
    } else {
        "Available parking lots"
    };
    Ok(ApiResponse::info(
        message,
        AvailableLotList { items },
        Some(Meta::new(1, total, total)),
    ))
}

/// Takes the lowest-numbered free spot in the lot for the caller.
pub async fn reserve_spot(
    state: &AppState,
    user: &AuthUser,
    lot_id: Uuid,
    payload: ReserveRequest,
) -> AppResult<ApiResponse<ReservationDetail>> {
    let vehicle_number = validation::normalize_vehicle_number(&payload.vehicle_number)?;

    let txn = state.orm.begin().await?;

    // Shared lock: edits and deletes of the lot wait for this reservation.
    let lot = ParkingLots::find_by_id(lot_id)
        .lock(LockType::Share)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    // Skip rows another reservation is holding so concurrent callers get different spots.
    let spot = ParkingSpots::find()
        .filter(
            Condition::all()
                .add(SpotCol::LotId.eq(lot.id))
                .add(SpotCol::Status.eq(SpotStatus::Available.as_str())),
        )
        .order_by_asc(SpotCol::SpotNumber)
        .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::Conflict("No available spots in this lot".into()))?;

    let check_in = Utc::now();
    let reservation = ReservationActive {
        id: Set(Uuid::new_v4()),
        spot_id: Set(spot.id),
        user_id: Set(user.user_id),
        check_in: Set(check_in.into()),
        check_out: Set(None),
        amount_paid: Set(None),
        vehicle_number: Set(vehicle_number),
        created_at: sea_orm::ActiveValue::NotSet,
    }
    .insert(&txn)
    .await
    .map_err(spot_taken_error)?;

    let spot_number = spot.spot_number;
    let mut active: SpotActive = spot.into();
    active.status = Set(SpotStatus::Occupied.as_str().to_string());
    let spot = active.update(&txn).await?;

    txn.commit().await?;

    let label = spot_label(spot_number);
    tracing::info!(
        reservation_id = %reservation.id,
        lot_id = %lot.id,
        spot = %label,
        "spot reserved"
    );
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::SpotReserve,
        serde_json::json!({
            "reservation_id": reservation.id,
            "lot_id": lot.id,
            "spot_id": spot.id,
        }),
    )
    .await;

    let message = format!("Spot {label} reserved successfully at {}.", lot.name);
    let detail = ReservationDetail {
        id: reservation.id,
        user_id: reservation.user_id,
        spot_id: spot.id,
        spot_label: label,
        lot_id: lot.id,
        lot_name: lot.name,
        price_per_hour: lot.price_per_hour,
        vehicle_number: reservation.vehicle_number,
        check_in: reservation.check_in.with_timezone(&Utc),
        check_out: None,
        amount_paid: None,
        duration: None,
    };

    Ok(ApiResponse::success(message, detail, Some(Meta::empty())))
}

/// The partial unique index on active reservations rejects a second claim on a spot.
fn spot_taken_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Spot was just taken, please try again".into())
        }
        _ => AppError::OrmError(err),
    }
}

/// Checks the caller out, bills the stay and frees the spot.
pub async fn release_spot(
    state: &AppState,
    user: &AuthUser,
    reservation_id: Uuid,
) -> AppResult<ApiResponse<ReleaseReceipt>> {
    let txn = state.orm.begin().await?;

    let reservation = Reservations::find_by_id(reservation_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .filter(|r| r.user_id == user.user_id || user.is_admin())
        .ok_or(AppError::NotFound)?;

    if reservation.check_out.is_some() {
        return Err(AppError::Conflict("Reservation already released".into()));
    }

    let spot = ParkingSpots::find_by_id(reservation.spot_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let lot = ParkingLots::find_by_id(spot.lot_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let check_in = reservation.check_in.with_timezone(&Utc);
    let check_out = Utc::now();
    let elapsed = check_out - check_in;
    let amount = compute_fee(elapsed, lot.price_per_hour);

    let mut active: ReservationActive = reservation.into();
    active.check_out = Set(Some(check_out.into()));
    active.amount_paid = Set(Some(amount));
    let reservation = active.update(&txn).await?;

    let spot_number = spot.spot_number;
    let mut spot_active: SpotActive = spot.into();
    spot_active.status = Set(SpotStatus::Available.as_str().to_string());
    let spot = spot_active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        reservation_id = %reservation.id,
        amount,
        seconds = elapsed.num_seconds(),
        "spot released"
    );
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::SpotRelease,
        serde_json::json!({
            "reservation_id": reservation.id,
            "spot_id": spot.id,
            "amount_paid": amount,
        }),
    )
    .await;

    let label = spot_label(spot_number);
    let message = format!("Spot {label} released. Amount due: {amount}.");
    let receipt = ReleaseReceipt {
        reservation: ReservationDetail {
            id: reservation.id,
            user_id: reservation.user_id,
            spot_id: spot.id,
            spot_label: label,
            lot_id: lot.id,
            lot_name: lot.name,
            price_per_hour: lot.price_per_hour,
            vehicle_number: reservation.vehicle_number,
            check_in,
            check_out: Some(check_out),
            amount_paid: Some(amount),
            duration: Some(stay_duration(check_in, check_out)),
        },
        billed_hours: (billable_hours(elapsed) * 100.0).round() / 100.0,
        amount_paid: amount,
    };

    Ok(ApiResponse::success(message, receipt, Some(Meta::empty())))
}

pub async fn my_reservations(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ReservationHistory>> {
    let active_reservations = fetch_details(
        &state.orm,
        ResCol::UserId
            .eq(user.user_id)
            .and(ResCol::CheckOut.is_null()),
        SortOrder::Desc,
        None,
    )
    .await?;

    let past_reservations = fetch_details(
        &state.orm,
        ResCol::UserId
            .eq(user.user_id)
            .and(ResCol::CheckOut.is_not_null()),
        SortOrder::Desc,
        None,
    )
    .await?;

    let total = (active_reservations.len() + past_reservations.len()) as i64;
    Ok(ApiResponse::info(
        "My reservations",
        ReservationHistory {
            active_reservations,
            past_reservations,
        },
        Some(Meta::new(1, total, total)),
    ))
}
