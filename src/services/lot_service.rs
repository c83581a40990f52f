use std::collections::{BTreeSet, HashMap};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;

use crate::{
    audit::{AuditAction, record},
    dto::lots::{CreateLotRequest, LotList, LotSummary, LotWithSpots, UpdateLotRequest},
    entity::{
        parking_lots::{ActiveModel as LotActive, Column as LotCol, Entity as ParkingLots},
        parking_spots::{
            ActiveModel as SpotActive, Column as SpotCol, Entity as ParkingSpots,
            Model as SpotModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{ParkingLot, ParkingSpot, SpotStatus},
    response::{ApiResponse, Meta},
    routes::params::LotListQuery,
    state::AppState,
    validation,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpotCounts {
    pub available: i64,
    pub occupied: i64,
}

/// Available/occupied spot counts per lot. Lots without spots are absent.
pub(crate) async fn spot_counts<C>(
    conn: &C,
    lot_ids: Option<&[Uuid]>,
) -> AppResult<HashMap<Uuid, SpotCounts>>
where
    C: ConnectionTrait,
{
    #[derive(Debug, FromQueryResult)]
    struct SpotCountRow {
        lot_id: Uuid,
        status: String,
        total: i64,
    }

    let mut finder = ParkingSpots::find()
        .select_only()
        .column(SpotCol::LotId)
        .column(SpotCol::Status)
        .column_as(Expr::col(SpotCol::Id).count(), "total")
        .group_by(SpotCol::LotId)
        .group_by(SpotCol::Status);
    if let Some(ids) = lot_ids {
        finder = finder.filter(SpotCol::LotId.is_in(ids.iter().copied()));
    }

    let rows = finder.into_model::<SpotCountRow>().all(conn).await?;

    let mut counts: HashMap<Uuid, SpotCounts> = HashMap::new();
    for row in rows {
        let entry = counts.entry(row.lot_id).or_default();
        match row.status.parse::<SpotStatus>() {
            Ok(SpotStatus::Available) => entry.available += row.total,
            _ => entry.occupied += row.total,
        }
    }
    Ok(counts)
}

pub(crate) fn summarize(
    lots: Vec<ParkingLot>,
    counts: &HashMap<Uuid, SpotCounts>,
) -> Vec<LotSummary> {
    lots.into_iter()
        .map(|lot| {
            let c = counts.get(&lot.id).copied().unwrap_or_default();
            LotSummary {
                lot,
                available_spots: c.available,
                occupied_spots: c.occupied,
            }
        })
        .collect()
}

/// Spot changes needed to bring a lot to `new_total` spots numbered `1..=new_total`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CapacityPlan {
    pub add: Vec<i32>,
    pub remove: Vec<Uuid>,
}

impl CapacityPlan {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Fails without changes when any spot that would be removed is occupied.
pub fn plan_capacity(new_total: i32, spots: &[SpotModel]) -> AppResult<CapacityPlan> {
    let to_remove: Vec<&SpotModel> = spots.iter().filter(|s| s.spot_number > new_total).collect();
    let occupied = to_remove
        .iter()
        .filter(|s| s.status != SpotStatus::Available.as_str())
        .count();
    if occupied > 0 {
        return Err(AppError::Conflict(format!(
            "Cannot reduce spots. {occupied} of the to-be-removed spots are occupied!"
        )));
    }

    let existing: BTreeSet<i32> = spots.iter().map(|s| s.spot_number).collect();
    let add = (1..=new_total).filter(|n| !existing.contains(n)).collect();
    let remove = to_remove.into_iter().map(|s| s.id).collect();

    Ok(CapacityPlan { add, remove })
}

fn new_spots(lot_id: Uuid, numbers: &[i32]) -> Vec<SpotActive> {
    numbers
        .iter()
        .map(|&number| SpotActive {
            id: Set(Uuid::new_v4()),
            lot_id: Set(lot_id),
            spot_number: Set(number),
            status: Set(SpotStatus::Available.as_str().to_string()),
            created_at: NotSet,
        })
        .collect()
}

pub async fn create_lot(
    state: &AppState,
    user: &AuthUser,
    payload: CreateLotRequest,
) -> AppResult<ApiResponse<LotWithSpots>> {
    ensure_admin(user)?;
    let name = validation::normalize_lot_name(&payload.name)?;
    let address = validation::required("Address", &payload.address)?;
    let postal_code = validation::normalize_postal_code(&payload.postal_code)?;
    validation::validate_price(payload.price_per_hour)?;
    validation::validate_capacity(payload.max_spots)?;

    let txn = state.orm.begin().await?;

    let lot = LotActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        address: Set(address),
        postal_code: Set(postal_code),
        price_per_hour: Set(payload.price_per_hour),
        max_spots: Set(payload.max_spots),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let numbers: Vec<i32> = (1..=payload.max_spots).collect();
    ParkingSpots::insert_many(new_spots(lot.id, &numbers))
        .exec(&txn)
        .await?;

    let spots = lot_spots(&txn, lot.id).await?;
    txn.commit().await?;

    tracing::info!(lot_id = %lot.id, spots = lot.max_spots, "parking lot created");
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::LotCreate,
        serde_json::json!({ "lot_id": lot.id, "spots": lot.max_spots }),
    )
    .await;

    Ok(ApiResponse::success(
        "Parking lot created successfully!",
        LotWithSpots {
            lot: ParkingLot::from(lot),
            spots,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_lots(
    state: &AppState,
    user: &AuthUser,
    query: LotListQuery,
) -> AppResult<ApiResponse<LotList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(code) = query.postal_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        condition = condition.add(LotCol::PostalCode.eq(code.to_uppercase()));
    }

    let finder = ParkingLots::find()
        .filter(condition)
        .order_by_asc(LotCol::CreatedAt)
        .order_by_asc(LotCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let lots: Vec<ParkingLot> = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ParkingLot::from)
        .collect();

    let ids: Vec<Uuid> = lots.iter().map(|l| l.id).collect();
    let counts = spot_counts(&state.orm, Some(&ids)).await?;

    Ok(ApiResponse::info(
        "Parking lots",
        LotList {
            items: summarize(lots, &counts),
        },
        Some(Meta::new(page, limit, total)),
    ))
}

async fn lot_spots<C>(conn: &C, lot_id: Uuid) -> AppResult<Vec<ParkingSpot>>
where
    C: ConnectionTrait,
{
    let spots = ParkingSpots::find()
        .filter(SpotCol::LotId.eq(lot_id))
        .order_by_asc(SpotCol::SpotNumber)
        .all(conn)
        .await?
        .into_iter()
        .map(ParkingSpot::from)
        .collect();
    Ok(spots)
}

pub async fn get_lot(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<LotWithSpots>> {
    ensure_admin(user)?;
    let lot = ParkingLots::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let spots = lot_spots(&state.orm, lot.id).await?;

    Ok(ApiResponse::info(
        "Parking lot",
        LotWithSpots {
            lot: ParkingLot::from(lot),
            spots,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_lot(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateLotRequest,
) -> AppResult<ApiResponse<LotWithSpots>> {
    ensure_admin(user)?;
    let name = validation::normalize_lot_name(&payload.name)?;
    let address = validation::required("Address", &payload.address)?;
    let postal_code = validation::normalize_postal_code(&payload.postal_code)?;
    validation::validate_price(payload.price_per_hour)?;
    validation::validate_capacity(payload.total_spots)?;

    let txn = state.orm.begin().await?;

    let lot = ParkingLots::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let spots = ParkingSpots::find()
        .filter(SpotCol::LotId.eq(lot.id))
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    let previous_total = lot.max_spots;
    let plan = plan_capacity(payload.total_spots, &spots)?;

    if !plan.add.is_empty() {
        ParkingSpots::insert_many(new_spots(lot.id, &plan.add))
            .exec(&txn)
            .await?;
    }
    if !plan.remove.is_empty() {
        ParkingSpots::delete_many()
            .filter(SpotCol::Id.is_in(plan.remove.iter().copied()))
            .exec(&txn)
            .await?;
    }

    let mut active: LotActive = lot.into();
    active.name = Set(name);
    active.address = Set(address);
    active.postal_code = Set(postal_code);
    active.price_per_hour = Set(payload.price_per_hour);
    active.max_spots = Set(payload.total_spots);
    let lot = active.update(&txn).await?;

    let spots = lot_spots(&txn, lot.id).await?;
    txn.commit().await?;

    let message = match (plan.add.len(), plan.remove.len()) {
        _ if plan.is_empty() => "Parking lot updated successfully!".to_string(),
        (added, 0) => format!("Parking lot updated successfully! Added {added} new parking spots."),
        (0, removed) => format!("Parking lot updated successfully! Removed {removed} parking spots."),
        (added, removed) => format!(
            "Parking lot updated successfully! Added {added} and removed {removed} parking spots."
        ),
    };

    tracing::info!(
        lot_id = %lot.id,
        from = previous_total,
        to = lot.max_spots,
        "parking lot updated"
    );
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::LotUpdate,
        serde_json::json!({
            "lot_id": lot.id,
            "previous_spots": previous_total,
            "spots": lot.max_spots,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        message,
        LotWithSpots {
            lot: ParkingLot::from(lot),
            spots,
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_lot(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let lot = ParkingLots::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let occupied = ParkingSpots::find()
        .filter(
            Condition::all()
                .add(SpotCol::LotId.eq(lot.id))
                .add(SpotCol::Status.eq(SpotStatus::Occupied.as_str())),
        )
        .count(&txn)
        .await?;
    if occupied > 0 {
        return Err(AppError::Conflict(
            "Cannot delete lot with occupied spots.".into(),
        ));
    }

    // Spots and their reservation history go with the lot (ON DELETE CASCADE).
    ParkingLots::delete_by_id(lot.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(lot_id = %id, "parking lot deleted");
    record(
        &state.pool,
        Some(user.user_id),
        AuditAction::LotDelete,
        serde_json::json!({ "lot_id": id, "name": lot.name }),
    )
    .await;

    Ok(ApiResponse::success(
        "Parking lot deleted successfully!",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}
