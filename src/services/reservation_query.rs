use chrono::Utc;
use sea_orm::{
    ConnectionTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, sea_query::SimpleExpr,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use crate::{
    dto::parking::ReservationDetail,
    entity::{
        parking_lots::Column as LotCol,
        parking_spots::{self, Column as SpotCol},
        reservations::{self, Column as ResCol, Entity as Reservations},
    },
    error::AppResult,
    models::spot_label,
    pricing::stay_duration,
    routes::params::SortOrder,
};

#[derive(Debug, FromQueryResult)]
struct ReservationRow {
    id: Uuid,
    user_id: Uuid,
    spot_id: Uuid,
    check_in: DateTimeWithTimeZone,
    check_out: Option<DateTimeWithTimeZone>,
    amount_paid: Option<i64>,
    vehicle_number: String,
    spot_number: i32,
    lot_id: Uuid,
    lot_name: String,
    price_per_hour: i64,
}

impl From<ReservationRow> for ReservationDetail {
    fn from(row: ReservationRow) -> Self {
        let check_in = row.check_in.with_timezone(&Utc);
        let check_out = row.check_out.map(|dt| dt.with_timezone(&Utc));
        Self {
            id: row.id,
            user_id: row.user_id,
            spot_id: row.spot_id,
            spot_label: spot_label(row.spot_number),
            lot_id: row.lot_id,
            lot_name: row.lot_name,
            price_per_hour: row.price_per_hour,
            vehicle_number: row.vehicle_number,
            check_in,
            check_out,
            amount_paid: row.amount_paid,
            duration: check_out.map(|out| stay_duration(check_in, out)),
        }
    }
}

/// Reservations matching `filter`, joined with their spot and lot, ordered by check-in.
pub async fn fetch_details<C>(
    conn: &C,
    filter: SimpleExpr,
    order: SortOrder,
    limit: Option<u64>,
) -> AppResult<Vec<ReservationDetail>>
where
    C: ConnectionTrait,
{
    let mut finder = Reservations::find()
        .select_only()
        .columns([
            ResCol::Id,
            ResCol::UserId,
            ResCol::SpotId,
            ResCol::CheckIn,
            ResCol::CheckOut,
            ResCol::AmountPaid,
            ResCol::VehicleNumber,
        ])
        .column_as(SpotCol::SpotNumber, "spot_number")
        .column_as(SpotCol::LotId, "lot_id")
        .column_as(LotCol::Name, "lot_name")
        .column_as(LotCol::PricePerHour, "price_per_hour")
        .join(JoinType::InnerJoin, reservations::Relation::ParkingSpots.def())
        .join(JoinType::InnerJoin, parking_spots::Relation::ParkingLots.def())
        .filter(filter);

    finder = match order {
        SortOrder::Asc => finder.order_by_asc(ResCol::CheckIn),
        SortOrder::Desc => finder.order_by_desc(ResCol::CheckIn),
    };
    if let Some(limit) = limit {
        finder = finder.limit(limit);
    }

    let rows = finder.into_model::<ReservationRow>().all(conn).await?;
    Ok(rows.into_iter().map(ReservationDetail::from).collect())
}
