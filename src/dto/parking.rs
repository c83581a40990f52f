use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{models::ParkingLot, pricing::StayDuration};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReserveRequest {
    pub vehicle_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableLot {
    pub lot: ParkingLot,
    pub available_spots: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableLotList {
    pub items: Vec<AvailableLot>,
}

/// A reservation joined with the spot and lot it belongs to.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservationDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub spot_id: Uuid,
    pub spot_label: String,
    pub lot_id: Uuid,
    pub lot_name: String,
    pub price_per_hour: i64,
    pub vehicle_number: String,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub amount_paid: Option<i64>,
    /// Present once the reservation has been released.
    pub duration: Option<StayDuration>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDashboard {
    pub active_reservations: Vec<ReservationDetail>,
    pub recent_reservations: Vec<ReservationDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationHistory {
    pub active_reservations: Vec<ReservationDetail>,
    pub past_reservations: Vec<ReservationDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReleaseReceipt {
    pub reservation: ReservationDetail,
    pub billed_hours: f64,
    pub amount_paid: i64,
}
