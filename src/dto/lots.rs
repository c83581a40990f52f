use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{ParkingLot, ParkingSpot};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLotRequest {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    /// Minor currency units.
    pub price_per_hour: i64,
    pub max_spots: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLotRequest {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub price_per_hour: i64,
    pub total_spots: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LotSummary {
    pub lot: ParkingLot,
    pub available_spots: i64,
    pub occupied_spots: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LotList {
    pub items: Vec<LotSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LotWithSpots {
    pub lot: ParkingLot,
    pub spots: Vec<ParkingSpot>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub lots: Vec<LotSummary>,
    pub available_spots: i64,
    pub occupied_spots: i64,
    pub users_count: i64,
}
