use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{parking_lots, parking_spots, reservations, users};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::User => ROLE_USER,
        }
    }

    /// Where a freshly logged-in client should land.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/api/admin/dashboard",
            Role::User => "/api/user/dashboard",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_USER => Ok(Role::User),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpotStatus {
    Available,
    Occupied,
}

impl SpotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotStatus::Available => "available",
            SpotStatus::Occupied => "occupied",
        }
    }
}

impl FromStr for SpotStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(SpotStatus::Available),
            "occupied" => Ok(SpotStatus::Occupied),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown value `{0}`")]
pub struct UnknownVariant(pub String);

/// Display label of a spot, e.g. `P-3`.
pub fn spot_label(spot_number: i32) -> String {
    format!("P-{spot_number}")
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub gender: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            mobile: model.mobile,
            gender: model.gender,
            // Unknown roles never get admin rights.
            role: model.role.parse().unwrap_or(Role::User),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParkingLot {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub price_per_hour: i64,
    pub max_spots: i32,
    pub created_at: DateTime<Utc>,
}

impl From<parking_lots::Model> for ParkingLot {
    fn from(model: parking_lots::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            postal_code: model.postal_code,
            price_per_hour: model.price_per_hour,
            max_spots: model.max_spots,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParkingSpot {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub spot_number: i32,
    pub label: String,
    pub status: SpotStatus,
}

impl From<parking_spots::Model> for ParkingSpot {
    fn from(model: parking_spots::Model) -> Self {
        Self {
            id: model.id,
            lot_id: model.lot_id,
            spot_number: model.spot_number,
            label: spot_label(model.spot_number),
            // Anything not explicitly available is treated as taken.
            status: model.status.parse().unwrap_or(SpotStatus::Occupied),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub amount_paid: Option<i64>,
    pub vehicle_number: String,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.check_out.is_none()
    }
}

impl From<reservations::Model> for Reservation {
    fn from(model: reservations::Model) -> Self {
        Self {
            id: model.id,
            spot_id: model.spot_id,
            user_id: model.user_id,
            check_in: model.check_in.with_timezone(&Utc),
            check_out: model.check_out.map(|dt| dt.with_timezone(&Utc)),
            amount_paid: model.amount_paid,
            vehicle_number: model.vehicle_number,
        }
    }
}
