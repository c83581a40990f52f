use serde::Serialize;
use utoipa::ToSchema;

use crate::{dto::parking::ReservationDetail, models::User};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserReservations {
    pub user: User,
    pub reservations: Vec<ReservationDetail>,
}
