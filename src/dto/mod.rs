pub mod auth;
pub mod lots;
pub mod parking;
pub mod users;
