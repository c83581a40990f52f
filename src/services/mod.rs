pub mod admin_service;
pub mod auth_service;
pub mod lot_service;
pub mod parking_service;
pub mod reservation_query;
