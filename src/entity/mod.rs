pub mod parking_lots;
pub mod parking_spots;
pub mod reservations;
pub mod users;

pub use parking_lots::Entity as ParkingLots;
pub use parking_spots::Entity as ParkingSpots;
pub use reservations::Entity as Reservations;
pub use users::Entity as Users;
