use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, SessionInfo},
        lots::{
            AdminDashboard, CreateLotRequest, LotList, LotSummary, LotWithSpots, UpdateLotRequest,
        },
        parking::{
            AvailableLot, AvailableLotList, ReleaseReceipt, ReservationDetail, ReservationHistory,
            ReserveRequest, UserDashboard,
        },
        users::{UserList, UserReservations},
    },
    models::{ParkingLot, ParkingSpot, Reservation, Role, SpotStatus, User},
    pricing::StayDuration,
    response::{ApiResponse, FlashLevel, Meta},
    routes::{admin, auth, health, params, user},
    session::SESSION_COOKIE,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        admin::dashboard,
        admin::list_lots,
        admin::create_lot,
        admin::get_lot,
        admin::update_lot,
        admin::delete_lot,
        admin::list_users,
        admin::user_reservations,
        user::dashboard,
        user::search_parking,
        user::reserve_spot,
        user::release_spot,
        user::my_reservations
    ),
    components(
        schemas(
            User,
            Role,
            ParkingLot,
            ParkingSpot,
            SpotStatus,
            Reservation,
            StayDuration,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            SessionInfo,
            CreateLotRequest,
            UpdateLotRequest,
            LotSummary,
            LotList,
            LotWithSpots,
            AdminDashboard,
            ReserveRequest,
            AvailableLot,
            AvailableLotList,
            ReservationDetail,
            UserDashboard,
            ReservationHistory,
            ReleaseReceipt,
            UserList,
            UserReservations,
            params::Pagination,
            params::LotListQuery,
            params::UserListQuery,
            params::ParkingSearchQuery,
            params::ReservationListQuery,
            FlashLevel,
            Meta,
            ApiResponse<User>,
            ApiResponse<LoginResponse>,
            ApiResponse<LotList>,
            ApiResponse<LotWithSpots>,
            ApiResponse<AdminDashboard>,
            ApiResponse<AvailableLotList>,
            ApiResponse<ReservationDetail>,
            ApiResponse<ReleaseReceipt>,
            ApiResponse<ReservationHistory>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration, login and session endpoints"),
        (name = "Admin", description = "Lot and user administration"),
        (name = "Parking", description = "Search, reserve and release spots"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
