use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use parking_reservation_api::{
    app::build_app,
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        lots::{CreateLotRequest, UpdateLotRequest},
        parking::ReserveRequest,
    },
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::auth::AuthUser,
    models::{Role, SpotStatus},
    routes::params::{ParkingSearchQuery, ReservationListQuery, UserListQuery},
    services::{admin_service, auth_service, lot_service, parking_service},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use tower::ServiceExt;
use uuid::Uuid;

fn expect_conflict<T: std::fmt::Debug>(result: Result<T, AppError>) -> String {
    match result {
        Err(AppError::Conflict(message)) => message,
        other => panic!("expected conflict, got {other:?}"),
    }
}

// Integration flow: register -> admin creates lot -> users fill it -> release, resize and delete.
#[tokio::test]
async fn reserve_release_and_lot_lifecycle_flow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    // Registration and duplicate checks
    let register = |email: &str, mobile: &str| RegisterRequest {
        full_name: "Test Driver".into(),
        email: email.into(),
        password: "secret1".into(),
        mobile: mobile.into(),
        gender: Some("Male".into()),
    };
    let first = auth_service::register_user(&state, register("Driver@Example.com", "9000000101"))
        .await?
        .data
        .unwrap();
    assert_eq!(first.email, "driver@example.com");
    assert_eq!(first.role, Role::User);

    let second = auth_service::register_user(&state, register("other@example.com", "9000000102"))
        .await?
        .data
        .unwrap();

    assert_eq!(
        expect_conflict(
            auth_service::register_user(&state, register("driver@example.com", "9000000199")).await
        ),
        "Email already exists"
    );
    assert_eq!(
        expect_conflict(
            auth_service::register_user(&state, register("new@example.com", "9000000101")).await
        ),
        "Mobile already registered"
    );

    // Login
    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: "driver@example.com".into(),
            password: "secret1".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(login.dashboard, "/api/user/dashboard");
    assert!(matches!(
        auth_service::login_user(
            &state,
            LoginRequest {
                email: "driver@example.com".into(),
                password: "wrong-password".into(),
            },
        )
        .await,
        Err(AppError::Unauthorized(_))
    ));

    let driver = AuthUser {
        user_id: first.id,
        role: Role::User,
    };
    let other_driver = AuthUser {
        user_id: second.id,
        role: Role::User,
    };
    let admin = AuthUser {
        user_id: create_admin(&state).await?,
        role: Role::Admin,
    };

    // Only admins manage lots
    let lot_request = || CreateLotRequest {
        name: "Test Garage".into(),
        address: "1 Test Street".into(),
        postal_code: "560099".into(),
        price_per_hour: 5000,
        max_spots: 2,
    };
    assert!(matches!(
        lot_service::create_lot(&state, &driver, lot_request()).await,
        Err(AppError::Forbidden)
    ));

    let created = lot_service::create_lot(&state, &admin, lot_request())
        .await?
        .data
        .unwrap();
    let lot_id = created.lot.id;
    let labels: Vec<_> = created.spots.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["P-1", "P-2"]);

    // Search by postal code
    let found = parking_service::search_lots(
        &state,
        &driver,
        ParkingSearchQuery {
            postal_code: Some("560099".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].available_spots, 2);

    // Fill the lot; lowest numbered spot goes first
    let reserve = |vehicle: &str| ReserveRequest {
        vehicle_number: vehicle.into(),
    };
    let first_res = parking_service::reserve_spot(&state, &driver, lot_id, reserve("ka01ab0001"))
        .await?
        .data
        .unwrap();
    assert_eq!(first_res.spot_label, "P-1");
    assert_eq!(first_res.vehicle_number, "KA01AB0001");

    let lot = lot_service::get_lot(&state, &admin, lot_id).await?.data.unwrap();
    let statuses: Vec<_> = lot.spots.iter().map(|s| (s.spot_number, s.status)).collect();
    assert_eq!(
        statuses,
        [(1, SpotStatus::Occupied), (2, SpotStatus::Available)]
    );

    let second_res =
        parking_service::reserve_spot(&state, &other_driver, lot_id, reserve("KA01AB0002"))
            .await?
            .data
            .unwrap();
    assert_eq!(second_res.spot_label, "P-2");

    assert_eq!(
        expect_conflict(
            parking_service::reserve_spot(&state, &driver, lot_id, reserve("KA01AB0003")).await
        ),
        "No available spots in this lot"
    );

    // Full lots drop out of search results
    let found = parking_service::search_lots(&state, &driver, ParkingSearchQuery::default())
        .await?
        .data
        .unwrap();
    assert!(found.items.iter().all(|l| l.lot.id != lot_id));

    // Occupied lots cannot be deleted or shrunk below an occupied spot
    assert_eq!(
        expect_conflict(lot_service::delete_lot(&state, &admin, lot_id).await),
        "Cannot delete lot with occupied spots."
    );
    let update = |total: i32| UpdateLotRequest {
        name: "Test Garage".into(),
        address: "1 Test Street".into(),
        postal_code: "560099".into(),
        price_per_hour: 5000,
        total_spots: total,
    };
    assert!(
        expect_conflict(lot_service::update_lot(&state, &admin, lot_id, update(1)).await)
            .starts_with("Cannot reduce spots.")
    );

    // Someone else's reservation looks like it does not exist
    assert!(matches!(
        parking_service::release_spot(&state, &other_driver, first_res.id).await,
        Err(AppError::NotFound)
    ));

    // Release bills at least one hour
    let receipt = parking_service::release_spot(&state, &driver, first_res.id)
        .await?
        .data
        .unwrap();
    assert_eq!(receipt.amount_paid, 5000);
    assert_eq!(receipt.billed_hours, 1.0);
    assert!(receipt.reservation.check_out.is_some());

    assert_eq!(
        expect_conflict(parking_service::release_spot(&state, &driver, first_res.id).await),
        "Reservation already released"
    );

    let lot = lot_service::get_lot(&state, &admin, lot_id).await?.data.unwrap();
    let p1 = lot.spots.iter().find(|s| s.spot_number == 1).unwrap();
    assert_eq!(p1.status, SpotStatus::Available);

    // History splits active from completed stays
    let history = parking_service::my_reservations(&state, &driver)
        .await?
        .data
        .unwrap();
    assert!(history.active_reservations.is_empty());
    assert_eq!(history.past_reservations.len(), 1);
    assert_eq!(history.past_reservations[0].amount_paid, Some(5000));

    // Admin views
    let users = admin_service::list_users(
        &state,
        &admin,
        UserListQuery {
            q: Some("other@".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(users.meta.as_ref().and_then(|m| m.total), Some(1));

    let wildcard = admin_service::list_users(
        &state,
        &admin,
        UserListQuery {
            q: Some("_".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(wildcard.meta.as_ref().and_then(|m| m.total), Some(0));

    let user_view = admin_service::user_reservations(
        &state,
        &admin,
        second.id,
        ReservationListQuery::default(),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(user_view.reservations.len(), 1);

    let dashboard = admin_service::dashboard(&state, &admin).await?.data.unwrap();
    assert_eq!(dashboard.users_count, 2);
    assert_eq!(dashboard.occupied_spots, 1);
    assert_eq!(dashboard.available_spots, 1);

    // Growing keeps existing spots and appends new numbers
    let grown = lot_service::update_lot(&state, &admin, lot_id, update(4)).await?;
    assert!(grown.message.contains("Added 2 new parking spots"));
    assert_eq!(grown.data.unwrap().spots.len(), 4);

    // Once the last car leaves the lot can go
    parking_service::release_spot(&state, &admin, second_res.id).await?;
    lot_service::delete_lot(&state, &admin, lot_id).await?;
    assert!(matches!(
        lot_service::get_lot(&state, &admin, lot_id).await,
        Err(AppError::NotFound)
    ));

    // Dashboard keeps the five most recent completed stays, newest first
    let cycle_lot = lot_service::create_lot(
        &state,
        &admin,
        CreateLotRequest {
            name: "Cycle Garage".into(),
            address: "2 Test Street".into(),
            postal_code: "560098".into(),
            price_per_hour: 1000,
            max_spots: 1,
        },
    )
    .await?
    .data
    .unwrap()
    .lot
    .id;

    let mut completed = Vec::new();
    for n in 0..6 {
        let stay = parking_service::reserve_spot(
            &state,
            &driver,
            cycle_lot,
            reserve(&format!("KA01CY000{n}")),
        )
        .await?
        .data
        .unwrap();
        parking_service::release_spot(&state, &driver, stay.id).await?;
        completed.push(stay.id);
    }
    let parked = parking_service::reserve_spot(&state, &driver, cycle_lot, reserve("KA01CY0009"))
        .await?
        .data
        .unwrap();

    let dashboard = parking_service::dashboard(&state, &driver).await?.data.unwrap();
    let active: Vec<Uuid> = dashboard.active_reservations.iter().map(|r| r.id).collect();
    assert_eq!(active, [parked.id]);

    let recent: Vec<Uuid> = dashboard.recent_reservations.iter().map(|r| r.id).collect();
    let newest_five: Vec<Uuid> = completed.iter().rev().take(5).copied().collect();
    assert_eq!(recent, newest_five);
    assert!(
        dashboard
            .recent_reservations
            .windows(2)
            .all(|pair| pair[0].check_in >= pair[1].check_in)
    );

    // Logout revokes tokens already handed out, bearer copies included
    let me_status = |token: String| {
        let app = build_app(state.clone());
        async move {
            let request = Request::builder()
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap();
            app.oneshot(request).await.unwrap().status()
        }
    };
    assert_eq!(me_status(login.token.clone()).await, StatusCode::OK);

    auth_service::logout_user(&state, &driver).await?;
    assert_eq!(me_status(login.token.clone()).await, StatusCode::UNAUTHORIZED);

    let fresh = auth_service::login_user(
        &state,
        LoginRequest {
            email: "driver@example.com".into(),
            password: "secret1".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(me_status(fresh.token).await, StatusCode::OK);

    Ok(())
}

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some(database_url.clone()),
        "JWT_SECRET" => Some("flow-test-secret".to_string()),
        _ => None,
    })?;
    let pool = create_pool(&config.database_url).await?;
    let state = AppState::new(pool, config);
    run_migrations(&state.orm).await?;

    // Clean tables between runs
    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE reservations, parking_spots, parking_lots, audit_logs, users CASCADE",
        ))
        .await?;

    Ok(Some(state))
}

async fn create_admin(state: &AppState) -> anyhow::Result<Uuid> {
    let admin = UserActive {
        id: Set(Uuid::new_v4()),
        full_name: Set("Flow Admin".into()),
        email: Set("admin@example.com".into()),
        mobile: Set("9000000100".into()),
        gender: Set(None),
        password_hash: Set(auth_service::hash_password("admin99")?),
        role: Set(Role::Admin.as_str().into()),
        session_version: NotSet,
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(admin.id)
}
