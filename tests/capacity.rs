use chrono::Utc;
use parking_reservation_api::{
    entity::parking_spots::Model as SpotModel,
    error::AppError,
    models::SpotStatus,
    services::lot_service::plan_capacity,
};
use uuid::Uuid;

fn spot(lot_id: Uuid, number: i32, status: SpotStatus) -> SpotModel {
    SpotModel {
        id: Uuid::new_v4(),
        lot_id,
        spot_number: number,
        status: status.as_str().to_string(),
        created_at: Utc::now().fixed_offset(),
    }
}

fn lot_of(count: i32, occupied: &[i32]) -> Vec<SpotModel> {
    let lot_id = Uuid::new_v4();
    (1..=count)
        .map(|n| {
            let status = if occupied.contains(&n) {
                SpotStatus::Occupied
            } else {
                SpotStatus::Available
            };
            spot(lot_id, n, status)
        })
        .collect()
}

#[test]
fn growing_appends_following_numbers() {
    let spots = lot_of(3, &[1]);
    let plan = plan_capacity(5, &spots).unwrap();
    assert_eq!(plan.add, vec![4, 5]);
    assert!(plan.remove.is_empty());
}

#[test]
fn same_capacity_changes_nothing() {
    let spots = lot_of(4, &[2, 3]);
    let plan = plan_capacity(4, &spots).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn shrinking_removes_highest_numbers() {
    let spots = lot_of(5, &[1, 2]);
    let plan = plan_capacity(3, &spots).unwrap();

    let expected: Vec<Uuid> = spots
        .iter()
        .filter(|s| s.spot_number > 3)
        .map(|s| s.id)
        .collect();
    assert_eq!(plan.remove, expected);
    assert!(plan.add.is_empty());
}

#[test]
fn shrinking_over_occupied_spots_is_rejected() {
    let spots = lot_of(5, &[4, 5]);
    match plan_capacity(3, &spots) {
        Err(AppError::Conflict(message)) => {
            assert_eq!(
                message,
                "Cannot reduce spots. 2 of the to-be-removed spots are occupied!"
            );
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn occupied_spots_below_new_capacity_do_not_block_shrink() {
    let spots = lot_of(5, &[1, 3]);
    let plan = plan_capacity(3, &spots).unwrap();
    assert_eq!(plan.remove.len(), 2);
}

#[test]
fn missing_numbers_are_refilled() {
    let lot_id = Uuid::new_v4();
    let spots = vec![
        spot(lot_id, 1, SpotStatus::Available),
        spot(lot_id, 3, SpotStatus::Available),
    ];
    let plan = plan_capacity(4, &spots).unwrap();
    assert_eq!(plan.add, vec![2, 4]);
}
