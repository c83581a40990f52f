use chrono::{Duration, TimeZone, Utc};
use parking_reservation_api::pricing::{billable_hours, compute_fee, stay_duration};

#[test]
fn short_stays_bill_one_hour_minimum() {
    assert_eq!(compute_fee(Duration::minutes(0), 4000), 4000);
    assert_eq!(compute_fee(Duration::minutes(10), 4000), 4000);
    assert_eq!(compute_fee(Duration::minutes(60), 4000), 4000);
}

#[test]
fn longer_stays_bill_elapsed_time() {
    assert_eq!(compute_fee(Duration::minutes(90), 4000), 6000);
    assert_eq!(compute_fee(Duration::hours(3), 2500), 7500);
    // 61 minutes at 100/h = 101.666.. -> 102
    assert_eq!(compute_fee(Duration::minutes(61), 100), 102);
}

#[test]
fn negative_elapsed_time_bills_minimum() {
    assert_eq!(billable_hours(Duration::minutes(-30)), 1.0);
    assert_eq!(compute_fee(Duration::minutes(-30), 500), 500);
}

#[test]
fn free_lots_cost_nothing() {
    assert_eq!(compute_fee(Duration::hours(5), 0), 0);
}

#[test]
fn stay_duration_reports_minutes_and_rounded_hours() {
    let check_in = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let check_out = check_in + Duration::minutes(100) + Duration::seconds(59);

    let stay = stay_duration(check_in, check_out);
    assert_eq!(stay.minutes, 100);
    assert_eq!(stay.hours, 1.68);
}

#[test]
fn stay_duration_never_negative() {
    let check_in = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let stay = stay_duration(check_in, check_in - Duration::minutes(5));
    assert_eq!(stay.minutes, 0);
    assert_eq!(stay.hours, 0.0);
}
