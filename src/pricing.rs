//! Parking fees.
//!
//! Prices and amounts are integers in minor currency units. A stay is billed
//! for its exact elapsed time at the lot's hourly rate, with a one-hour minimum,
//! rounded to the nearest minor unit.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Hours charged for a stay: never less than one.
pub fn billable_hours(elapsed: Duration) -> f64 {
    let seconds = elapsed.num_seconds().max(0) as f64;
    (seconds / SECONDS_PER_HOUR).max(1.0)
}

pub fn compute_fee(elapsed: Duration, price_per_hour: i64) -> i64 {
    (billable_hours(elapsed) * price_per_hour as f64).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct StayDuration {
    pub minutes: i64,
    /// Rounded to two decimals.
    pub hours: f64,
}

pub fn stay_duration(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> StayDuration {
    let seconds = (check_out - check_in).num_seconds().max(0);
    let hours = seconds as f64 / SECONDS_PER_HOUR;
    StayDuration {
        minutes: seconds / 60,
        hours: (hours * 100.0).round() / 100.0,
    }
}
