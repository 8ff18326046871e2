use chrono::{DateTime, Duration, Utc};

/// Refund owed for a cancellation, as a function of time until departure:
/// more than 24 hours out refunds everything, more than 12 hours refunds
/// half, anything closer (including departures already in the past) refunds
/// nothing. Both boundaries are strict: exactly 24h is the half bucket,
/// exactly 12h is the zero bucket.
///
/// Amounts are integral; the half refund truncates (integer division).
pub fn refund_for(total_amount: i64, departure_time: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let until_departure = departure_time.signed_duration_since(now);
    if until_departure > Duration::hours(24) {
        total_amount
    } else if until_departure > Duration::hours(12) {
        total_amount / 2
    } else {
        0
    }
}
