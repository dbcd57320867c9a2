/// Minutes of real playtime per raw upstream playtime unit.
pub const CONVERSION_FACTOR: f64 = 4.7;

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Hours rounded to two decimals.
pub fn playtime_hours_2dp(raw: f64) -> f64 {
    round2(raw * CONVERSION_FACTOR / 60.0)
}

/// Whole hours, rounded from the two-decimal value (not from the raw
/// quotient). Half-way values round away from zero.
pub fn playtime_hours(raw: f64) -> i64 {
    playtime_hours_2dp(raw).round() as i64
}
