/// Round to a fixed number of decimal places for display.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Round to the nearest whole number for display.
pub fn round_whole(value: f64) -> i64 {
    value.round() as i64
}
