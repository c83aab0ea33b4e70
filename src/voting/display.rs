// Absorbs binary representation error such as 0.29 * 100 = 28.999999999999996
const TRUNCATION_EPSILON: f64 = 1e-9;

/// Rounds toward zero to one decimal place: `33.27` becomes `33.2`.
pub fn truncate_to_one_decimal(ratio: f64) -> f64 {
    let scaled = ratio * 10.0;
    let nudged = scaled + TRUNCATION_EPSILON * scaled.signum();
    nudged.trunc() / 10.0
}

/// Renders a percentage for the vote bar.
///
/// The value is truncated first. A zero tenths digit renders as a whole
/// number (`50`), anything else keeps one decimal (`33.2`).
pub fn format_ratio(ratio: f64) -> String {
    let truncated = truncate_to_one_decimal(ratio);
    let tenths = ((truncated * 10.0).round() as i64).rem_euclid(10);

    if tenths == 0 {
        format!("{:.0}", truncated)
    } else {
        format!("{:.1}", truncated)
    }
}
