//! Walking ETA.

/// Default walking speed, metres per minute: exactly 5 km/h.
///
/// Must stay the exact fraction: at a rounded `83.33` a 500 m walk reads
/// "7 min".
pub const DEFAULT_WALKING_SPEED_M_PER_MIN: f64 = 250.0 / 3.0;

/// Whole minutes needed to walk `distance_m`, rounded up.
///
/// A non-positive or non-finite speed falls back to
/// [`DEFAULT_WALKING_SPEED_M_PER_MIN`].
pub fn eta_minutes(distance_m: f64, speed_m_per_min: f64) -> u32 {
    if !(distance_m > 0.0) {
        return 0;
    }
    let speed = if speed_m_per_min.is_finite() && speed_m_per_min > 0.0 {
        speed_m_per_min
    } else {
        DEFAULT_WALKING_SPEED_M_PER_MIN
    };
    (distance_m / speed).ceil().min(u32::MAX as f64) as u32
}

/// Human-readable ETA: `"< 1 min"`, `"1 min"`, or `"{n} min"`.
pub fn eta_label(distance_m: f64, speed_m_per_min: f64) -> String {
    match eta_minutes(distance_m, speed_m_per_min) {
        0 => "< 1 min".to_owned(),
        1 => "1 min".to_owned(),
        n => format!("{n} min"),
    }
}
