use std::time::Duration;

/// Format a `Duration` as `M:SS`.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Time left in a track, never negative.
pub fn remaining(elapsed: Duration, total: Duration) -> Duration {
    total.saturating_sub(elapsed)
}

/// Fraction of the track played, clamped to `0.0..=1.0`.
pub fn progress_ratio(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}
