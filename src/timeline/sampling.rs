//! Pure progress -> count mapping, shared by live runs and scrubbing.

/// How a fractional position between `start` and `end` becomes the displayed integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingPolicy {
    /// Round toward the direction of travel's origin: ceiling when counting down, floor when
    /// counting up. The displayed value never passes `end` before the run completes, so each
    /// change lands on the exact frame the integer boundary is crossed.
    #[default]
    Directional,
    /// Nearest integer, half up. Coarser; digits change half a step early.
    Nearest,
}

/// Normalized run position for an absolute elapsed time.
pub fn progress_at(elapsed_secs: f64, duration_secs: f64) -> f64 {
    if !(duration_secs.is_finite() && duration_secs > 0.0) {
        return 1.0;
    }
    if !elapsed_secs.is_finite() {
        return if elapsed_secs > 0.0 { 1.0 } else { 0.0 };
    }
    (elapsed_secs / duration_secs).clamp(0.0, 1.0)
}

/// Displayed count at progress `t`. At `t >= 1` this is exactly `end`.
pub fn count_at(start: i64, end: i64, t: f64, policy: RoundingPolicy) -> i64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    if t >= 1.0 {
        return end;
    }
    let raw = start as f64 + (end as f64 - start as f64) * t;
    let rounded = match policy {
        RoundingPolicy::Directional if start > end => raw.ceil(),
        RoundingPolicy::Directional => raw.floor(),
        RoundingPolicy::Nearest => (raw + 0.5).floor(),
    };
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    (rounded as i64).clamp(lo, hi)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/sampling.rs"]
mod tests;
