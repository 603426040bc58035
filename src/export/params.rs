use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::state::model::{ExportFormat, ExportSettings};

pub const MOTION_PREFIX: &str = "signal-motion";
pub const FRAME_PREFIX: &str = "signal-frame";

/// Longest recording accepted, in frames (one hour at 60 fps).
pub const MAX_EXPORT_FRAMES: u64 = 60 * 60 * 60;

/// Milliseconds since the Unix epoch, or 0 if the system clock is before it.
pub fn unix_ms_now() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// `signal-frame-<ms>.png` for stills, `signal-motion-<ms>.<ext>` otherwise.
pub fn artifact_name(format: ExportFormat, unix_ms: u128) -> String {
    if format.is_still() {
        format!("{FRAME_PREFIX}-{unix_ms}.png")
    } else {
        format!("{MOTION_PREFIX}-{unix_ms}.{}", format.extension())
    }
}

/// Bitrate hint: the resolution's base rate scaled by quality.
pub fn bitrate_bps(settings: &ExportSettings) -> u64 {
    let base = settings.resolution.bitrate_bps() as f64;
    let quality = if settings.quality.is_finite() {
        settings.quality.clamp(0.0, 1.0)
    } else {
        1.0
    };
    ((base * quality).round() as u64).max(1)
}

/// Frames captured after completion to cover `trailing`.
pub fn trailing_frames(trailing: Duration, fps: u32) -> u64 {
    let ms = trailing.as_millis();
    ((ms * u128::from(fps)).div_ceil(1000)) as u64
}

/// Timestamp of frame `idx` at `fps`.
pub fn frame_time(idx: u64, fps: u32) -> Duration {
    if fps == 0 {
        return Duration::ZERO;
    }
    let nanos = u128::from(idx) * 1_000_000_000 / u128::from(fps);
    Duration::from_nanos(nanos.min(u128::from(u64::MAX)) as u64)
}

#[cfg(test)]
#[path = "../../tests/unit/export/params.rs"]
mod tests;
