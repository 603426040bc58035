//! Studio tuning and read-only presets.

use std::path::Path;
use std::time::Duration;

use crate::foundation::error::{TickdownError, TickdownResult};
use crate::history::manager::DEFAULT_HISTORY_CAPACITY;
use crate::state::model::DurableState;
use crate::timeline::sampling::RoundingPolicy;

/// Tunables for a [`crate::Studio`]. Every field has a default, so partial JSON is accepted.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Maximum number of undo steps kept.
    pub history_capacity: usize,
    /// How long a finished preview keeps reporting `is_previewing`.
    pub preview_hold_ms: u64,
    /// How long changed digits stay highlighted.
    pub highlight_ms: u64,
    /// Extra capture after an export run completes.
    pub trailing_capture_ms: u64,
    /// Pixel density of still-frame exports.
    pub still_scale: u32,
    pub preview_rounding: RoundingPolicy,
    pub export_rounding: RoundingPolicy,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            preview_hold_ms: 1000,
            highlight_ms: 350,
            trailing_capture_ms: 500,
            still_scale: 2,
            preview_rounding: RoundingPolicy::Directional,
            export_rounding: RoundingPolicy::Directional,
        }
    }
}

impl StudioConfig {
    pub fn validate(&self) -> TickdownResult<()> {
        if self.history_capacity == 0 {
            return Err(TickdownError::validation("history_capacity must be >= 1"));
        }
        if self.still_scale == 0 {
            return Err(TickdownError::validation("still_scale must be >= 1"));
        }
        Ok(())
    }

    pub fn preview_hold(&self) -> Duration {
        Duration::from_millis(self.preview_hold_ms)
    }

    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    pub fn trailing_capture(&self) -> Duration {
        Duration::from_millis(self.trailing_capture_ms)
    }
}

/// Initial document plus tuning, loaded from JSON. Presets are only ever read.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Preset {
    pub state: DurableState,
    pub config: StudioConfig,
}

impl Preset {
    pub fn from_json_str(s: &str) -> TickdownResult<Self> {
        let preset: Self =
            serde_json::from_str(s).map_err(|e| TickdownError::serde(e.to_string()))?;
        preset.config.validate()?;
        Ok(preset)
    }

    pub fn from_path(path: &Path) -> TickdownResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read preset '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
