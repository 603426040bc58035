//! The application state tree.
//!
//! [`DurableState`] holds every group that undo/redo tracks. [`RunState`] is the transient part
//! that the timeline rewrites every frame and history never sees.

use crate::foundation::core::{ElementId, Rgba8};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub start: i64,
    pub end: i64,
    /// Run time in seconds, always `> 0`.
    pub duration_secs: f64,
}

impl SequenceConfig {
    pub fn counts_down(&self) -> bool {
        self.start > self.end
    }

    /// Number of integer steps between start and end.
    pub fn total_steps(&self) -> u64 {
        self.start.abs_diff(self.end)
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            start: 10,
            end: 0,
            duration_secs: 5.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundStyle {
    #[default]
    Solid,
    Gradient,
    Particles,
}

impl std::str::FromStr for BackgroundStyle {
    type Err = crate::foundation::error::TickdownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "solid" => Ok(Self::Solid),
            "gradient" => Ok(Self::Gradient),
            "particles" => Ok(Self::Particles),
            other => Err(crate::foundation::error::TickdownError::validation(format!(
                "unknown background style '{other}'"
            ))),
        }
    }
}

/// Supported display typefaces. Accepts either the short id or the CSS family string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FontChoice {
    #[default]
    #[serde(rename = "plus-jakarta-sans", alias = "'Plus Jakarta Sans', sans-serif")]
    PlusJakartaSans,
    #[serde(rename = "bebas-neue", alias = "'Bebas Neue', sans-serif")]
    BebasNeue,
    #[serde(rename = "oswald", alias = "'Oswald', sans-serif")]
    Oswald,
    #[serde(rename = "montserrat", alias = "'Montserrat', sans-serif")]
    Montserrat,
    #[serde(rename = "roboto-mono", alias = "'Roboto Mono', monospace")]
    RobotoMono,
}

impl FontChoice {
    pub const ALL: [FontChoice; 5] = [
        FontChoice::PlusJakartaSans,
        FontChoice::BebasNeue,
        FontChoice::Oswald,
        FontChoice::Montserrat,
        FontChoice::RobotoMono,
    ];

    /// Primary family name, without CSS quoting or generic fallback.
    pub fn family_name(self) -> &'static str {
        match self {
            Self::PlusJakartaSans => "Plus Jakarta Sans",
            Self::BebasNeue => "Bebas Neue",
            Self::Oswald => "Oswald",
            Self::Montserrat => "Montserrat",
            Self::RobotoMono => "Roboto Mono",
        }
    }
}

pub const RING_THICKNESS_MIN: f64 = 1.0;
pub const RING_THICKNESS_MAX: f64 = 40.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VisualTheme {
    pub accent_color: Rgba8,
    pub ring_color: Rgba8,
    pub font: FontChoice,
    pub glow: bool,
    pub sound: bool,
    pub background_style: BackgroundStyle,
    /// Shown while the run is in progress.
    pub motivational_text: String,
    pub start_text: String,
    pub end_text: String,
    pub custom_text: String,
    /// Ring stroke width in pixels, within [`RING_THICKNESS_MIN`]..=[`RING_THICKNESS_MAX`].
    pub ring_thickness: f64,
}

impl Default for VisualTheme {
    fn default() -> Self {
        let blue = Rgba8::opaque(0x00, 0x7A, 0xFF);
        Self {
            accent_color: blue,
            ring_color: blue,
            font: FontChoice::PlusJakartaSans,
            glow: true,
            sound: true,
            background_style: BackgroundStyle::Solid,
            motivational_text: "SIGNAL".to_string(),
            start_text: "PREPARING".to_string(),
            end_text: "FINISHED".to_string(),
            custom_text: "2026".to_string(),
            ring_thickness: 6.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VisibilityFlags {
    pub ring: bool,
    pub countdown: bool,
    pub status: bool,
    pub custom: bool,
    pub percentage: bool,
    /// Presentation mode flag carried for hosts; the engine does not interpret it.
    pub is_prime: bool,
}

impl VisibilityFlags {
    pub fn is_visible(&self, id: ElementId) -> bool {
        match id {
            ElementId::Ring => self.ring,
            ElementId::Countdown => self.countdown,
            ElementId::Status => self.status,
            ElementId::Custom => self.custom,
            ElementId::Percentage => self.percentage,
        }
    }

    pub fn with(mut self, id: ElementId, visible: bool) -> Self {
        match id {
            ElementId::Ring => self.ring = visible,
            ElementId::Countdown => self.countdown = visible,
            ElementId::Status => self.status = visible,
            ElementId::Custom => self.custom = visible,
            ElementId::Percentage => self.percentage = visible,
        }
        self
    }
}

impl Default for VisibilityFlags {
    fn default() -> Self {
        Self {
            ring: true,
            countdown: true,
            status: true,
            custom: true,
            percentage: true,
            is_prime: true,
        }
    }
}

/// Insets from each edge of an element, in output pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Crop {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const SCALE_MIN: f64 = 0.1;
pub const SCALE_MAX: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ElementTransform {
    /// Offset from the canvas center, in pixels.
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub opacity: f64,
    pub crop: Crop,
}

impl ElementTransform {
    pub fn at(x: f64, y: f64, scale: f64, opacity: f64) -> Self {
        Self {
            x,
            y,
            scale,
            opacity,
            crop: Crop::default(),
        }
    }
}

impl Default for ElementTransform {
    fn default() -> Self {
        Self::at(0.0, 0.0, 1.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ElementTransforms {
    pub ring: ElementTransform,
    pub countdown: ElementTransform,
    pub status: ElementTransform,
    pub custom: ElementTransform,
    pub percentage: ElementTransform,
}

impl ElementTransforms {
    pub fn get(&self, id: ElementId) -> &ElementTransform {
        match id {
            ElementId::Ring => &self.ring,
            ElementId::Countdown => &self.countdown,
            ElementId::Status => &self.status,
            ElementId::Custom => &self.custom,
            ElementId::Percentage => &self.percentage,
        }
    }

    pub fn with(mut self, id: ElementId, t: ElementTransform) -> Self {
        let slot = match id {
            ElementId::Ring => &mut self.ring,
            ElementId::Countdown => &mut self.countdown,
            ElementId::Status => &mut self.status,
            ElementId::Custom => &mut self.custom,
            ElementId::Percentage => &mut self.percentage,
        };
        *slot = t;
        self
    }
}

impl Default for ElementTransforms {
    fn default() -> Self {
        Self {
            ring: ElementTransform::default(),
            countdown: ElementTransform::default(),
            status: ElementTransform::at(0.0, 100.0, 1.0, 1.0),
            custom: ElementTransform::at(0.0, 180.0, 0.5, 0.4),
            percentage: ElementTransform::at(0.0, -90.0, 0.4, 0.3),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    /// Preset output dimensions for this ratio.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Portrait => (360, 640),
            Self::Square => (480, 480),
            Self::Landscape => (640, 360),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Portrait => "9:16",
            Self::Square => "1:1",
            Self::Landscape => "16:9",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CanvasGeometry {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: AspectRatio,
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        let (width, height) = AspectRatio::Portrait.dimensions();
        Self {
            width,
            height,
            aspect_ratio: AspectRatio::Portrait,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Webm,
    Mp4,
    Png,
    Gif,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Webm => "video/webm",
            Self::Mp4 => "video/mp4",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    pub fn is_still(self) -> bool {
        matches!(self, Self::Png)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Resolution {
    #[serde(rename = "720p")]
    Hd720,
    #[default]
    #[serde(rename = "1080p")]
    Hd1080,
    #[serde(rename = "4k")]
    Uhd4k,
}

impl Resolution {
    /// Pixel-density multiplier applied to the canvas for video capture.
    pub fn scale(self) -> u32 {
        match self {
            Self::Hd720 => 2,
            Self::Hd1080 => 3,
            Self::Uhd4k => 4,
        }
    }

    /// Encoder bitrate hint in bits per second at quality 1.
    pub fn bitrate_bps(self) -> u64 {
        match self {
            Self::Uhd4k => 20_000_000,
            _ => 10_000_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub resolution: Resolution,
    /// 30 or 60.
    pub fps: u32,
    /// In `(0, 1]`.
    pub quality: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Webm,
            resolution: Resolution::Hd1080,
            fps: 30,
            quality: 1.0,
        }
    }
}

/// Every group tracked by undo/redo.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DurableState {
    pub sequence: SequenceConfig,
    pub visuals: VisualTheme,
    pub visibility: VisibilityFlags,
    pub transforms: ElementTransforms,
    pub canvas: CanvasGeometry,
    pub export: ExportSettings,
}

/// Transient per-frame state; never recorded in history.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunState {
    pub is_previewing: bool,
    pub is_exporting: bool,
    /// In `[0, 1]`.
    pub progress: f64,
    pub current_count: i64,
    pub selected_element: Option<ElementId>,
}

impl RunState {
    pub fn idle(current_count: i64) -> Self {
        Self {
            is_previewing: false,
            is_exporting: false,
            progress: 0.0,
            current_count,
            selected_element: Some(ElementId::Countdown),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.is_previewing || self.is_exporting
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AppState {
    pub durable: DurableState,
    pub run: RunState,
}

impl AppState {
    pub fn new(durable: DurableState) -> Self {
        let run = RunState::idle(durable.sequence.start);
        Self { durable, run }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DurableState::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/model.rs"]
mod tests;
