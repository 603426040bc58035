//! Partial updates for each durable group.
//!
//! A patch names only the fields it changes. Applying it yields a complete, sanitized group:
//! numeric fields are clamped to their valid ranges and non-finite values fall back, so a patch
//! can never leave a group partially invalid.

use crate::foundation::core::{ElementId, Rgba8};
use crate::foundation::input::{parse_duration_input, parse_float_input, parse_int_input};
use crate::state::model::{
    AspectRatio, BackgroundStyle, CanvasGeometry, Crop, DurableState, ElementTransform, ExportFormat,
    ExportSettings, FontChoice, RING_THICKNESS_MAX, RING_THICKNESS_MIN, Resolution, SCALE_MAX,
    SCALE_MIN, SequenceConfig, VisibilityFlags, VisualTheme,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequencePatch {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub duration_secs: Option<f64>,
}

impl SequencePatch {
    /// Start value from a raw form field (`"abc"` -> 0).
    pub fn start_input(mut self, raw: &str) -> Self {
        self.start = Some(parse_int_input(raw));
        self
    }

    /// End value from a raw form field (`"abc"` -> 0).
    pub fn end_input(mut self, raw: &str) -> Self {
        self.end = Some(parse_int_input(raw));
        self
    }

    /// Duration from a raw form field (`"abc"` or `"0"` -> 1).
    pub fn duration_input(mut self, raw: &str) -> Self {
        self.duration_secs = Some(parse_duration_input(raw));
        self
    }

    pub fn apply(&self, base: &SequenceConfig) -> SequenceConfig {
        SequenceConfig {
            start: self.start.unwrap_or(base.start),
            end: self.end.unwrap_or(base.end),
            duration_secs: match self.duration_secs {
                Some(d) if d.is_finite() && d > 0.0 => d,
                Some(_) => 1.0,
                None => base.duration_secs,
            },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisualsPatch {
    pub accent_color: Option<Rgba8>,
    pub ring_color: Option<Rgba8>,
    pub font: Option<FontChoice>,
    pub glow: Option<bool>,
    pub sound: Option<bool>,
    pub background_style: Option<BackgroundStyle>,
    pub motivational_text: Option<String>,
    pub start_text: Option<String>,
    pub end_text: Option<String>,
    pub custom_text: Option<String>,
    pub ring_thickness: Option<f64>,
}

impl VisualsPatch {
    /// Ring thickness from a raw slider value; unparseable input keeps the current value.
    pub fn ring_thickness_input(mut self, raw: &str) -> Self {
        self.ring_thickness = parse_float_input(raw);
        self
    }

    pub fn apply(&self, base: &VisualTheme) -> VisualTheme {
        VisualTheme {
            accent_color: self.accent_color.unwrap_or(base.accent_color),
            ring_color: self.ring_color.unwrap_or(base.ring_color),
            font: self.font.unwrap_or(base.font),
            glow: self.glow.unwrap_or(base.glow),
            sound: self.sound.unwrap_or(base.sound),
            background_style: self.background_style.unwrap_or(base.background_style),
            motivational_text: pick_text(&self.motivational_text, &base.motivational_text),
            start_text: pick_text(&self.start_text, &base.start_text),
            end_text: pick_text(&self.end_text, &base.end_text),
            custom_text: pick_text(&self.custom_text, &base.custom_text),
            ring_thickness: clamp_or(
                self.ring_thickness,
                base.ring_thickness,
                RING_THICKNESS_MIN,
                RING_THICKNESS_MAX,
            ),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibilityPatch {
    pub ring: Option<bool>,
    pub countdown: Option<bool>,
    pub status: Option<bool>,
    pub custom: Option<bool>,
    pub percentage: Option<bool>,
    pub is_prime: Option<bool>,
}

impl VisibilityPatch {
    pub fn apply(&self, base: &VisibilityFlags) -> VisibilityFlags {
        VisibilityFlags {
            ring: self.ring.unwrap_or(base.ring),
            countdown: self.countdown.unwrap_or(base.countdown),
            status: self.status.unwrap_or(base.status),
            custom: self.custom.unwrap_or(base.custom),
            percentage: self.percentage.unwrap_or(base.percentage),
            is_prime: self.is_prime.unwrap_or(base.is_prime),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CropPatch {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
    pub opacity: Option<f64>,
    pub crop: Option<CropPatch>,
}

impl TransformPatch {
    /// Position from raw form fields; each unparseable axis resolves to 0.
    pub fn position_input(mut self, x: Option<&str>, y: Option<&str>) -> Self {
        if let Some(x) = x {
            self.x = Some(parse_int_input(x) as f64);
        }
        if let Some(y) = y {
            self.y = Some(parse_int_input(y) as f64);
        }
        self
    }

    /// Scale from a raw slider value; unparseable input keeps the current value.
    pub fn scale_input(mut self, raw: &str) -> Self {
        self.scale = parse_float_input(raw);
        self
    }

    pub fn apply(&self, base: &ElementTransform) -> ElementTransform {
        let crop = match &self.crop {
            Some(c) => Crop {
                top: non_negative_or(c.top, base.crop.top),
                right: non_negative_or(c.right, base.crop.right),
                bottom: non_negative_or(c.bottom, base.crop.bottom),
                left: non_negative_or(c.left, base.crop.left),
            },
            None => base.crop,
        };
        ElementTransform {
            x: finite_or(self.x, base.x),
            y: finite_or(self.y, base.y),
            scale: clamp_or(self.scale, base.scale, SCALE_MIN, SCALE_MAX),
            opacity: clamp_or(self.opacity, base.opacity, 0.0, 1.0),
            crop,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanvasPatch {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub aspect_ratio: Option<AspectRatio>,
}

impl CanvasPatch {
    /// Changing the ratio snaps to its preset size unless the same patch sets explicit dimensions.
    pub fn apply(&self, base: &CanvasGeometry) -> CanvasGeometry {
        let aspect_ratio = self.aspect_ratio.unwrap_or(base.aspect_ratio);
        let (mut width, mut height) = (base.width, base.height);
        if let Some(ratio) = self.aspect_ratio
            && ratio != base.aspect_ratio
        {
            (width, height) = ratio.dimensions();
        }
        if let Some(w) = self.width.filter(|w| *w > 0) {
            width = w;
        }
        if let Some(h) = self.height.filter(|h| *h > 0) {
            height = h;
        }
        CanvasGeometry {
            width,
            height,
            aspect_ratio,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportPatch {
    pub format: Option<ExportFormat>,
    pub resolution: Option<Resolution>,
    pub fps: Option<u32>,
    pub quality: Option<f64>,
}

impl ExportPatch {
    pub fn apply(&self, base: &ExportSettings) -> ExportSettings {
        ExportSettings {
            format: self.format.unwrap_or(base.format),
            resolution: self.resolution.unwrap_or(base.resolution),
            fps: match self.fps {
                Some(60) => 60,
                Some(_) => 30,
                None => base.fps,
            },
            quality: match self.quality {
                Some(q) if q.is_finite() && q > 0.0 => q.min(1.0),
                Some(_) => 1.0,
                None => base.quality,
            },
        }
    }
}

/// Run every group of an externally supplied document through its patch, so the result honors
/// the same ranges as interactive edits.
pub fn sanitize(state: &DurableState) -> DurableState {
    let transform = |t: &ElementTransform| {
        TransformPatch {
            scale: Some(t.scale),
            opacity: Some(t.opacity),
            crop: Some(CropPatch {
                top: Some(t.crop.top),
                right: Some(t.crop.right),
                bottom: Some(t.crop.bottom),
                left: Some(t.crop.left),
            }),
            ..TransformPatch::default()
        }
        .apply(t)
    };
    let mut transforms = state.transforms;
    for id in ElementId::ALL {
        transforms = transforms.with(id, transform(state.transforms.get(id)));
    }

    let (preset_w, preset_h) = state.canvas.aspect_ratio.dimensions();
    let canvas = CanvasGeometry {
        width: if state.canvas.width == 0 { preset_w } else { state.canvas.width },
        height: if state.canvas.height == 0 { preset_h } else { state.canvas.height },
        aspect_ratio: state.canvas.aspect_ratio,
    };

    DurableState {
        sequence: SequencePatch {
            duration_secs: Some(state.sequence.duration_secs),
            ..SequencePatch::default()
        }
        .apply(&state.sequence),
        visuals: VisualsPatch {
            ring_thickness: Some(state.visuals.ring_thickness),
            ..VisualsPatch::default()
        }
        .apply(&state.visuals),
        visibility: state.visibility,
        transforms,
        canvas,
        export: ExportPatch {
            fps: Some(state.export.fps),
            quality: Some(state.export.quality),
            ..ExportPatch::default()
        }
        .apply(&state.export),
    }
}

fn pick_text(patch: &Option<String>, base: &str) -> String {
    patch.clone().unwrap_or_else(|| base.to_string())
}

fn finite_or(v: Option<f64>, base: f64) -> f64 {
    match v {
        Some(v) if v.is_finite() => v,
        _ => base,
    }
}

fn clamp_or(v: Option<f64>, base: f64, min: f64, max: f64) -> f64 {
    finite_or(v, base).clamp(min, max)
}

fn non_negative_or(v: Option<f64>, base: f64) -> f64 {
    finite_or(v, base).max(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/state/patch.rs"]
mod tests;
