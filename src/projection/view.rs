use std::collections::BTreeSet;

use crate::foundation::core::{ElementId, Rgba8};
use crate::projection::digits::digits;
use crate::projection::style::{ElementStyle, element_style, ring_dash_offset};
use crate::projection::text::{STATUS_EYEBROW, display_message, progress_label};
use crate::state::model::{
    BackgroundStyle, CanvasGeometry, DurableState, FontChoice, RunState,
};
use crate::timeline::sampling::{RoundingPolicy, count_at};

/// Ring track color is the ring color mixed this far toward black.
const TRACK_DARKEN: f64 = 0.85;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementContent {
    Ring {
        progress: f64,
        dash_offset: f64,
        thickness: f64,
        color: Rgba8,
        track_color: Rgba8,
        glow: bool,
    },
    Digits {
        digits: Vec<char>,
        highlighted: BTreeSet<usize>,
        color: Rgba8,
        highlight_color: Rgba8,
    },
    Status {
        eyebrow: String,
        message: String,
        color: Rgba8,
    },
    Text {
        text: String,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ElementView {
    pub id: ElementId,
    pub visible: bool,
    pub style: ElementStyle,
    pub content: ElementContent,
}

/// Everything a render surface needs for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameView {
    pub canvas: CanvasGeometry,
    pub background: BackgroundStyle,
    pub accent: Rgba8,
    pub font: FontChoice,
    pub progress: f64,
    pub current_count: i64,
    /// Paint order, back to front.
    pub elements: Vec<ElementView>,
}

impl FrameView {
    pub fn element(&self, id: ElementId) -> Option<&ElementView> {
        self.elements.iter().find(|e| e.id == id)
    }
}

/// Project the live state into a frame.
pub fn project(durable: &DurableState, run: &RunState, highlighted: &BTreeSet<usize>) -> FrameView {
    project_at(
        durable,
        run.progress,
        run.current_count,
        run.selected_element,
        highlighted,
    )
}

/// Project an arbitrary progress value, deriving the count the way a run would.
pub fn scrub(durable: &DurableState, progress: f64, rounding: RoundingPolicy) -> FrameView {
    let seq = &durable.sequence;
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let count = count_at(seq.start, seq.end, progress, rounding);
    project_at(durable, progress, count, None, &BTreeSet::new())
}

fn project_at(
    durable: &DurableState,
    progress: f64,
    current_count: i64,
    selected: Option<ElementId>,
    highlighted: &BTreeSet<usize>,
) -> FrameView {
    let visuals = &durable.visuals;
    let elements = ElementId::ALL
        .iter()
        .map(|&id| {
            let content = match id {
                ElementId::Ring => ElementContent::Ring {
                    progress,
                    dash_offset: ring_dash_offset(progress),
                    thickness: visuals.ring_thickness,
                    color: visuals.ring_color,
                    track_color: visuals.ring_color.mix(Rgba8::BLACK, TRACK_DARKEN),
                    glow: visuals.glow,
                },
                ElementId::Countdown => ElementContent::Digits {
                    digits: digits(current_count),
                    highlighted: highlighted.clone(),
                    color: Rgba8::WHITE,
                    highlight_color: visuals.accent_color,
                },
                ElementId::Status => ElementContent::Status {
                    eyebrow: STATUS_EYEBROW.to_string(),
                    message: display_message(progress, visuals).to_string(),
                    color: visuals.accent_color,
                },
                ElementId::Custom => ElementContent::Text {
                    text: visuals.custom_text.clone(),
                },
                ElementId::Percentage => ElementContent::Text {
                    text: progress_label(progress, &durable.sequence),
                },
            };
            ElementView {
                id,
                visible: durable.visibility.is_visible(id),
                style: element_style(
                    id,
                    durable.transforms.get(id),
                    &durable.canvas,
                    selected == Some(id),
                ),
                content,
            }
        })
        .collect();

    FrameView {
        canvas: durable.canvas,
        background: visuals.background_style,
        accent: visuals.accent_color,
        font: visuals.font,
        progress,
        current_count,
        elements,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/projection/view.rs"]
mod tests;
