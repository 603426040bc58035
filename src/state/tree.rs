use crate::foundation::core::{ElementId, Rgba8};
use crate::state::model::{AppState, DurableState, RunState};
use crate::state::patch::{
    CanvasPatch, ExportPatch, SequencePatch, TransformPatch, VisibilityPatch, VisualsPatch,
};

/// Layout axis for [`StateTree::align_element`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Start,
    Center,
    End,
}

const ALIGN_MARGIN_PX: f64 = 20.0;

/// Owner of the single live [`AppState`].
///
/// Every durable group is replaced wholesale by its mutation entry point. Each entry point returns
/// `true` when the durable state actually changed, which is the caller's cue to record a history
/// snapshot.
#[derive(Clone, Debug, Default)]
pub struct StateTree {
    state: AppState,
}

impl StateTree {
    pub fn new(durable: DurableState) -> Self {
        Self {
            state: AppState::new(durable),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn durable(&self) -> &DurableState {
        &self.state.durable
    }

    pub fn run(&self) -> &RunState {
        &self.state.run
    }

    /// Editing `start` while idle also moves the displayed count to the new origin.
    pub fn update_sequence(&mut self, patch: &SequencePatch) -> bool {
        let next = patch.apply(&self.state.durable.sequence);
        if next == self.state.durable.sequence {
            return false;
        }
        self.state.durable.sequence = next;
        if patch.start.is_some() && !self.state.run.is_busy() {
            self.state.run.current_count = next.start;
            self.state.run.progress = 0.0;
        }
        true
    }

    pub fn update_visuals(&mut self, patch: &VisualsPatch) -> bool {
        let next = patch.apply(&self.state.durable.visuals);
        replace_if_changed(&mut self.state.durable.visuals, next)
    }

    /// Accent swatches recolor the ring too.
    pub fn set_accent(&mut self, color: Rgba8) -> bool {
        self.update_visuals(&VisualsPatch {
            accent_color: Some(color),
            ring_color: Some(color),
            ..Default::default()
        })
    }

    pub fn update_visibility(&mut self, patch: &VisibilityPatch) -> bool {
        let next = patch.apply(&self.state.durable.visibility);
        replace_if_changed(&mut self.state.durable.visibility, next)
    }

    pub fn toggle_visibility(&mut self, id: ElementId) -> bool {
        let flags = self.state.durable.visibility;
        let next = flags.with(id, !flags.is_visible(id));
        replace_if_changed(&mut self.state.durable.visibility, next)
    }

    pub fn update_canvas(&mut self, patch: &CanvasPatch) -> bool {
        let next = patch.apply(&self.state.durable.canvas);
        replace_if_changed(&mut self.state.durable.canvas, next)
    }

    pub fn update_export(&mut self, patch: &ExportPatch) -> bool {
        let next = patch.apply(&self.state.durable.export);
        replace_if_changed(&mut self.state.durable.export, next)
    }

    pub fn update_transform(&mut self, id: ElementId, patch: &TransformPatch) -> bool {
        let transforms = self.state.durable.transforms;
        let next = transforms.with(id, patch.apply(transforms.get(id)));
        replace_if_changed(&mut self.state.durable.transforms, next)
    }

    /// Snap an element to the start, center or end of the canvas along one axis.
    ///
    /// Works from [`ElementId::size_estimate`] times the element's scale, keeping a fixed margin
    /// from the canvas edge.
    pub fn align_element(&mut self, id: ElementId, axis: Axis, alignment: Alignment) -> bool {
        let canvas = self.state.durable.canvas;
        let t = self.state.durable.transforms.get(id);
        let size = id.size_estimate() * t.scale;
        let (canvas_extent, element_extent) = match axis {
            Axis::Horizontal => (f64::from(canvas.width), size.x),
            Axis::Vertical => (f64::from(canvas.height), size.y),
        };
        let edge = canvas_extent / 2.0 - element_extent / 2.0 - ALIGN_MARGIN_PX;
        let offset = match alignment {
            Alignment::Start => -edge,
            Alignment::Center => 0.0,
            Alignment::End => edge,
        }
        .round();
        let patch = match axis {
            Axis::Horizontal => TransformPatch {
                x: Some(offset),
                ..Default::default()
            },
            Axis::Vertical => TransformPatch {
                y: Some(offset),
                ..Default::default()
            },
        };
        self.update_transform(id, &patch)
    }

    pub fn select_element(&mut self, id: Option<ElementId>) {
        self.state.run.selected_element = id;
    }

    /// Swap in a durable snapshot (undo/redo). An idle run follows a restored start value.
    pub fn restore(&mut self, durable: DurableState) {
        let start_changed = durable.sequence.start != self.state.durable.sequence.start;
        self.state.durable = durable;
        if start_changed && !self.state.run.is_busy() {
            self.state.run.current_count = self.state.durable.sequence.start;
            self.state.run.progress = 0.0;
        }
    }

    /// Overwrite the run state. Only the studio controller calls this, once per frame.
    pub fn set_run(&mut self, run: RunState) {
        self.state.run = run;
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, next: T) -> bool {
    if *slot == next {
        return false;
    }
    *slot = next;
    true
}

#[cfg(test)]
#[path = "../../tests/unit/state/tree.rs"]
mod tests;
