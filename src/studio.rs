//! The editor controller.
//!
//! A [`Studio`] is the single writer of the [`AppState`]: user edits, undo/redo and timeline
//! frames all go through it, one call at a time. Durable edits that change something are
//! snapshotted into history; run-state writes never are.

use std::time::Instant;

use crate::audio::tick::{NullTicks, TickSink};
use crate::config::{Preset, StudioConfig};
use crate::foundation::clock::{Clock, SystemClock};
use crate::foundation::core::{ElementId, Rgba8};
use crate::foundation::error::TickdownResult;
use crate::history::keys::{HistoryAction, KeyInput};
use crate::history::manager::History;
use crate::projection::digits::DigitHighlighter;
use crate::projection::view::{FrameView, project, scrub};
use crate::state::model::{AppState, DurableState, RunState};
use crate::state::patch::{
    CanvasPatch, ExportPatch, SequencePatch, TransformPatch, VisibilityPatch, VisualsPatch,
    sanitize,
};
use crate::state::tree::{Alignment, Axis, StateTree};
use crate::theme::{ThemeSuggester, ThemeSuggestion};
use crate::timeline::engine::{FrameUpdate, RunMode, RunPlan, RunStart, TimelineEngine};

pub struct Studio<C: Clock = SystemClock> {
    config: StudioConfig,
    clock: C,
    tree: StateTree,
    history: History<DurableState>,
    timeline: TimelineEngine,
    highlighter: DigitHighlighter,
    ticks: Box<dyn TickSink>,
    /// A finished preview keeps reporting `is_previewing` until this instant.
    hold_until: Option<Instant>,
}

impl Studio<SystemClock> {
    /// Default document on the wall clock.
    pub fn with_defaults() -> TickdownResult<Self> {
        Self::new(Preset::default(), SystemClock)
    }
}

impl<C: Clock> Studio<C> {
    pub fn new(preset: Preset, clock: C) -> TickdownResult<Self> {
        preset.config.validate()?;
        let durable = sanitize(&preset.state);
        let tree = StateTree::new(durable.clone());
        Ok(Self {
            history: History::new(durable, preset.config.history_capacity),
            highlighter: DigitHighlighter::new(preset.config.highlight()),
            config: preset.config,
            clock,
            tree,
            timeline: TimelineEngine::new(),
            ticks: Box::new(NullTicks),
            hold_until: None,
        })
    }

    /// Route tick triggers to `ticks` instead of discarding them.
    pub fn with_ticks(mut self, ticks: impl TickSink + 'static) -> Self {
        self.ticks = Box::new(ticks);
        self
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn state(&self) -> &AppState {
        self.tree.state()
    }

    pub fn durable(&self) -> &DurableState {
        self.tree.durable()
    }

    pub fn run(&self) -> &RunState {
        self.tree.run()
    }

    pub fn history(&self) -> &History<DurableState> {
        &self.history
    }

    fn commit(&mut self, changed: bool) -> bool {
        if changed {
            self.history.record(self.tree.durable().clone());
        }
        changed
    }

    pub fn update_sequence(&mut self, patch: &SequencePatch) -> bool {
        let changed = self.tree.update_sequence(patch);
        self.commit(changed)
    }

    pub fn update_visuals(&mut self, patch: &VisualsPatch) -> bool {
        let changed = self.tree.update_visuals(patch);
        self.commit(changed)
    }

    pub fn set_accent(&mut self, color: Rgba8) -> bool {
        let changed = self.tree.set_accent(color);
        self.commit(changed)
    }

    pub fn update_visibility(&mut self, patch: &VisibilityPatch) -> bool {
        let changed = self.tree.update_visibility(patch);
        self.commit(changed)
    }

    pub fn toggle_visibility(&mut self, id: ElementId) -> bool {
        let changed = self.tree.toggle_visibility(id);
        self.commit(changed)
    }

    pub fn update_canvas(&mut self, patch: &CanvasPatch) -> bool {
        let changed = self.tree.update_canvas(patch);
        self.commit(changed)
    }

    pub fn update_export(&mut self, patch: &ExportPatch) -> bool {
        let changed = self.tree.update_export(patch);
        self.commit(changed)
    }

    pub fn update_transform(&mut self, id: ElementId, patch: &TransformPatch) -> bool {
        let changed = self.tree.update_transform(id, patch);
        self.commit(changed)
    }

    pub fn align_element(&mut self, id: ElementId, axis: Axis, alignment: Alignment) -> bool {
        let changed = self.tree.align_element(id, axis, alignment);
        self.commit(changed)
    }

    /// Selection is transient and never recorded.
    pub fn select_element(&mut self, id: Option<ElementId>) {
        self.tree.select_element(id);
    }

    /// Apply a suggested theme as a single undoable edit.
    pub fn apply_theme(&mut self, suggestion: &ThemeSuggestion) -> bool {
        self.update_visuals(&suggestion.to_patch())
    }

    /// Ask `suggester` for a theme and apply it. On failure nothing changes.
    pub fn suggest_theme(
        &mut self,
        suggester: &dyn ThemeSuggester,
        vibe: &str,
    ) -> TickdownResult<ThemeSuggestion> {
        let suggestion = suggester.suggest(vibe).inspect_err(|e| {
            tracing::warn!(error = %e, "theme suggestion failed");
        })?;
        self.apply_theme(&suggestion);
        Ok(suggestion)
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.tree.restore(snapshot.clone());
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.tree.restore(snapshot.clone());
                true
            }
            None => false,
        }
    }

    /// Dispatch an undo/redo chord. Returns `true` when history moved.
    pub fn handle_key(&mut self, input: KeyInput) -> bool {
        match HistoryAction::from_key(input) {
            Some(HistoryAction::Undo) => self.undo(),
            Some(HistoryAction::Redo) => self.redo(),
            None => false,
        }
    }

    fn active_mode(&self) -> Option<RunMode> {
        let run = self.tree.run();
        if run.is_exporting {
            Some(RunMode::Export)
        } else if run.is_previewing {
            Some(RunMode::Preview)
        } else {
            None
        }
    }

    /// Begin a real-time preview. Ignored while a preview (including its hold) or an export is
    /// active.
    pub fn start_preview(&mut self) -> RunStart {
        if let Some(active) = self.active_mode() {
            tracing::debug!(active = ?active, "preview rejected");
            return RunStart::Rejected { active };
        }
        let now = self.clock.now();
        let sequence = self.tree.durable().sequence;
        let plan = RunPlan::new(RunMode::Preview, &sequence, self.config.preview_rounding);
        let started = self.timeline.start(plan, now);
        if started != RunStart::Started {
            return started;
        }
        self.hold_until = None;
        self.highlighter.reset();
        self.highlighter.observe(sequence.start, now);
        let mut run = *self.tree.run();
        run.is_previewing = true;
        run.progress = 0.0;
        run.current_count = sequence.start;
        self.tree.set_run(run);
        RunStart::Started
    }

    /// Advance the preview to the clock's current instant.
    ///
    /// Performs one read-modify-write of the run state. Returns the frame produced, if a run was
    /// active.
    pub fn on_frame(&mut self) -> Option<FrameUpdate> {
        let now = self.clock.now();
        if let Some(until) = self.hold_until {
            if now >= until {
                self.hold_until = None;
                let mut run = *self.tree.run();
                run.is_previewing = false;
                self.tree.set_run(run);
            }
            return None;
        }

        let update = self.timeline.step(now)?;
        if update.ticked
            && self.tree.durable().visuals.sound
            && let Err(e) = self.ticks.tick()
        {
            tracing::warn!(error = %e, "tick failed");
        }
        self.highlighter.observe(update.current_count, now);

        let mut run = *self.tree.run();
        run.progress = update.progress;
        run.current_count = update.current_count;
        if update.completed {
            if self.config.preview_hold_ms > 0 {
                self.hold_until = Some(now + self.config.preview_hold());
            } else {
                run.is_previewing = false;
            }
        }
        self.tree.set_run(run);
        Some(update)
    }

    /// Cancel the preview.
    ///
    /// Mid-run this resets progress to 0 and the count to `sequence.start`; during the post-run
    /// hold it only clears the flag. Returns `false` when nothing was running.
    pub fn stop(&mut self) -> bool {
        let mut run = *self.tree.run();
        if self.timeline.stop().is_some() {
            run.is_previewing = false;
            run.progress = 0.0;
            run.current_count = self.tree.durable().sequence.start;
            self.highlighter.reset();
            self.tree.set_run(run);
            return true;
        }
        if self.hold_until.take().is_some() {
            run.is_previewing = false;
            self.tree.set_run(run);
            return true;
        }
        false
    }

    /// Render projection of the live state.
    pub fn view(&self) -> FrameView {
        let highlighted = self.highlighter.active(self.clock.now());
        project(self.tree.durable(), self.tree.run(), &highlighted)
    }

    /// Projection at an arbitrary progress, without touching the run state.
    pub fn scrub(&self, progress: f64) -> FrameView {
        scrub(self.tree.durable(), progress, self.config.preview_rounding)
    }

    /// Mark an export as active. Rejected while any run is active.
    pub(crate) fn claim_export(&mut self) -> RunStart {
        if let Some(active) = self.active_mode() {
            tracing::debug!(active = ?active, "export rejected");
            return RunStart::Rejected { active };
        }
        let mut run = *self.tree.run();
        run.is_exporting = true;
        run.progress = 0.0;
        run.current_count = self.tree.durable().sequence.start;
        self.tree.set_run(run);
        RunStart::Started
    }

    pub(crate) fn export_frame(&mut self, update: &FrameUpdate) {
        let mut run = *self.tree.run();
        run.progress = update.progress;
        run.current_count = update.current_count;
        self.tree.set_run(run);
    }

    pub(crate) fn release_export(&mut self) {
        let mut run = *self.tree.run();
        run.is_exporting = false;
        self.tree.set_run(run);
    }
}

#[cfg(test)]
#[path = "../tests/unit/studio.rs"]
mod tests;
