use super::*;
use crate::foundation::clock::ManualClock;
use crate::foundation::error::TickdownError;
use crate::projection::view::ElementContent;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Default)]
struct SharedTicks(Rc<Cell<u32>>);

impl TickSink for SharedTicks {
    fn tick(&mut self) -> TickdownResult<()> {
        self.0.set(self.0.get() + 1);
        Ok(())
    }
}

struct FailingTicks;

impl TickSink for FailingTicks {
    fn tick(&mut self) -> TickdownResult<()> {
        Err(TickdownError::capture_unavailable("no audio device"))
    }
}

fn studio() -> (Studio<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let s = Studio::new(Preset::default(), clock.clone()).unwrap();
    (s, clock)
}

fn studio_with_ticks() -> (Studio<ManualClock>, ManualClock, Rc<Cell<u32>>) {
    let (s, clock) = studio();
    let ticks = SharedTicks::default();
    let count = ticks.0.clone();
    (s.with_ticks(ticks), clock, count)
}

fn custom_text(text: &str) -> VisualsPatch {
    VisualsPatch {
        custom_text: Some(text.to_string()),
        ..Default::default()
    }
}

#[test]
fn undo_then_redo_restores_the_edited_state() {
    let (mut s, _) = studio();
    let before = s.durable().clone();
    assert!(s.update_visuals(&custom_text("LAUNCH")));
    let after = s.durable().clone();

    assert!(s.undo());
    assert_eq!(s.durable(), &before);
    assert!(s.redo());
    assert_eq!(s.durable(), &after);
    assert!(!s.redo());
}

#[test]
fn unchanged_edits_are_not_recorded() {
    let (mut s, _) = studio();
    assert!(!s.update_visuals(&custom_text("2026")));
    assert!(!s.history().can_undo());
}

#[test]
fn history_is_bounded_and_evicts_oldest() {
    let clock = ManualClock::new();
    let preset = Preset {
        config: StudioConfig {
            history_capacity: 3,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut s = Studio::new(preset, clock).unwrap();
    for i in 0..5 {
        s.update_visuals(&custom_text(&format!("T{i}")));
    }
    assert_eq!(s.history().len_past(), 3);
    while s.undo() {}
    assert_eq!(s.durable().visuals.custom_text, "T1");
}

#[test]
fn new_edit_after_undo_drops_redo() {
    let (mut s, _) = studio();
    s.update_visuals(&custom_text("A"));
    s.update_visuals(&custom_text("B"));
    s.undo();
    assert!(s.history().can_redo());
    s.update_visuals(&custom_text("C"));
    assert!(!s.redo());
    assert_eq!(s.durable().visuals.custom_text, "C");
}

#[test]
fn undo_leaves_run_state_alone() {
    let (mut s, clock) = studio();
    s.update_visuals(&custom_text("A"));
    s.start_preview();
    clock.advance_secs(1.0);
    s.on_frame();
    let run = *s.run();
    s.undo();
    assert_eq!(*s.run(), run);
}

#[test]
fn keyboard_chords_drive_history() {
    let (mut s, _) = studio();
    s.toggle_visibility(ElementId::Ring);
    let undo = KeyInput {
        key: 'z',
        ctrl: true,
        ..Default::default()
    };
    assert!(s.handle_key(undo));
    assert!(s.durable().visibility.ring);
    let focused = KeyInput {
        key: 'y',
        meta: true,
        text_input_focused: true,
        ..Default::default()
    };
    assert!(!s.handle_key(focused));
    assert!(s.handle_key(KeyInput {
        key: 'y',
        meta: true,
        ..Default::default()
    }));
    assert!(!s.durable().visibility.ring);
}

#[test]
fn preview_runs_to_completion_then_holds() {
    let (mut s, clock, ticks) = studio_with_ticks();
    assert_eq!(s.start_preview(), RunStart::Started);
    assert!(s.run().is_previewing);

    clock.advance_secs(2.5);
    let mid = s.on_frame().unwrap();
    assert_eq!(mid.progress, 0.5);
    assert_eq!(s.run().current_count, 5);
    assert_eq!(ticks.get(), 1);

    clock.advance_secs(2.5);
    let last = s.on_frame().unwrap();
    assert!(last.completed);
    assert_eq!(s.run().progress, 1.0);
    assert_eq!(s.run().current_count, 0);
    assert!(s.run().is_previewing);

    clock.advance_secs(0.5);
    assert_eq!(s.on_frame(), None);
    assert!(s.run().is_previewing);
    clock.advance_secs(0.5);
    assert_eq!(s.on_frame(), None);
    assert!(!s.run().is_previewing);
    assert_eq!(s.run().current_count, 0);
}

#[test]
fn preview_cannot_restart_while_active_or_holding() {
    let (mut s, clock) = studio();
    s.start_preview();
    assert_eq!(
        s.start_preview(),
        RunStart::Rejected {
            active: RunMode::Preview
        }
    );
    clock.advance_secs(5.0);
    s.on_frame();
    assert!(matches!(s.start_preview(), RunStart::Rejected { .. }));
}

#[test]
fn stop_mid_run_resets_and_silences() {
    let (mut s, clock, ticks) = studio_with_ticks();
    s.start_preview();
    clock.advance_secs(2.0);
    s.on_frame();
    let heard = ticks.get();
    assert!(s.stop());
    assert!(!s.run().is_previewing);
    assert_eq!(s.run().progress, 0.0);
    assert_eq!(s.run().current_count, 10);

    clock.advance_secs(2.0);
    assert_eq!(s.on_frame(), None);
    assert_eq!(ticks.get(), heard);
    assert!(!s.stop());
}

#[test]
fn stop_during_hold_keeps_terminal_frame() {
    let (mut s, clock) = studio();
    s.start_preview();
    clock.advance_secs(6.0);
    s.on_frame();
    assert!(s.stop());
    assert!(!s.run().is_previewing);
    assert_eq!(s.run().progress, 1.0);
    assert_eq!(s.run().current_count, 0);
}

#[test]
fn muted_sound_skips_ticks() {
    let (mut s, clock, ticks) = studio_with_ticks();
    s.update_visuals(&VisualsPatch {
        sound: Some(false),
        ..Default::default()
    });
    s.start_preview();
    clock.advance_secs(2.5);
    s.on_frame();
    assert_eq!(ticks.get(), 0);
}

#[test]
fn tick_failures_do_not_stop_the_run() {
    let (s, clock) = studio();
    let mut s = s.with_ticks(FailingTicks);
    s.start_preview();
    clock.advance_secs(2.5);
    assert!(s.on_frame().is_some());
    clock.advance_secs(2.5);
    assert!(s.on_frame().unwrap().completed);
}

#[test]
fn export_and_preview_exclude_each_other() {
    let (mut s, _) = studio();
    assert_eq!(s.claim_export(), RunStart::Started);
    let before = *s.run();
    assert_eq!(
        s.start_preview(),
        RunStart::Rejected {
            active: RunMode::Export
        }
    );
    assert_eq!(*s.run(), before);
    s.release_export();

    s.start_preview();
    assert!(matches!(s.claim_export(), RunStart::Rejected { .. }));
    assert!(!(s.run().is_previewing && s.run().is_exporting));
}

#[test]
fn changed_digits_stay_highlighted_briefly() {
    let (mut s, clock) = studio();
    s.start_preview();
    clock.advance_secs(0.6);
    s.on_frame();
    let highlighted = |s: &Studio<ManualClock>| match &s.view().element(ElementId::Countdown).unwrap().content {
        ElementContent::Digits { highlighted, .. } => highlighted.clone(),
        other => panic!("unexpected content {other:?}"),
    };
    assert_eq!(highlighted(&s).len(), 1);
    clock.advance(Duration::from_millis(350));
    assert!(highlighted(&s).is_empty());
}

#[test]
fn theme_is_one_undo_step() {
    let (mut s, _) = studio();
    let before = s.durable().visuals.clone();
    let transport = |_: &str| -> TickdownResult<String> {
        Ok(r##"{"accentColor":"#ff0000","font":"oswald","backgroundStyle":"gradient","motivationalText":"HOLD"}"##.to_string())
    };
    let applied = s.suggest_theme(&transport, "tense").unwrap();
    assert_eq!(s.durable().visuals.ring_color, applied.accent_color);
    assert_eq!(s.durable().visuals.motivational_text, "HOLD");
    assert_eq!(s.history().len_past(), 1);
    s.undo();
    assert_eq!(s.durable().visuals, before);
}

#[test]
fn failed_theme_leaves_state_untouched() {
    let (mut s, _) = studio();
    let before = s.durable().clone();
    let broken = |_: &str| -> TickdownResult<String> { Ok("{\"accentColor\":\"#fff\"}".to_string()) };
    assert!(matches!(
        s.suggest_theme(&broken, "x"),
        Err(TickdownError::Service(_))
    ));
    assert_eq!(s.durable(), &before);
    assert!(!s.history().can_undo());
}

#[test]
fn editing_start_while_idle_moves_the_count() {
    let (mut s, _) = studio();
    s.update_sequence(&SequencePatch::default().start_input("42"));
    assert_eq!(s.run().current_count, 42);
    assert_eq!(s.view().current_count, 42);
}

#[test]
fn undo_of_start_edit_moves_idle_count() {
    let (mut s, _) = studio();
    s.update_sequence(&SequencePatch::default().start_input("42"));
    assert!(s.undo());
    assert_eq!(s.durable().sequence.start, 10);
    assert_eq!(s.run().current_count, 10);
    assert_eq!(s.run().progress, 0.0);
    assert!(s.redo());
    assert_eq!(s.run().current_count, 42);
    assert_eq!(s.view().current_count, 42);
}

#[test]
fn undo_of_start_edit_mid_run_keeps_the_count() {
    let (mut s, clock) = studio();
    s.start_preview();
    clock.advance_secs(2.5);
    s.on_frame();
    s.update_sequence(&SequencePatch::default().start_input("42"));
    let run = *s.run();
    assert!(s.undo());
    assert_eq!(*s.run(), run);
}

#[test]
fn presets_are_sanitized_on_load() {
    let mut preset = Preset::default();
    preset.state.export.fps = 24;
    let s = Studio::new(preset, ManualClock::new()).unwrap();
    assert_eq!(s.durable().export.fps, 30);
}
