use super::*;

#[test]
fn sequence_start_edit_resets_current_count() {
    let mut tree = StateTree::default();
    assert!(tree.update_sequence(&SequencePatch {
        start: Some(25),
        ..Default::default()
    }));
    assert_eq!(tree.durable().sequence.start, 25);
    assert_eq!(tree.run().current_count, 25);
}

#[test]
fn sequence_end_edit_keeps_current_count() {
    let mut tree = StateTree::default();
    tree.update_sequence(&SequencePatch {
        end: Some(3),
        ..Default::default()
    });
    assert_eq!(tree.run().current_count, 10);
}

#[test]
fn start_edit_during_a_run_leaves_the_count_to_the_timeline() {
    let mut tree = StateTree::default();
    let mut run = *tree.run();
    run.is_previewing = true;
    run.current_count = 7;
    tree.set_run(run);
    tree.update_sequence(&SequencePatch {
        start: Some(99),
        ..Default::default()
    });
    assert_eq!(tree.run().current_count, 7);
}

#[test]
fn unchanged_patch_reports_no_change() {
    let mut tree = StateTree::default();
    assert!(!tree.update_visuals(&VisualsPatch::default()));
    assert!(!tree.update_sequence(&SequencePatch {
        start: Some(10),
        ..Default::default()
    }));
}

#[test]
fn transform_edit_leaves_other_groups_untouched() {
    let mut tree = StateTree::default();
    let before = tree.durable().clone();
    tree.update_transform(
        ElementId::Custom,
        &TransformPatch {
            opacity: Some(0.9),
            ..Default::default()
        },
    );
    let after = tree.durable();
    assert_eq!(after.transforms.custom.opacity, 0.9);
    assert_eq!(after.transforms.ring, before.transforms.ring);
    assert_eq!(after.visuals, before.visuals);
    assert_eq!(after.sequence, before.sequence);
}

#[test]
fn accent_swatch_sets_ring_color_too() {
    let mut tree = StateTree::default();
    let red = Rgba8::opaque(0xFF, 0x3B, 0x30);
    assert!(tree.set_accent(red));
    assert_eq!(tree.durable().visuals.accent_color, red);
    assert_eq!(tree.durable().visuals.ring_color, red);
}

#[test]
fn toggle_visibility_flips_one_flag() {
    let mut tree = StateTree::default();
    assert!(tree.toggle_visibility(ElementId::Percentage));
    assert!(!tree.durable().visibility.percentage);
    assert!(tree.durable().visibility.ring);
    tree.toggle_visibility(ElementId::Percentage);
    assert!(tree.durable().visibility.percentage);
}

#[test]
fn align_uses_size_estimates_and_margin() {
    let mut tree = StateTree::default();
    // Countdown: 200 wide at scale 1 on a 360 wide canvas -> 180 - 100 - 20 = 60.
    tree.align_element(ElementId::Countdown, Axis::Horizontal, Alignment::Start);
    assert_eq!(tree.durable().transforms.countdown.x, -60.0);
    tree.align_element(ElementId::Countdown, Axis::Horizontal, Alignment::End);
    assert_eq!(tree.durable().transforms.countdown.x, 60.0);

    // Custom: 80 tall at scale 0.5 on a 640 tall canvas -> 320 - 20 - 20 = 280.
    tree.align_element(ElementId::Custom, Axis::Vertical, Alignment::End);
    assert_eq!(tree.durable().transforms.custom.y, 280.0);
    tree.align_element(ElementId::Custom, Axis::Vertical, Alignment::Center);
    assert_eq!(tree.durable().transforms.custom.y, 0.0);
}

#[test]
fn selection_is_transient() {
    let mut tree = StateTree::default();
    let before = tree.durable().clone();
    tree.select_element(Some(ElementId::Ring));
    assert_eq!(tree.run().selected_element, Some(ElementId::Ring));
    assert_eq!(tree.durable(), &before);
}
