use super::*;

#[test]
fn projection_includes_every_element_in_paint_order() {
    let d = DurableState::default();
    let v = scrub(&d, 0.0, RoundingPolicy::Directional);
    let ids: Vec<ElementId> = v.elements.iter().map(|e| e.id).collect();
    assert_eq!(ids, ElementId::ALL.to_vec());
}

#[test]
fn scrub_matches_run_boundaries() {
    let d = DurableState::default();
    let start = scrub(&d, 0.0, RoundingPolicy::Directional);
    assert_eq!(start.current_count, 10);
    let end = scrub(&d, 1.0, RoundingPolicy::Directional);
    assert_eq!(end.current_count, 0);

    let Some(ElementView {
        content: ElementContent::Status { message, .. },
        ..
    }) = end.element(ElementId::Status)
    else {
        panic!("status element missing");
    };
    assert_eq!(message, "FINISHED");
}

#[test]
fn hidden_elements_are_still_projected() {
    let mut d = DurableState::default();
    d.visibility.custom = false;
    let v = scrub(&d, 0.5, RoundingPolicy::Nearest);
    let custom = v.element(ElementId::Custom).unwrap();
    assert!(!custom.visible);
    assert_eq!(
        custom.content,
        ElementContent::Text {
            text: "2026".to_string()
        }
    );
}

#[test]
fn live_projection_carries_selection_and_highlight() {
    let d = DurableState::default();
    let mut run = RunState::idle(12);
    run.selected_element = Some(ElementId::Ring);
    run.progress = 0.25;
    let hl: BTreeSet<usize> = [1].into_iter().collect();
    let v = project(&d, &run, &hl);

    assert!(v.element(ElementId::Ring).unwrap().style.outlined);
    assert!(!v.element(ElementId::Countdown).unwrap().style.outlined);
    match &v.element(ElementId::Countdown).unwrap().content {
        ElementContent::Digits {
            digits,
            highlighted,
            ..
        } => {
            assert_eq!(digits, &vec!['1', '2']);
            assert_eq!(highlighted, &hl);
        }
        other => panic!("unexpected content {other:?}"),
    }
    match &v.element(ElementId::Percentage).unwrap().content {
        ElementContent::Text { text } => assert!(text.ends_with("25.0%")),
        other => panic!("unexpected content {other:?}"),
    }
}

#[test]
fn ring_track_is_darkened_ring_color() {
    let d = DurableState::default();
    let v = scrub(&d, 0.5, RoundingPolicy::Directional);
    match &v.element(ElementId::Ring).unwrap().content {
        ElementContent::Ring {
            color, track_color, ..
        } => {
            assert_eq!(*track_color, color.mix(Rgba8::BLACK, 0.85));
        }
        other => panic!("unexpected content {other:?}"),
    }
}

#[test]
fn frame_view_serializes_to_json() {
    let v = scrub(&DurableState::default(), 0.3, RoundingPolicy::Directional);
    let json = serde_json::to_value(&v).unwrap();
    assert_eq!(json["elements"][0]["content"]["kind"], "ring");
    assert_eq!(json["elements"][0]["id"], "ring");
}
