use super::*;

#[test]
fn defaults_match_the_stock_overlay() {
    let s = AppState::default();
    assert_eq!(s.durable.sequence.start, 10);
    assert_eq!(s.durable.sequence.end, 0);
    assert_eq!(s.durable.sequence.duration_secs, 5.0);
    assert_eq!(s.durable.visuals.accent_color.to_hex(), "#007AFF");
    assert_eq!(s.durable.canvas.width, 360);
    assert_eq!(s.durable.canvas.height, 640);
    assert_eq!(s.durable.transforms.custom.scale, 0.5);
    assert_eq!(s.durable.transforms.percentage.y, -90.0);
    assert_eq!(s.run.current_count, 10);
    assert_eq!(s.run.selected_element, Some(ElementId::Countdown));
    assert!(!s.run.is_busy());
}

#[test]
fn sequence_direction_and_steps() {
    let down = SequenceConfig::default();
    assert!(down.counts_down());
    assert_eq!(down.total_steps(), 10);

    let up = SequenceConfig {
        start: -3,
        end: 4,
        duration_secs: 1.0,
    };
    assert!(!up.counts_down());
    assert_eq!(up.total_steps(), 7);
}

#[test]
fn visibility_and_transforms_are_addressable_by_id() {
    let v = VisibilityFlags::default().with(ElementId::Status, false);
    assert!(!v.is_visible(ElementId::Status));
    assert!(v.is_visible(ElementId::Ring));

    let t = ElementTransforms::default().with(
        ElementId::Ring,
        ElementTransform::at(5.0, 6.0, 2.0, 0.5),
    );
    assert_eq!(t.get(ElementId::Ring).x, 5.0);
    assert_eq!(t.get(ElementId::Status).y, 100.0);
}

#[test]
fn presets_deserialize_with_partial_fields() {
    let json = r##"{
        "sequence": { "start": 3 },
        "visuals": { "font": "'Bebas Neue', sans-serif", "accent_color": "#FF3B30" },
        "canvas": { "aspect_ratio": "16:9", "width": 640, "height": 360 },
        "export": { "format": "mp4", "resolution": "4k", "fps": 60 }
    }"##;
    let d: DurableState = serde_json::from_str(json).unwrap();
    assert_eq!(d.sequence.start, 3);
    assert_eq!(d.sequence.end, 0);
    assert_eq!(d.visuals.font, FontChoice::BebasNeue);
    assert_eq!(d.visuals.accent_color.to_hex(), "#FF3B30");
    assert_eq!(d.canvas.aspect_ratio, AspectRatio::Landscape);
    assert_eq!(d.export.resolution, Resolution::Uhd4k);
    assert_eq!(d.export.fps, 60);
}

#[test]
fn resolution_scale_and_bitrate() {
    assert_eq!(Resolution::Hd720.scale(), 2);
    assert_eq!(Resolution::Hd1080.scale(), 3);
    assert_eq!(Resolution::Uhd4k.scale(), 4);
    assert_eq!(Resolution::Uhd4k.bitrate_bps(), 20_000_000);
    assert_eq!(Resolution::Hd720.bitrate_bps(), 10_000_000);
}

#[test]
fn aspect_presets() {
    assert_eq!(AspectRatio::Portrait.dimensions(), (360, 640));
    assert_eq!(AspectRatio::Square.dimensions(), (480, 480));
    assert_eq!(AspectRatio::Landscape.dimensions(), (640, 360));
}
