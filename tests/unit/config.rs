use super::*;
use crate::state::model::{ExportFormat, Resolution};

#[test]
fn defaults_match_documented_values() {
    let c = StudioConfig::default();
    assert_eq!(c.history_capacity, 50);
    assert_eq!(c.preview_hold(), Duration::from_secs(1));
    assert_eq!(c.highlight(), Duration::from_millis(350));
    assert_eq!(c.trailing_capture(), Duration::from_millis(500));
    assert_eq!(c.still_scale, 2);
    assert_eq!(c.preview_rounding, RoundingPolicy::Directional);
    assert!(c.validate().is_ok());
}

#[test]
fn empty_preset_is_all_defaults() {
    let p = Preset::from_json_str("{}").unwrap();
    assert_eq!(p, Preset::default());
}

#[test]
fn partial_preset_overrides_only_named_fields() {
    let p = Preset::from_json_str(
        r#"{
            "state": {
                "sequence": { "start": 3, "end": 0, "duration_secs": 1.5 },
                "export": { "format": "mp4", "resolution": "720p" }
            },
            "config": { "export_rounding": "nearest" }
        }"#,
    )
    .unwrap();
    assert_eq!(p.state.sequence.start, 3);
    assert_eq!(p.state.sequence.duration_secs, 1.5);
    assert_eq!(p.state.export.format, ExportFormat::Mp4);
    assert_eq!(p.state.export.resolution, Resolution::Hd720);
    assert_eq!(p.state.export.fps, 30);
    assert_eq!(p.config.export_rounding, RoundingPolicy::Nearest);
    assert_eq!(p.config.history_capacity, 50);
}

#[test]
fn bad_presets_are_rejected() {
    assert!(matches!(
        Preset::from_json_str("{"),
        Err(TickdownError::Serde(_))
    ));
    assert!(matches!(
        Preset::from_json_str(r#"{"config":{"history_capacity":0}}"#),
        Err(TickdownError::Validation(_))
    ));
}

#[test]
fn missing_preset_file_is_an_error() {
    let err = Preset::from_path(Path::new("target/does-not-exist.json")).unwrap_err();
    assert!(err.to_string().contains("does-not-exist"));
}
