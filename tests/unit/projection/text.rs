use super::*;

#[test]
fn message_follows_run_phase() {
    let v = VisualTheme::default();
    assert_eq!(display_message(0.0, &v), "PREPARING");
    assert_eq!(display_message(0.5, &v), "SIGNAL");
    assert_eq!(display_message(1.0, &v), "FINISHED");
    assert_eq!(display_message(-0.1, &v), "PREPARING");
    assert_eq!(display_message(1.2, &v), "FINISHED");
}

#[test]
fn label_counts_completed_steps() {
    let seq = SequenceConfig::default();
    assert_eq!(progress_label(0.0, &seq), "0 / 10 — 0.0%");
    assert_eq!(progress_label(0.5, &seq), "5 / 10 — 50.0%");
    assert_eq!(progress_label(0.999, &seq), "9 / 10 — 99.9%");
    assert_eq!(progress_label(1.0, &seq), "10 / 10 — 100.0%");
}

#[test]
fn label_rounds_percentage_half_up() {
    let seq = SequenceConfig {
        start: 0,
        end: 3,
        duration_secs: 1.0,
    };
    assert_eq!(progress_label(1.0 / 3.0, &seq), "1 / 3 — 33.3%");
    assert_eq!(progress_label(0.00125, &seq), "0 / 3 — 0.1%");
}

#[test]
fn label_with_empty_range() {
    let seq = SequenceConfig {
        start: 4,
        end: 4,
        duration_secs: 1.0,
    };
    assert_eq!(progress_label(0.7, &seq), "0 / 0 — 70.0%");
}
