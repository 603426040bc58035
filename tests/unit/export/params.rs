use super::*;
use crate::state::model::Resolution;

#[test]
fn names_carry_prefix_and_extension() {
    assert_eq!(
        artifact_name(ExportFormat::Webm, 1_700_000_000_000),
        "signal-motion-1700000000000.webm"
    );
    assert_eq!(artifact_name(ExportFormat::Mp4, 7), "signal-motion-7.mp4");
    assert_eq!(artifact_name(ExportFormat::Png, 7), "signal-frame-7.png");
}

#[test]
fn bitrate_depends_on_resolution_and_quality() {
    let mut s = ExportSettings::default();
    assert_eq!(bitrate_bps(&s), 10_000_000);
    s.resolution = Resolution::Uhd4k;
    assert_eq!(bitrate_bps(&s), 20_000_000);
    s.quality = 0.5;
    assert_eq!(bitrate_bps(&s), 10_000_000);
}

#[test]
fn trailing_capture_rounds_up() {
    assert_eq!(trailing_frames(Duration::from_millis(500), 30), 15);
    assert_eq!(trailing_frames(Duration::from_millis(500), 60), 30);
    assert_eq!(trailing_frames(Duration::from_millis(10), 30), 1);
    assert_eq!(trailing_frames(Duration::ZERO, 30), 0);
}

#[test]
fn frame_times_are_exact_on_whole_seconds() {
    assert_eq!(frame_time(150, 30), Duration::from_secs(5));
    assert_eq!(frame_time(1, 60), Duration::from_nanos(16_666_666));
    assert_eq!(frame_time(3, 0), Duration::ZERO);
}
