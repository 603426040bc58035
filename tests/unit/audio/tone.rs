use super::*;

#[test]
fn voice_is_silent_outside_its_window() {
    assert_eq!(tick_sample(-0.001), 0.0);
    assert_eq!(tick_sample(TICK_LENGTH_SECS), 0.0);
    assert_eq!(tick_sample(0.0), 0.0);
}

#[test]
fn voice_stays_within_start_gain() {
    let peak = (0..3840)
        .map(|i| tick_sample(f64::from(i) / 48_000.0).abs())
        .fold(0.0f32, f32::max);
    assert!(peak > 0.01);
    assert!(peak <= 0.04 + 1e-6);
}

#[test]
fn track_length_follows_total_duration() {
    let track = render_tick_track(&[], 2.0);
    assert_eq!(track.sample_rate, 48_000);
    assert_eq!(track.channels, 1);
    assert_eq!(track.samples.len(), 96_000);
    assert!((track.duration_secs() - 2.0).abs() < 1e-9);
    assert!(track.samples.iter().all(|s| *s == 0.0));
}

#[test]
fn ticks_land_at_their_onsets() {
    let track = render_tick_track(&[0.5, 5.0], 1.0);
    let onset = 24_000;
    assert!(track.samples[..onset].iter().all(|s| *s == 0.0));
    assert!(track.samples[onset..onset + 3840].iter().any(|s| *s != 0.0));
    assert!(track.samples[onset + 3840..].iter().all(|s| *s == 0.0));
}

#[test]
fn f32le_bytes_are_little_endian() {
    let track = AudioTrack {
        sample_rate: 48_000,
        channels: 1,
        samples: vec![1.0, -0.5],
    };
    let bytes = track.to_f32le_bytes();
    assert_eq!(bytes.len(), 8);
    assert_eq!(&bytes[..4], &1.0f32.to_le_bytes());
}
