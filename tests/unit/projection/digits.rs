use super::*;

fn set(ix: &[usize]) -> BTreeSet<usize> {
    ix.iter().copied().collect()
}

#[test]
fn digits_split_decimal_representation() {
    assert_eq!(digits(0), vec!['0']);
    assert_eq!(digits(120), vec!['1', '2', '0']);
    assert_eq!(digits(-7), vec!['-', '7']);
}

#[test]
fn only_differing_positions_above_ten() {
    let prev = digits(11);
    let curr = digits(12);
    assert_eq!(changed_digit_indices(&prev, &curr, 12), set(&[1]));

    let prev = digits(120);
    let curr = digits(119);
    assert_eq!(changed_digit_indices(&prev, &curr, 119), set(&[1, 2]));
}

#[test]
fn every_position_at_or_below_ten() {
    let prev = digits(11);
    let curr = digits(10);
    assert_eq!(changed_digit_indices(&prev, &curr, 10), set(&[0, 1]));
    assert_eq!(changed_digit_indices(&digits(4), &digits(3), 3), set(&[0]));
}

#[test]
fn every_position_when_width_changes() {
    let prev = digits(100);
    let curr = digits(99);
    assert_eq!(changed_digit_indices(&prev, &curr, 99), set(&[0, 1]));
}

#[test]
fn highlight_expires_after_hold_regardless_of_frames() {
    let t0 = Instant::now();
    let mut h = DigitHighlighter::new(Duration::from_millis(350));
    h.observe(21, t0);
    assert!(h.active(t0).is_empty());

    h.observe(20, t0 + Duration::from_millis(10));
    assert_eq!(h.active(t0 + Duration::from_millis(10)), set(&[1]));

    // Frames without a change do not clear it.
    h.observe(20, t0 + Duration::from_millis(100));
    assert_eq!(h.active(t0 + Duration::from_millis(300)), set(&[1]));

    assert!(h.active(t0 + Duration::from_millis(360)).is_empty());
}

#[test]
fn new_change_rearms_the_timer() {
    let t0 = Instant::now();
    let mut h = DigitHighlighter::new(Duration::from_millis(350));
    h.observe(13, t0);
    h.observe(12, t0 + Duration::from_millis(200));
    h.observe(11, t0 + Duration::from_millis(400));
    assert_eq!(h.active(t0 + Duration::from_millis(700)), set(&[1]));
    assert!(h.active(t0 + Duration::from_millis(751)).is_empty());
}

#[test]
fn reset_clears_pending_highlight() {
    let t0 = Instant::now();
    let mut h = DigitHighlighter::default();
    h.observe(5, t0);
    h.observe(4, t0);
    h.reset();
    assert!(h.active(t0).is_empty());
    h.observe(3, t0);
    assert!(h.active(t0).is_empty());
}
