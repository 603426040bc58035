use std::collections::BTreeSet;
use std::time::{Duration, Instant};

pub const DEFAULT_HIGHLIGHT: Duration = Duration::from_millis(350);

/// Counts at or below this highlight every digit on change.
const FULL_HIGHLIGHT_AT_OR_BELOW: i64 = 10;

/// Decimal representation split into single characters (`-12` -> `['-', '1', '2']`).
pub fn digits(count: i64) -> Vec<char> {
    count.to_string().chars().collect()
}

/// Positions to highlight when the display goes from `prev` to `curr`.
///
/// Every index is returned when the digit count changed or `current_count` is at or below 10;
/// otherwise only the positions whose character differs.
pub fn changed_digit_indices(prev: &[char], curr: &[char], current_count: i64) -> BTreeSet<usize> {
    if prev.len() != curr.len() || current_count <= FULL_HIGHLIGHT_AT_OR_BELOW {
        return (0..curr.len()).collect();
    }
    prev.iter()
        .zip(curr)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect()
}

/// Tracks the digit-change highlight across frames.
///
/// A change arms a one-shot expiry `hold` after it happened. Later frames without a change do not
/// clear it early; a new change replaces the set and re-arms the expiry.
#[derive(Clone, Debug)]
pub struct DigitHighlighter {
    hold: Duration,
    prev: Vec<char>,
    active: BTreeSet<usize>,
    expires_at: Option<Instant>,
}

impl DigitHighlighter {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            prev: Vec::new(),
            active: BTreeSet::new(),
            expires_at: None,
        }
    }

    /// Feed the count displayed on this frame.
    pub fn observe(&mut self, count: i64, now: Instant) {
        let curr = digits(count);
        if !self.prev.is_empty() && curr != self.prev {
            let changed = changed_digit_indices(&self.prev, &curr, count);
            if !changed.is_empty() {
                self.active = changed;
                self.expires_at = Some(now + self.hold);
            }
        }
        self.prev = curr;
    }

    /// Indices highlighted at `now`.
    pub fn active(&self, now: Instant) -> BTreeSet<usize> {
        match self.expires_at {
            Some(t) if now < t => self.active.clone(),
            _ => BTreeSet::new(),
        }
    }

    /// Forget the previous digits and any pending highlight.
    pub fn reset(&mut self) {
        self.prev.clear();
        self.active.clear();
        self.expires_at = None;
    }
}

impl Default for DigitHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/projection/digits.rs"]
mod tests;
