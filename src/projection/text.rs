use crate::state::model::{SequenceConfig, VisualTheme};

/// Caption shown above the status message.
pub const STATUS_EYEBROW: &str = "SIGNAL ACTIVE";

/// Status message for a progress value: start text before the run, end text after it,
/// motivational text in between.
pub fn display_message(progress: f64, visuals: &VisualTheme) -> &str {
    if progress <= 0.0 || progress.is_nan() {
        &visuals.start_text
    } else if progress >= 1.0 {
        &visuals.end_text
    } else {
        &visuals.motivational_text
    }
}

/// `"{completed} / {total} — {percent}%"` with one decimal place.
pub fn progress_label(progress: f64, sequence: &SequenceConfig) -> String {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let total = sequence.total_steps();
    let completed = (progress * total as f64).floor() as u64;
    format!(
        "{completed} / {total} — {}%",
        format_tenths(progress * 100.0)
    )
}

// Rounds half up, matching how browsers format fixed-point numbers.
fn format_tenths(v: f64) -> String {
    let tenths = (v * 10.0 + 0.5).floor() as i64;
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
#[path = "../../tests/unit/projection/text.rs"]
mod tests;
