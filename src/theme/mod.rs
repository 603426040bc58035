//! Theme suggestions from an external service.
//!
//! The network client lives outside this crate; it hands back raw response text, which is parsed
//! strictly so a malformed reply is never half-applied.

use crate::foundation::core::Rgba8;
use crate::foundation::error::{TickdownError, TickdownResult};
use crate::state::model::{BackgroundStyle, FontChoice};
use crate::state::patch::VisualsPatch;

/// A complete theme returned by a suggestion service.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSuggestion {
    pub accent_color: Rgba8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring_color: Option<Rgba8>,
    pub font: FontChoice,
    pub background_style: BackgroundStyle,
    pub motivational_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibe_description: Option<String>,
}

impl ThemeSuggestion {
    /// The visuals edit this suggestion amounts to. The ring follows the accent unless the
    /// suggestion names its own ring color.
    pub fn to_patch(&self) -> VisualsPatch {
        VisualsPatch {
            accent_color: Some(self.accent_color),
            ring_color: Some(self.ring_color.unwrap_or(self.accent_color)),
            font: Some(self.font),
            background_style: Some(self.background_style),
            motivational_text: Some(self.motivational_text.clone()),
            start_text: self.start_text.clone(),
            end_text: self.end_text.clone(),
            ..VisualsPatch::default()
        }
    }
}

/// Anything that can turn a free-text vibe into a theme.
pub trait ThemeSuggester {
    fn suggest(&self, vibe: &str) -> TickdownResult<ThemeSuggestion>;
}

/// A transport returning raw response text is a suggester once the text is parsed.
impl<F> ThemeSuggester for F
where
    F: Fn(&str) -> TickdownResult<String>,
{
    fn suggest(&self, vibe: &str) -> TickdownResult<ThemeSuggestion> {
        let text = self(vibe)?;
        parse_theme_response(&text)
    }
}

/// Prompt sent to the suggestion service.
pub fn theme_prompt(vibe: &str) -> String {
    format!(
        "Generate a visual theme for a countdown video based on this vibe: \"{}\". Return only JSON.",
        vibe.trim()
    )
}

/// Parse a service reply. Empty text, missing required fields, unknown enum values and
/// non-hex colors all fail with [`TickdownError::Service`].
pub fn parse_theme_response(text: &str) -> TickdownResult<ThemeSuggestion> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TickdownError::service("empty theme response"));
    }
    let suggestion: ThemeSuggestion = serde_json::from_str(text)
        .map_err(|e| TickdownError::service(format!("malformed theme response: {e}")))?;
    if suggestion.motivational_text.trim().is_empty() {
        return Err(TickdownError::service(
            "theme response has an empty motivationalText",
        ));
    }
    Ok(suggestion)
}

#[cfg(test)]
#[path = "../../tests/unit/theme/mod.rs"]
mod tests;
