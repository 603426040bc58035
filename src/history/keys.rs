/// A key press as reported by the host, reduced to what the history shortcuts need.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyInput {
    pub key: char,
    pub ctrl: bool,
    /// Command key on macOS.
    pub meta: bool,
    pub shift: bool,
    /// A text field has focus; shortcuts yield to native text editing.
    pub text_input_focused: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryAction {
    Undo,
    Redo,
}

impl HistoryAction {
    /// Map Ctrl/Cmd+Z to undo and Ctrl/Cmd+Shift+Z or Ctrl/Cmd+Y to redo.
    pub fn from_key(input: KeyInput) -> Option<Self> {
        if input.text_input_focused || !(input.ctrl || input.meta) {
            return None;
        }
        match input.key.to_ascii_lowercase() {
            'z' if input.shift => Some(Self::Redo),
            'z' => Some(Self::Undo),
            'y' => Some(Self::Redo),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/keys.rs"]
mod tests;
