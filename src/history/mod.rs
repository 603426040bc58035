/// Undo/redo keyboard chords.
pub mod keys;
/// Bounded snapshot history.
pub mod manager;
