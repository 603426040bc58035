//! Pure mapping from state and progress to the per-element visual payload.
//!
//! Nothing here reads a clock except [`digits::DigitHighlighter`], which takes `now` explicitly.
//! Every function accepts any progress in `[0, 1]`, visited by a run or not.

pub mod digits;
pub mod style;
pub mod text;
pub mod view;
