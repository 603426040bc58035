//! Render surfaces consume a [`crate::FrameView`] and produce pixels.

/// Surface trait and frame buffer.
pub mod backend;
/// Built-in CPU rasterizer.
pub mod cpu;
/// Font lookup and text layout.
pub(crate) mod text;
