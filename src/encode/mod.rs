//! Capture sinks.
//!
//! Sinks consume rendered frames in capture order and finalize them into an [`sink::Artifact`].

/// `ffmpeg`-based sink (mp4/webm/gif via system `ffmpeg`).
pub mod ffmpeg;
/// PNG still-frame encoding.
pub mod png;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
