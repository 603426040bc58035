//! Tick feedback: the live trigger used while previewing and the synthesized track muxed into
//! exported video.

/// Live tick triggers.
pub mod tick;
/// Tick tone synthesis.
pub mod tone;
