//! Export orchestration: still frames and recorded video.

/// Artifact naming and encoder parameters.
pub mod params;
/// Still and video export drivers.
pub mod orchestrator;
