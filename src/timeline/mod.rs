/// Run state machine.
pub mod engine;
/// Progress and count sampling.
pub mod sampling;
