/// Durable and transient state types.
pub mod model;
/// Partial, sanitizing updates.
pub mod patch;
/// The single state owner.
pub mod tree;
