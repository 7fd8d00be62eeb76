// ABOUTME: Sealed trait pattern for LifecycleClient.
// ABOUTME: Only the clients built by ClientFactory can implement the lifecycle trait.

/// Prevents implementations of [`super::LifecycleClient`] outside this crate.
pub trait Sealed {}
