//! Trait abstraction for periodically advanced stores.
//!
//! [`Simulated`] is implemented by both stores so that a
//! [`Session`](crate::Session) can drive them with the same ticker loop,
//! and tests can drive them with their own.

use std::time::Duration;

use async_trait::async_trait;

/// A store that advances its simulation on a fixed period.
///
/// # Example
///
/// ```ignore
/// use viot_core::Simulated;
///
/// async fn advance<S: Simulated>(store: &S, steps: usize) {
///     for _ in 0..steps {
///         store.tick().await;
///     }
/// }
/// ```
#[async_trait]
pub trait Simulated: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Time between ticks.
    fn period(&self) -> Duration;

    /// Apply one simulation step.
    async fn tick(&self);
}
