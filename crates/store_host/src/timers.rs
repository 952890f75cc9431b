//! Delay contract used for timed UI transitions.

use std::{future::Future, pin::Pin};

/// Object-safe boxed future used by [`TimerService`].
pub type TimerFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

/// Host service that resolves after a delay.
pub trait TimerService {
    /// Resolves after roughly `ms` milliseconds.
    fn sleep(&self, ms: u32) -> TimerFuture<'_>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Timer that resolves immediately.
pub struct ImmediateTimerService;

impl TimerService for ImmediateTimerService {
    fn sleep(&self, _ms: u32) -> TimerFuture<'_> {
        Box::pin(async {})
    }
}
