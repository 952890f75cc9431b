//! Delay adapter backed by `setTimeout`.

use store_host::{TimerFuture, TimerService};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Browser timer adapter. Resolves immediately outside wasm builds.
pub struct WebTimerService;

impl TimerService for WebTimerService {
    fn sleep(&self, ms: u32) -> TimerFuture<'_> {
        Box::pin(bridge::sleep_ms(ms))
    }
}
