#![forbid(unsafe_code)]

//! Transition used by the demo binary.

use std::time::Duration;

use designable::Transition;
use tracing::{debug, info};

/// Terminal stand-in for a cross-fade: logs the requested animation and
/// applies the change at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTransition;

impl Transition for LoggingTransition {
    fn animate(&self, duration: Duration, body: &mut dyn FnMut()) {
        info!(
            duration_ms = duration.as_millis() as u64,
            "animating appearance change"
        );
        body();
    }

    fn immediate(&self, body: &mut dyn FnMut()) {
        debug!("applying appearance change without animation");
        body();
    }
}
