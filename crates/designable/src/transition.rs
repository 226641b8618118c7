#![forbid(unsafe_code)]

//! Presentation hook wrapped around appearance broadcasts.
//!
//! The registry does not animate anything itself. When an appearance change
//! is requested with [`Animation::Animated`], the whole broadcast loop is
//! handed to [`Transition::animate`]; the UI layer decides what "animated"
//! means (a cross-fade, an interpolated palette, nothing at all).
//!
//! # Invariants
//!
//! - The body passed to either method must be called exactly once, and
//!   synchronously, before the method returns. State and persistence have
//!   already been updated when the body runs.
//! - An in-flight animation from a previous change is not cancelled by the
//!   registry; rapid changes may race visually.

use std::time::Duration;

/// Default duration of an animated appearance change.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(250);

/// How a single appearance change should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    /// Broadcast inside [`Transition::animate`] over the given duration.
    Animated(Duration),
    /// Broadcast through [`Transition::immediate`], no transition.
    Immediate,
}

impl Animation {
    /// Animated change over `seconds`. Negative or non-finite values clamp
    /// to zero, values beyond `Duration::MAX` clamp to it.
    #[must_use]
    pub fn animated_secs(seconds: f64) -> Self {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        Self::Animated(Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX))
    }

    #[inline]
    #[must_use]
    pub fn is_animated(self) -> bool {
        matches!(self, Self::Animated(_))
    }

    /// Duration of the transition, zero when immediate.
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Self::Animated(duration) => duration,
            Self::Immediate => Duration::ZERO,
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::Animated(DEFAULT_ANIMATION_DURATION)
    }
}

/// UI-layer capability that presents a broadcast.
pub trait Transition {
    /// Run `body` inside an animation committed over `duration`.
    fn animate(&self, duration: Duration, body: &mut dyn FnMut());

    /// Run `body` with no transition.
    fn immediate(&self, body: &mut dyn FnMut()) {
        body();
    }
}

/// Transition that runs every broadcast inline. Used when the host has no
/// animation system (headless use, tests, terminals).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransition;

impl Transition for NoTransition {
    fn animate(&self, _duration: Duration, body: &mut dyn FnMut()) {
        body();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_animation_matches_constant() {
        assert_eq!(
            Animation::default(),
            Animation::Animated(Duration::from_millis(250))
        );
        assert!(Animation::default().is_animated());
    }

    #[test]
    fn animated_secs_clamps_invalid_input() {
        assert_eq!(Animation::animated_secs(-1.0).duration(), Duration::ZERO);
        assert_eq!(Animation::animated_secs(f64::NAN).duration(), Duration::ZERO);
        assert_eq!(Animation::animated_secs(1e20).duration(), Duration::MAX);
        assert_eq!(
            Animation::animated_secs(0.5).duration(),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn immediate_has_zero_duration() {
        assert_eq!(Animation::Immediate.duration(), Duration::ZERO);
        assert!(!Animation::Immediate.is_animated());
    }

    #[test]
    fn no_transition_runs_body_once_in_both_modes() {
        let mut calls = 0;
        NoTransition.animate(Duration::from_secs(1), &mut || calls += 1);
        NoTransition.immediate(&mut || calls += 1);
        assert_eq!(calls, 2);
    }
}
