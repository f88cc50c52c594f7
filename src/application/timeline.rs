//! Tick-driven transition clock shared by the zoom and highlight animations.
//!
//! # Invariants
//!
//! 1. `tick()` only advances a `Running` transition.
//! 2. `progress()` is `elapsed / duration` clamped to [0.0, 1.0].
//! 3. `restart()` bumps the generation; completions of earlier generations
//!    are never reported.
//!
//! # Failure Modes
//!
//! - Zero duration: clamped to 1ns to avoid division by zero.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Independent animation channels. Restarting one never disturbs the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineKind {
    /// Wedge and label geometry after a click
    Zoom,
    /// Fill/stroke opacity after hover or click
    Highlight,
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineKind::Zoom => write!(f, "zoom"),
            TimelineKind::Highlight => write!(f, "highlight"),
        }
    }
}

/// Easing curve applied to linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

/// Playback state of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not started, or finished and acknowledged
    Idle,
    Running,
}

/// Elapsed-time clock for one timeline.
#[derive(Debug, Clone)]
pub struct Transition {
    kind: TimelineKind,
    duration: Duration,
    easing: Easing,
    elapsed: Duration,
    state: PlaybackState,
    generation: u64,
}

impl Transition {
    pub fn new(kind: TimelineKind, duration: Duration, easing: Easing) -> Self {
        Self {
            kind,
            duration: duration.max(Duration::from_nanos(1)),
            easing,
            elapsed: Duration::ZERO,
            state: PlaybackState::Idle,
            generation: 0,
        }
    }

    /// Start from zero, superseding anything in flight. Returns the new generation.
    pub fn restart(&mut self) -> u64 {
        if self.state == PlaybackState::Running {
            tracing::debug!(
                timeline = %self.kind,
                generation = self.generation,
                "superseding in-flight transition"
            );
        }
        self.generation += 1;
        self.elapsed = Duration::ZERO;
        self.state = PlaybackState::Running;
        self.generation
    }

    /// Advance the clock. Returns `Some(generation)` on the tick that completes it.
    pub fn tick(&mut self, dt: Duration) -> Option<u64> {
        if self.state != PlaybackState::Running {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.state = PlaybackState::Idle;
            return Some(self.generation);
        }
        None
    }

    pub fn progress(&self) -> f64 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Eased progress, the `t` handed to interpolators.
    pub fn t(&self) -> f64 {
        self.easing.apply(self.progress())
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> TimelineKind {
        self.kind
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }
}
