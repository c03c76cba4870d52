//! Slide transition state machine.
//!
//! # Responsibility
//! - Animate the visual offset from `0` to `sign * item_width`.
//! - On completion, commit the index and reset the offset in the same call.
//!
//! # Invariants
//! - At most one transition is in flight; `start` while animating is rejected.
//! - Transitions never queue or batch.
//! - Whenever the animator is `Idle`, its offset is exactly `0`.

use crate::carousel::index::CarouselIndexModel;
use crate::gesture::tracker::SwipeDirection;
use log::debug;

/// Animator phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlidePhase {
    Idle,
    Animating {
        direction: SwipeDirection,
        started_ms: u64,
    },
}

/// Snapshot produced by one animator tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideFrame {
    /// Horizontal offset to apply to the previous/current/next strip.
    pub offset: f32,
    /// `-1`, `0` (idle) or `+1`.
    pub direction: i8,
    /// Linear progress in `0..=1`.
    pub progress: f32,
    /// New current index when this tick completed the transition.
    pub committed: Option<usize>,
}

impl SlideFrame {
    const IDLE: SlideFrame = SlideFrame {
        offset: 0.0,
        direction: 0,
        progress: 0.0,
        committed: None,
    };
}

/// Timed slide between adjacent carousel items.
#[derive(Debug, Clone)]
pub struct SlideTransitionAnimator {
    duration_ms: u64,
    item_width: f32,
    phase: SlidePhase,
}

impl SlideTransitionAnimator {
    pub fn new(duration_ms: u64, item_width: f32) -> Self {
        Self {
            duration_ms: duration_ms.max(1),
            item_width,
            phase: SlidePhase::Idle,
        }
    }

    pub fn phase(&self) -> SlidePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SlidePhase::Idle
    }

    /// Begins a transition. Returns `false` when one is already running.
    pub fn start(&mut self, direction: SwipeDirection, now_ms: u64) -> bool {
        if !self.is_idle() {
            debug!(
                "event=slide_start module=carousel status=dropped reason=animating direction={}",
                direction.as_str()
            );
            return false;
        }
        self.phase = SlidePhase::Animating {
            direction,
            started_ms: now_ms,
        };
        debug!(
            "event=slide_start module=carousel status=ok direction={} duration_ms={}",
            direction.as_str(),
            self.duration_ms
        );
        true
    }

    /// Advances the animation to `now_ms`.
    ///
    /// The tick that reaches the full duration commits the target index on
    /// `index`, resets the offset to `0` and returns to `Idle` before
    /// returning, so the re-derived neighbors and the offset change together.
    pub fn tick(&mut self, now_ms: u64, index: &mut CarouselIndexModel) -> SlideFrame {
        let SlidePhase::Animating {
            direction,
            started_ms,
        } = self.phase
        else {
            return SlideFrame::IDLE;
        };

        let elapsed = now_ms.saturating_sub(started_ms);
        let progress = (elapsed as f32 / self.duration_ms as f32).min(1.0);
        if progress < 1.0 {
            return SlideFrame {
                offset: f32::from(direction.slide_sign()) * self.item_width * ease_in_out(progress),
                direction: direction.slide_sign(),
                progress,
                committed: None,
            };
        }

        let target = index.target(direction);
        index.commit(target);
        self.phase = SlidePhase::Idle;
        debug!(
            "event=slide_commit module=carousel status=ok direction={} index={}",
            direction.as_str(),
            target
        );
        SlideFrame {
            offset: 0.0,
            direction: 0,
            progress: 1.0,
            committed: Some(target),
        }
    }

    /// Abandons a running transition without committing.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            debug!("event=slide_cancel module=carousel status=ok");
        }
        self.phase = SlidePhase::Idle;
    }
}

/// Symmetric ease-in-out curve on `0..=1`.
fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
