//! Gesture-driven carousel.
//!
//! # Responsibility
//! - Route pointer input through the swipe recognizer.
//! - Guard against overlapping transitions and clamped-end no-ops.
//! - Commit index changes and notify the selection sink.
//!
//! # Invariants
//! - Inert carousels (`len <= 1`) never open a gesture session.
//! - A swipe fired while a transition runs is dropped, not queued.
//! - The index only changes inside `tick`, on transition completion.

use crate::carousel::index::{CarouselState, VisibleItems, WrapMode};
use crate::carousel::transition::{SlideFrame, SlideTransitionAnimator};
use crate::config::MotionConfig;
use crate::gesture::tracker::{AxisPolicy, GestureEnd, GestureTracker, PointerEvent, SwipeDirection};
use crate::selection::SelectionSink;
use log::{debug, info};

/// Carousel state plus its gesture and transition machinery.
#[derive(Debug, Clone)]
pub struct CarouselController<T> {
    state: CarouselState<T>,
    tracker: GestureTracker,
    animator: SlideTransitionAnimator,
}

impl<T> CarouselController<T> {
    pub fn new(items: Vec<T>, mode: WrapMode, config: &MotionConfig) -> Self {
        info!(
            "event=carousel_open module=carousel status=ok len={} wrap={}",
            items.len(),
            mode == WrapMode::Wrap
        );
        Self {
            state: CarouselState::new(items, mode),
            tracker: GestureTracker::new(config.swipe_threshold_px, AxisPolicy::HorizontalOnly),
            animator: SlideTransitionAnimator::new(config.slide_duration_ms, config.item_width_px),
        }
    }

    pub fn state(&self) -> &CarouselState<T> {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    pub fn visible(&self) -> VisibleItems<'_, T> {
        self.state.visible()
    }

    pub fn is_inert(&self) -> bool {
        self.state.index().is_inert()
    }

    pub fn is_animating(&self) -> bool {
        !self.animator.is_idle()
    }

    /// Whether a gesture session is still consuming moves.
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_listening()
    }

    /// Starts tracking a gesture. Inert carousels ignore input entirely.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        if self.is_inert() {
            return false;
        }
        self.tracker.pointer_down(event)
    }

    /// Feeds a move sample; returns the direction of a transition it started.
    pub fn pointer_move(&mut self, event: &PointerEvent, now_ms: u64) -> Option<SwipeDirection> {
        let direction = self.tracker.pointer_move(event)?;
        if self.is_animating() {
            debug!(
                "event=carousel_swipe module=carousel status=dropped reason=animating direction={}",
                direction.as_str()
            );
            return None;
        }
        if self.state.index().target(direction) == self.current_index() {
            debug!(
                "event=carousel_swipe module=carousel status=dropped reason=at_end direction={}",
                direction.as_str()
            );
            return None;
        }
        self.animator
            .start(direction, now_ms)
            .then_some(direction)
    }

    pub fn pointer_up(&mut self) -> GestureEnd {
        self.tracker.pointer_up()
    }

    /// Advances the running transition; commits and notifies on completion.
    pub fn tick<S>(&mut self, now_ms: u64, sink: &mut S) -> SlideFrame
    where
        S: SelectionSink + ?Sized,
    {
        let frame = self.animator.tick(now_ms, self.state.index_mut());
        if let Some(index) = frame.committed {
            sink.index_changed(index);
        }
        frame
    }

    /// Rebuilds the state for a changed item list.
    ///
    /// The current index is kept when still valid and clamped otherwise. Any
    /// running transition and open gesture are abandoned.
    pub fn replace_items(&mut self, items: Vec<T>) {
        let mode = self.state.index().mode();
        let current = self.current_index();
        self.teardown();
        self.state = CarouselState::with_index(items, current, mode);
        info!(
            "event=carousel_replace module=carousel status=ok len={} index={}",
            self.state.items().len(),
            self.current_index()
        );
    }

    /// Drops any open gesture session and running transition.
    pub fn teardown(&mut self) {
        self.tracker.cancel();
        self.animator.cancel();
    }
}
