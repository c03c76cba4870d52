//! Two-frame eye blink shared by every mounted character face.
//!
//! # Invariants
//! - Exactly one interval timer is active while at least one face is mounted.
//! - No timer is active once the last face unmounts.
//! - State changes are hard cuts between `Open` and `Closed`.
//!
//! # See also
//! - `screen::ScreenServices`, which carries a `SharedBlink` into each screen.

use crate::animation::clock::{IntervalScheduler, TimerToken};
use crate::config::DEFAULT_BLINK_INTERVAL_MS;
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

/// Eye shape currently drawn by every face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeState {
    Open,
    Closed,
}

impl EyeState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }
}

/// Reference-counted blink timer.
#[derive(Debug, Clone)]
pub struct EyeBlinkTicker {
    interval_ms: u64,
    state: EyeState,
    mounted_faces: usize,
    timer: Option<TimerToken>,
}

impl EyeBlinkTicker {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            state: EyeState::Open,
            mounted_faces: 0,
            timer: None,
        }
    }

    pub fn state(&self) -> EyeState {
        self.state
    }

    pub fn mounted_faces(&self) -> usize {
        self.mounted_faces
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.is_some()
    }

    /// Registers a face; the first one starts the interval timer.
    pub fn mount_face(&mut self, timers: &mut dyn IntervalScheduler) -> EyeState {
        self.mounted_faces += 1;
        if self.timer.is_none() {
            self.timer = Some(timers.set_interval(self.interval_ms));
            info!(
                "event=blink_start module=animation status=ok interval_ms={}",
                self.interval_ms
            );
        }
        self.state
    }

    /// Unregisters a face; the last one clears the timer.
    pub fn unmount_face(&mut self, timers: &mut dyn IntervalScheduler) {
        if self.mounted_faces == 0 {
            return;
        }
        self.mounted_faces -= 1;
        if self.mounted_faces == 0 {
            self.clear(timers);
        }
    }

    /// Handles one interval callback and returns the new eye state.
    ///
    /// Callbacks from a cleared or foreign timer are ignored.
    pub fn on_interval(&mut self, token: TimerToken) -> Option<EyeState> {
        if self.timer != Some(token) {
            debug!("event=blink_tick module=animation status=ignored reason=stale");
            return None;
        }
        self.state = self.state.toggled();
        Some(self.state)
    }

    fn clear(&mut self, timers: &mut dyn IntervalScheduler) {
        if let Some(token) = self.timer.take() {
            timers.clear_interval(token);
            info!("event=blink_stop module=animation status=ok");
        }
        self.state = EyeState::Open;
    }
}

impl Default for EyeBlinkTicker {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_INTERVAL_MS)
    }
}

#[derive(Debug)]
struct BlinkHub<I> {
    ticker: EyeBlinkTicker,
    timers: I,
}

/// Process-scoped blink service: one ticker plus the scheduler driving it.
///
/// Clones share the same ticker, so every face sees one eye state and at
/// most one interval timer runs. Hosts forward each interval callback once,
/// through any clone.
#[derive(Debug)]
pub struct SharedBlink<I> {
    inner: Rc<RefCell<BlinkHub<I>>>,
}

impl<I> Clone for SharedBlink<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<I: Default> Default for SharedBlink<I> {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_INTERVAL_MS, I::default())
    }
}

impl<I> SharedBlink<I> {
    pub fn new(interval_ms: u64, timers: I) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BlinkHub {
                ticker: EyeBlinkTicker::new(interval_ms),
                timers,
            })),
        }
    }

    pub fn state(&self) -> EyeState {
        self.inner.borrow().ticker.state()
    }

    pub fn mounted_faces(&self) -> usize {
        self.inner.borrow().ticker.mounted_faces()
    }

    pub fn is_ticking(&self) -> bool {
        self.inner.borrow().ticker.is_ticking()
    }

    /// Whether `other` drives the same ticker.
    pub fn shares_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Read access to the underlying scheduler.
    pub fn with_timers<T>(&self, read: impl FnOnce(&I) -> T) -> T {
        read(&self.inner.borrow().timers)
    }

    /// Handles one interval callback for the shared ticker.
    pub fn on_interval(&self, token: TimerToken) -> Option<EyeState> {
        self.inner.borrow_mut().ticker.on_interval(token)
    }
}

impl<I: IntervalScheduler> SharedBlink<I> {
    pub fn mount_face(&self) -> EyeState {
        let mut hub = self.inner.borrow_mut();
        let hub = &mut *hub;
        hub.ticker.mount_face(&mut hub.timers)
    }

    pub fn unmount_face(&self) {
        let mut hub = self.inner.borrow_mut();
        let hub = &mut *hub;
        hub.ticker.unmount_face(&mut hub.timers);
    }
}

#[cfg(test)]
mod tests {
    use super::{EyeBlinkTicker, EyeState, SharedBlink};
    use crate::animation::clock::ManualIntervalScheduler;

    #[test]
    fn first_mount_starts_single_timer() {
        let mut timers = ManualIntervalScheduler::new();
        let mut ticker = EyeBlinkTicker::new(1_000);
        ticker.mount_face(&mut timers);
        ticker.mount_face(&mut timers);
        ticker.mount_face(&mut timers);
        assert_eq!(timers.active_count(), 1);
        assert_eq!(ticker.mounted_faces(), 3);
    }

    #[test]
    fn toggles_are_hard_cuts() {
        let mut timers = ManualIntervalScheduler::new();
        let mut ticker = EyeBlinkTicker::new(1_000);
        ticker.mount_face(&mut timers);
        let token = super::TimerToken(1);
        assert_eq!(ticker.on_interval(token), Some(EyeState::Closed));
        assert_eq!(ticker.on_interval(token), Some(EyeState::Open));
    }

    #[test]
    fn last_unmount_clears_timer_and_resets_state() {
        let mut timers = ManualIntervalScheduler::new();
        let mut ticker = EyeBlinkTicker::new(1_000);
        ticker.mount_face(&mut timers);
        ticker.mount_face(&mut timers);
        ticker.on_interval(super::TimerToken(1));

        ticker.unmount_face(&mut timers);
        assert!(ticker.is_ticking());
        ticker.unmount_face(&mut timers);
        assert!(!ticker.is_ticking());
        assert_eq!(timers.active_count(), 0);
        assert_eq!(ticker.state(), EyeState::Open);

        ticker.unmount_face(&mut timers);
        assert_eq!(ticker.mounted_faces(), 0);
    }

    #[test]
    fn stale_interval_is_ignored() {
        let mut timers = ManualIntervalScheduler::new();
        let mut ticker = EyeBlinkTicker::new(1_000);
        ticker.mount_face(&mut timers);
        ticker.unmount_face(&mut timers);
        assert_eq!(ticker.on_interval(super::TimerToken(1)), None);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn clones_share_one_timer_and_one_state() {
        let first: SharedBlink<ManualIntervalScheduler> = SharedBlink::default();
        let second = first.clone();
        assert!(first.shares_with(&second));

        first.mount_face();
        second.mount_face();
        assert_eq!(first.with_timers(|timers| timers.active_count()), 1);
        assert_eq!(second.on_interval(super::TimerToken(1)), Some(EyeState::Closed));
        assert_eq!(first.state(), EyeState::Closed);

        first.unmount_face();
        assert!(second.is_ticking());
        assert_eq!(second.mounted_faces(), 1);
        second.unmount_face();
        assert!(!first.is_ticking());
        assert_eq!(first.with_timers(|timers| timers.active_count()), 0);
    }
}
