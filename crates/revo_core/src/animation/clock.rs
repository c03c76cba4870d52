//! Time and scheduling services injected into animated components.
//!
//! # Responsibility
//! - Abstract wall-clock time, per-frame callbacks and interval timers.
//! - Provide manual implementations so hosts and tests can drive time.
//!
//! # Invariants
//! - Tokens are unique per scheduler instance and never reused.
//! - Cancelling or clearing an unknown token is a no-op.

use chrono::{Local, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// Source of "now" for animations and date rules.
pub trait Clock {
    /// Monotonic milliseconds.
    fn now_ms(&self) -> u64;
    /// Real-world local calendar day.
    fn today(&self) -> NaiveDate;
}

/// Process clock: monotonic milliseconds since construction, local date.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock whose time only moves when told to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub now_ms: u64,
    pub today: NaiveDate,
}

impl FixedClock {
    pub fn new(now_ms: u64, today: NaiveDate) -> Self {
        Self { now_ms, today }
    }

    pub fn advance(&mut self, delta_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

/// Handle of one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameToken(pub u64);

/// Host per-frame callback primitive.
pub trait FrameScheduler {
    /// Requests one frame callback.
    ///
    /// Returns `None` when the host has no per-frame primitive.
    fn request_frame(&mut self) -> Option<FrameToken>;

    /// Cancels a pending frame callback.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Frame scheduler that records requests; the host fires them by hand.
#[derive(Debug, Clone)]
pub struct ManualFrameScheduler {
    available: bool,
    next_token: u64,
    pending: BTreeSet<FrameToken>,
    requested_total: u64,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self {
            available: true,
            next_token: 1,
            pending: BTreeSet::new(),
            requested_total: 0,
        }
    }

    /// Scheduler that reports no per-frame primitive.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, token: FrameToken) -> bool {
        self.pending.contains(&token)
    }

    /// Number of successful requests over the scheduler lifetime.
    pub fn requested_total(&self) -> u64 {
        self.requested_total
    }

    /// Consumes a pending request, as the host does right before firing it.
    pub fn fire(&mut self, token: FrameToken) -> bool {
        self.pending.remove(&token)
    }
}

impl Default for ManualFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> Option<FrameToken> {
        if !self.available {
            return None;
        }
        let token = FrameToken(self.next_token);
        self.next_token += 1;
        self.requested_total += 1;
        self.pending.insert(token);
        Some(token)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.remove(&token);
    }
}

/// Handle of one repeating interval timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(pub u64);

/// Host repeating-timer primitive.
pub trait IntervalScheduler {
    fn set_interval(&mut self, period_ms: u64) -> TimerToken;
    fn clear_interval(&mut self, token: TimerToken);
}

/// Interval scheduler that only tracks which timers are active.
#[derive(Debug, Clone, Default)]
pub struct ManualIntervalScheduler {
    next_token: u64,
    active: BTreeMap<TimerToken, u64>,
}

impl ManualIntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Period of an active timer.
    pub fn period_of(&self, token: TimerToken) -> Option<u64> {
        self.active.get(&token).copied()
    }
}

impl IntervalScheduler for ManualIntervalScheduler {
    fn set_interval(&mut self, period_ms: u64) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.active.insert(token, period_ms);
        token
    }

    fn clear_interval(&mut self, token: TimerToken) {
        self.active.remove(&token);
    }
}
