//! One-shot swipe recognizer.
//!
//! # Responsibility
//! - Turn a pointer-down/move/up sequence into at most one directional event.
//! - Report releases that never crossed the threshold as taps.
//!
//! # Invariants
//! - At most one session is open per tracker.
//! - A session fires at most once; after firing it ignores further moves.
//! - Only the first touch point of a multi-touch event is consulted.
//! - Events without pointer data leave the open session untouched.

use log::{debug, trace};

/// Logical-pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Raw pointer input as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Mouse or pen pointer with a single position.
    Mouse(Point),
    /// Touch event; may carry zero or many touch points.
    Touch(Vec<Point>),
}

impl PointerEvent {
    /// Position of the primary pointer, if the event carries one.
    pub fn primary(&self) -> Option<Point> {
        match self {
            Self::Mouse(point) => Some(*point),
            Self::Touch(points) => points.first().copied(),
        }
    }
}

/// Direction a swipe asks the content to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    /// Swipe left: show the next item.
    Advance,
    /// Swipe right: show the previous item.
    Retreat,
}

impl SwipeDirection {
    /// Sign of the visual slide offset for this direction.
    pub fn slide_sign(self) -> i8 {
        match self {
            Self::Advance => -1,
            Self::Retreat => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Retreat => "retreat",
        }
    }
}

/// How vertical motion is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPolicy {
    /// Only horizontal travel is consulted.
    HorizontalOnly,
    /// Moves whose vertical travel is at least their horizontal travel never fire.
    RejectVertical,
}

/// Ephemeral state between pointer-down and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    start: Point,
    fired: bool,
}

impl GestureSession {
    pub fn start(&self) -> Point {
        self.start
    }

    pub fn fired(&self) -> bool {
        self.fired
    }
}

/// How a session ended on release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEnd {
    /// No session was open.
    Idle,
    /// The session already fired a directional event.
    Swiped,
    /// Released without crossing the threshold; carries the press position.
    Tap(Point),
}

/// Threshold-based swipe recognizer for one tracked surface.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    threshold: f32,
    policy: AxisPolicy,
    session: Option<GestureSession>,
}

impl GestureTracker {
    pub fn new(threshold: f32, policy: AxisPolicy) -> Self {
        Self {
            threshold,
            policy,
            session: None,
        }
    }

    /// Opens a session at the primary pointer position.
    ///
    /// Any previous session on this surface is discarded first. Returns
    /// `false` when the event carries no pointer data.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        let Some(start) = event.primary() else {
            trace!("event=gesture_down module=gesture status=ignored reason=no_pointer");
            return false;
        };
        if self.session.is_some() {
            debug!("event=gesture_down module=gesture status=replaced");
        }
        self.session = Some(GestureSession {
            start,
            fired: false,
        });
        true
    }

    /// Feeds one move sample and returns the directional event, if it fires now.
    ///
    /// Fires on the first sample whose horizontal travel strictly exceeds the
    /// threshold. Later samples in the same session never fire again.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> Option<SwipeDirection> {
        let session = self.session.as_mut().filter(|session| !session.fired)?;
        let point = event.primary()?;

        let delta_x = point.x - session.start.x;
        let delta_y = point.y - session.start.y;
        if delta_x.abs() <= self.threshold {
            return None;
        }
        if self.policy == AxisPolicy::RejectVertical && delta_y.abs() >= delta_x.abs() {
            trace!("event=gesture_move module=gesture status=ignored reason=vertical");
            return None;
        }

        session.fired = true;
        let direction = if delta_x < 0.0 {
            SwipeDirection::Advance
        } else {
            SwipeDirection::Retreat
        };
        debug!(
            "event=gesture_fire module=gesture direction={} delta_x={:.1}",
            direction.as_str(),
            delta_x
        );
        Some(direction)
    }

    /// Closes the session and reports how it ended.
    pub fn pointer_up(&mut self) -> GestureEnd {
        match self.session.take() {
            None => GestureEnd::Idle,
            Some(session) if session.fired => GestureEnd::Swiped,
            Some(session) => GestureEnd::Tap(session.start),
        }
    }

    /// Drops any open session without reporting a tap.
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            debug!("event=gesture_cancel module=gesture status=ok");
        }
    }

    /// Current session, if any.
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Whether move samples are still being consumed.
    pub fn is_listening(&self) -> bool {
        self.session.is_some_and(|session| !session.fired)
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisPolicy, GestureEnd, GestureTracker, Point, PointerEvent, SwipeDirection};

    fn mouse(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Mouse(Point::new(x, y))
    }

    #[test]
    fn fires_once_for_many_moves_past_threshold() {
        let mut tracker = GestureTracker::new(50.0, AxisPolicy::HorizontalOnly);
        assert!(tracker.pointer_down(&mouse(200.0, 10.0)));

        let fired = (1..=10)
            .filter_map(|step| tracker.pointer_move(&mouse(200.0 - 20.0 * step as f32, 10.0)))
            .collect::<Vec<_>>();

        assert_eq!(fired, vec![SwipeDirection::Advance]);
        assert!(!tracker.is_listening());
        assert_eq!(tracker.pointer_up(), GestureEnd::Swiped);
    }

    #[test]
    fn exact_threshold_does_not_fire() {
        let mut tracker = GestureTracker::new(50.0, AxisPolicy::HorizontalOnly);
        tracker.pointer_down(&mouse(0.0, 0.0));
        assert_eq!(tracker.pointer_move(&mouse(50.0, 0.0)), None);
        assert_eq!(tracker.pointer_move(&mouse(-50.0, 0.0)), None);
        assert_eq!(tracker.pointer_up(), GestureEnd::Tap(Point::new(0.0, 0.0)));
    }

    #[test]
    fn positive_delta_retreats() {
        let mut tracker = GestureTracker::new(50.0, AxisPolicy::HorizontalOnly);
        tracker.pointer_down(&mouse(0.0, 0.0));
        assert_eq!(
            tracker.pointer_move(&mouse(51.0, 0.0)),
            Some(SwipeDirection::Retreat)
        );
    }

    #[test]
    fn only_first_touch_point_is_consulted() {
        let mut tracker = GestureTracker::new(50.0, AxisPolicy::HorizontalOnly);
        tracker.pointer_down(&PointerEvent::Touch(vec![
            Point::new(100.0, 0.0),
            Point::new(400.0, 0.0),
        ]));
        let moved = PointerEvent::Touch(vec![Point::new(90.0, 0.0), Point::new(0.0, 0.0)]);
        assert_eq!(tracker.pointer_move(&moved), None);
    }

    #[test]
    fn empty_touch_keeps_session_open() {
        let mut tracker = GestureTracker::new(50.0, AxisPolicy::HorizontalOnly);
        tracker.pointer_down(&mouse(100.0, 0.0));
        assert_eq!(tracker.pointer_move(&PointerEvent::Touch(Vec::new())), None);
        assert!(tracker.is_listening());
        assert_eq!(
            tracker.pointer_move(&mouse(20.0, 0.0)),
            Some(SwipeDirection::Advance)
        );
    }

    #[test]
    fn down_without_pointer_data_opens_nothing() {
        let mut tracker = GestureTracker::new(50.0, AxisPolicy::HorizontalOnly);
        assert!(!tracker.pointer_down(&PointerEvent::Touch(Vec::new())));
        assert!(tracker.session().is_none());
        assert_eq!(tracker.pointer_up(), GestureEnd::Idle);
    }

    #[test]
    fn reject_vertical_ignores_steep_moves() {
        let mut tracker = GestureTracker::new(50.0, AxisPolicy::RejectVertical);
        tracker.pointer_down(&mouse(0.0, 0.0));
        assert_eq!(tracker.pointer_move(&mouse(-60.0, 80.0)), None);
        assert!(tracker.is_listening());
        assert_eq!(
            tracker.pointer_move(&mouse(-90.0, 20.0)),
            Some(SwipeDirection::Advance)
        );
    }

    #[test]
    fn cancel_discards_session_without_tap() {
        let mut tracker = GestureTracker::new(50.0, AxisPolicy::HorizontalOnly);
        tracker.pointer_down(&mouse(0.0, 0.0));
        tracker.cancel();
        assert_eq!(tracker.pointer_up(), GestureEnd::Idle);
    }
}
