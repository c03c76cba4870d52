//! Week strip paging and day selection.
//!
//! # Responsibility
//! - Page a Sunday-anchored seven-day window by swipe.
//! - Select a day by tap, never in the future.
//! - Derive per-day display cells from the item list.
//!
//! # Invariants
//! - `WeekWindow::start_of_week` is always a Sunday.
//! - `WeekWindow` is a plain value; hosts may build one for any dates.
//! - `WeeklyDateNavigator` never pages past the real-world current week and
//!   never selects a day after `today`. Its selection may lie outside the
//!   visible window.

use crate::config::MotionConfig;
use crate::gesture::tracker::{AxisPolicy, GestureEnd, GestureTracker, PointerEvent, SwipeDirection};
use crate::model::item::Item;
use crate::selection::SelectionSink;
use chrono::{Datelike, Duration, NaiveDate};
use log::debug;
use std::collections::BTreeSet;

/// Number of day cells in the strip.
pub const DAYS_PER_WEEK: usize = 7;

/// Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Visible week plus the independently selected day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    start_of_week: NaiveDate,
    selected_date: NaiveDate,
}

impl WeekWindow {
    /// Creates a window; `start` is snapped back to its Sunday.
    ///
    /// No date is checked against today; `WeeklyDateNavigator` does that.
    pub fn new(start: NaiveDate, selected_date: NaiveDate) -> Self {
        Self {
            start_of_week: start_of_week(start),
            selected_date,
        }
    }

    pub fn start_of_week(&self) -> NaiveDate {
        self.start_of_week
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// Sunday..Saturday of the window.
    pub fn days(&self) -> [NaiveDate; DAYS_PER_WEEK] {
        let mut days = [self.start_of_week; DAYS_PER_WEEK];
        for (offset, day) in days.iter_mut().enumerate() {
            *day = self.start_of_week + Duration::days(offset as i64);
        }
        days
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_of_week && date < self.start_of_week + Duration::days(7)
    }

    /// Whether this window is the week containing `today`.
    pub fn is_current_week(&self, today: NaiveDate) -> bool {
        self.start_of_week >= start_of_week(today)
    }
}

/// Display data for one day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_selected: bool,
    pub is_today: bool,
    /// Future days render disabled and reject taps.
    pub is_future: bool,
    pub has_recording: bool,
}

/// Result of a swipe that paged the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekPage {
    pub direction: SwipeDirection,
    pub start_of_week: NaiveDate,
}

/// Swipe-to-page and tap-to-select controller for the week strip.
#[derive(Debug, Clone)]
pub struct WeeklyDateNavigator {
    window: WeekWindow,
    tracker: GestureTracker,
}

impl WeeklyDateNavigator {
    /// Opens on the current week with today selected.
    pub fn new(today: NaiveDate, config: &MotionConfig) -> Self {
        Self {
            window: WeekWindow::new(today, today),
            tracker: GestureTracker::new(config.swipe_threshold_px, AxisPolicy::RejectVertical),
        }
    }

    pub fn window(&self) -> &WeekWindow {
        &self.window
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        self.tracker.pointer_down(event)
    }

    /// Feeds a move sample; returns the new window when a swipe paged it.
    pub fn pointer_move(&mut self, event: &PointerEvent, today: NaiveDate) -> Option<WeekPage> {
        let direction = self.tracker.pointer_move(event)?;
        let paged = match direction {
            SwipeDirection::Retreat => {
                self.page_back();
                true
            }
            SwipeDirection::Advance => self.page_forward(today),
        };
        paged.then_some(WeekPage {
            direction,
            start_of_week: self.window.start_of_week,
        })
    }

    /// Ends the gesture. A tap on `tapped_day` (0 = Sunday) selects that day.
    ///
    /// Returns the newly selected date, if any.
    pub fn pointer_up<S>(
        &mut self,
        tapped_day: Option<usize>,
        today: NaiveDate,
        sink: &mut S,
    ) -> Option<NaiveDate>
    where
        S: SelectionSink + ?Sized,
    {
        let GestureEnd::Tap(_) = self.tracker.pointer_up() else {
            return None;
        };
        let date = *self.window.days().get(tapped_day?)?;
        self.select_day(date, today, sink).then_some(date)
    }

    /// Moves the window back seven days. Always succeeds.
    pub fn page_back(&mut self) -> NaiveDate {
        self.window.start_of_week = self.window.start_of_week - Duration::days(7);
        debug!(
            "event=week_page module=calendar status=ok direction=back start={}",
            self.window.start_of_week
        );
        self.window.start_of_week
    }

    /// Moves the window forward seven days unless it already shows the current week.
    pub fn page_forward(&mut self, today: NaiveDate) -> bool {
        if self.window.is_current_week(today) {
            debug!("event=week_page module=calendar status=rejected reason=future");
            return false;
        }
        self.window.start_of_week = self.window.start_of_week + Duration::days(7);
        debug!(
            "event=week_page module=calendar status=ok direction=forward start={}",
            self.window.start_of_week
        );
        true
    }

    /// Selects `date` unless it is after `today`.
    pub fn select_day<S>(&mut self, date: NaiveDate, today: NaiveDate, sink: &mut S) -> bool
    where
        S: SelectionSink + ?Sized,
    {
        if date > today {
            debug!("event=day_select module=calendar status=rejected reason=future");
            return false;
        }
        self.window.selected_date = date;
        sink.date_selected(date);
        true
    }

    /// Display cells for the visible window.
    pub fn day_cells(&self, today: NaiveDate, items: &[Item]) -> [DayCell; DAYS_PER_WEEK] {
        day_cells(&self.window, today, items)
    }

    pub fn cancel(&mut self) {
        self.tracker.cancel();
    }
}

/// Builds the seven display cells for `window`.
pub fn day_cells(window: &WeekWindow, today: NaiveDate, items: &[Item]) -> [DayCell; DAYS_PER_WEEK] {
    let recorded = items
        .iter()
        .map(Item::recorded_on)
        .filter(|date| window.contains(*date))
        .collect::<BTreeSet<_>>();
    day_cells_for_dates(window, today, &recorded)
}

/// Same as `day_cells`, from a precomputed set of recorded days.
pub fn day_cells_for_dates(
    window: &WeekWindow,
    today: NaiveDate,
    recorded: &BTreeSet<NaiveDate>,
) -> [DayCell; DAYS_PER_WEEK] {
    window.days().map(|date| DayCell {
        date,
        is_selected: date == window.selected_date,
        is_today: date == today,
        is_future: date > today,
        has_recording: recorded.contains(&date),
    })
}

/// Whether any item was recorded on `date`.
pub fn has_recording(date: NaiveDate, items: &[Item]) -> bool {
    items.iter().any(|item| item.recorded_on() == date)
}

#[cfg(test)]
mod tests {
    use super::{has_recording, start_of_week, WeekWindow, WeeklyDateNavigator};
    use crate::config::MotionConfig;
    use crate::gesture::tracker::{Point, PointerEvent, SwipeDirection};
    use crate::model::item::{Emotion, Item};
    use crate::selection::{NoopSink, SelectionEvent, SelectionLog};
    use chrono::{Datelike, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn at(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Mouse(Point::new(x, y))
    }

    // 2026-10-15 is a Thursday.
    fn today() -> NaiveDate {
        date(2026, 10, 15)
    }

    #[test]
    fn start_of_week_snaps_to_sunday() {
        assert_eq!(start_of_week(today()), date(2026, 10, 11));
        assert_eq!(start_of_week(date(2026, 10, 11)), date(2026, 10, 11));
        assert_eq!(start_of_week(date(2026, 10, 17)).weekday(), Weekday::Sun);
    }

    #[test]
    fn swipe_left_on_current_week_is_noop() {
        let mut nav = WeeklyDateNavigator::new(today(), &MotionConfig::default());
        nav.pointer_down(&at(300.0, 0.0));
        assert_eq!(nav.pointer_move(&at(200.0, 0.0), today()), None);
        assert_eq!(nav.window().start_of_week(), date(2026, 10, 11));
    }

    #[test]
    fn swipe_right_retreats_and_left_advances_back() {
        let mut nav = WeeklyDateNavigator::new(today(), &MotionConfig::default());
        nav.pointer_down(&at(100.0, 0.0));
        let page = nav
            .pointer_move(&at(180.0, 5.0), today())
            .expect("retreat always pages");
        assert_eq!(page.direction, SwipeDirection::Retreat);
        assert_eq!(page.start_of_week, date(2026, 10, 4));
        assert_eq!(nav.pointer_up(None, today(), &mut NoopSink), None);

        nav.pointer_down(&at(300.0, 0.0));
        let page = nav
            .pointer_move(&at(200.0, 0.0), today())
            .expect("past week can advance");
        assert_eq!(page.start_of_week, date(2026, 10, 11));
    }

    #[test]
    fn vertical_swipe_does_not_page() {
        let mut nav = WeeklyDateNavigator::new(today(), &MotionConfig::default());
        nav.pointer_down(&at(100.0, 0.0));
        assert_eq!(nav.pointer_move(&at(170.0, 120.0), today()), None);
        assert_eq!(nav.window().start_of_week(), date(2026, 10, 11));
    }

    #[test]
    fn tap_selects_past_day_and_rejects_future_day() {
        let mut nav = WeeklyDateNavigator::new(today(), &MotionConfig::default());
        let mut sink = SelectionLog::default();

        nav.pointer_down(&at(10.0, 0.0));
        assert_eq!(
            nav.pointer_up(Some(1), today(), &mut sink),
            Some(date(2026, 10, 12))
        );
        assert_eq!(nav.window().selected_date(), date(2026, 10, 12));

        nav.pointer_down(&at(10.0, 0.0));
        assert_eq!(nav.pointer_up(Some(6), today(), &mut sink), None);
        assert_eq!(nav.window().selected_date(), date(2026, 10, 12));
        assert_eq!(
            sink.events,
            vec![SelectionEvent::DateSelected(date(2026, 10, 12))]
        );
    }

    #[test]
    fn plain_window_keeps_dates_while_navigator_guards_today() {
        let future = date(2026, 11, 4);
        let window = WeekWindow::new(future, future);
        assert_eq!(window.selected_date(), future);
        assert!(window.is_current_week(today()));

        let mut nav = WeeklyDateNavigator::new(today(), &MotionConfig::default());
        let mut sink = NoopSink;
        assert!(!nav.select_day(future, today(), &mut sink));
        assert!(!nav.page_forward(today()));
        assert_eq!(nav.window().selected_date(), today());
        assert_eq!(nav.window().start_of_week(), start_of_week(today()));
    }

    #[test]
    fn selection_survives_paging() {
        let mut nav = WeeklyDateNavigator::new(today(), &MotionConfig::default());
        nav.page_back();
        assert!(!nav.window().contains(nav.window().selected_date()));
        assert_eq!(nav.window().selected_date(), today());
    }

    #[test]
    fn day_cells_flag_recordings_today_and_future() {
        let recorded_at = date(2026, 10, 13)
            .and_hms_opt(21, 0, 0)
            .expect("valid time");
        let items = vec![Item::new(4, Emotion::Happy, recorded_at)];
        let window = WeekWindow::new(today(), today());
        let cells = super::day_cells(&window, today(), &items);

        assert_eq!(cells[0].date, date(2026, 10, 11));
        assert!(cells[2].has_recording);
        assert!(!cells[3].has_recording);
        assert!(cells[4].is_today && cells[4].is_selected);
        assert!(cells[5].is_future && cells[6].is_future);
        assert!(has_recording(date(2026, 10, 13), &items));
    }
}
