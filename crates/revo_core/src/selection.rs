//! Selection notifications emitted to the hosting screen.

use chrono::NaiveDate;

/// Receives committed selection changes.
///
/// Both methods default to no-ops so hosts implement only what they observe.
pub trait SelectionSink {
    /// A carousel transition committed a new current index.
    fn index_changed(&mut self, _new_index: usize) {}

    /// A day cell was selected in the week strip.
    fn date_selected(&mut self, _date: NaiveDate) {}
}

/// Sink that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl SelectionSink for NoopSink {}

/// Selection event captured by `SelectionLog`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    IndexChanged(usize),
    DateSelected(NaiveDate),
}

/// Sink that records every notification in order.
#[derive(Debug, Default, Clone)]
pub struct SelectionLog {
    pub events: Vec<SelectionEvent>,
}

impl SelectionSink for SelectionLog {
    fn index_changed(&mut self, new_index: usize) {
        self.events.push(SelectionEvent::IndexChanged(new_index));
    }

    fn date_selected(&mut self, date: NaiveDate) {
        self.events.push(SelectionEvent::DateSelected(date));
    }
}
