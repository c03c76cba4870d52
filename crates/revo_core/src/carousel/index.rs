//! Circular index model over an ordered item list.
//!
//! # Invariants
//! - `current < len` whenever `len > 0`; `current == 0` for an empty list.
//! - With `len <= 1` the model is inert: neighbors equal `current`.
//! - Index arithmetic is pure; callers decide when to commit.

use crate::gesture::tracker::SwipeDirection;

/// Behavior at the ends of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Past the last item comes the first one again.
    Wrap,
    /// The ends are hard stops.
    Clamp,
}

/// Index arithmetic for a list of `len` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselIndexModel {
    len: usize,
    current: usize,
    mode: WrapMode,
}

impl CarouselIndexModel {
    /// Creates a model; an out-of-range `current` is clamped to the last item.
    pub fn new(len: usize, current: usize, mode: WrapMode) -> Self {
        Self {
            len,
            current: current.min(len.saturating_sub(1)),
            mode,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn mode(&self) -> WrapMode {
        self.mode
    }

    /// Whether gestures should be attached at all.
    pub fn is_inert(&self) -> bool {
        self.len <= 1
    }

    pub fn previous_index(&self) -> usize {
        if self.is_inert() {
            return self.current;
        }
        match self.mode {
            WrapMode::Wrap => (self.current + self.len - 1) % self.len,
            WrapMode::Clamp => self.current.saturating_sub(1),
        }
    }

    pub fn next_index(&self) -> usize {
        if self.is_inert() {
            return self.current;
        }
        match self.mode {
            WrapMode::Wrap => (self.current + 1) % self.len,
            WrapMode::Clamp => (self.current + 1).min(self.len - 1),
        }
    }

    /// Index shown after a swipe left.
    pub fn advance(&self) -> usize {
        self.next_index()
    }

    /// Index shown after a swipe right.
    pub fn retreat(&self) -> usize {
        self.previous_index()
    }

    /// Index a swipe in `direction` would land on.
    pub fn target(&self, direction: SwipeDirection) -> usize {
        match direction {
            SwipeDirection::Advance => self.advance(),
            SwipeDirection::Retreat => self.retreat(),
        }
    }

    /// Sets the current index; out-of-range values are clamped.
    pub(crate) fn commit(&mut self, index: usize) {
        self.current = index.min(self.len.saturating_sub(1));
    }
}

/// Previous/current/next items around the current index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleItems<'a, T> {
    pub previous: Option<&'a T>,
    pub current: Option<&'a T>,
    pub next: Option<&'a T>,
}

/// Items plus their circular index.
///
/// Recreated whenever the underlying list changes.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselState<T> {
    items: Vec<T>,
    index: CarouselIndexModel,
}

impl<T> CarouselState<T> {
    pub fn new(items: Vec<T>, mode: WrapMode) -> Self {
        Self::with_index(items, 0, mode)
    }

    pub fn with_index(items: Vec<T>, current: usize, mode: WrapMode) -> Self {
        let index = CarouselIndexModel::new(items.len(), current, mode);
        Self { items, index }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn index(&self) -> &CarouselIndexModel {
        &self.index
    }

    pub(crate) fn index_mut(&mut self) -> &mut CarouselIndexModel {
        &mut self.index
    }

    pub fn current_index(&self) -> usize {
        self.index.current()
    }

    pub fn current_item(&self) -> Option<&T> {
        self.items.get(self.index.current())
    }

    /// Neighbors are `None` when the carousel is inert or at a clamped end.
    pub fn visible(&self) -> VisibleItems<'_, T> {
        let current = self.index.current();
        let neighbor = |index: usize| {
            if self.index.is_inert() || index == current {
                None
            } else {
                self.items.get(index)
            }
        };
        VisibleItems {
            previous: neighbor(self.index.previous_index()),
            current: self.current_item(),
            next: neighbor(self.index.next_index()),
        }
    }

    /// Consumes the state and returns the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
