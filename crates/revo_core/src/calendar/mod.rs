//! Calendar week strip.
//!
//! Window paging and day selection are independent axes: paging never moves
//! the selection, and selecting a day never pages the window.

pub mod week;
