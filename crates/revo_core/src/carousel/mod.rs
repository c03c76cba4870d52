//! Horizontally paged carousel over diary entries.
//!
//! # Responsibility
//! - Keep the circular (or clamped) index over the current item list.
//! - Animate slide transitions and commit index changes on completion.
//!
//! # Invariants
//! - Index changes happen only when a transition completes.
//! - Never more than one transition in flight per carousel.

pub mod controller;
pub mod index;
pub mod transition;
