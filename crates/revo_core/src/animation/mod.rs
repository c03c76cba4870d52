//! Continuous animations: wave geometry, the shared wave clock and eye blinks.
//!
//! # Responsibility
//! - Compute deterministic per-item wave geometry.
//! - Drive it from one shared frame clock per screen.
//! - Toggle the shared eye blink state on a fixed interval.
//!
//! # Invariants
//! - Timers and frame requests are owned by injected schedulers and are
//!   always released on stop/unmount.

pub mod blink;
pub mod clock;
pub mod engine;
pub mod wave;
