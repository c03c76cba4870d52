//! Pointer gesture recognition.
//!
//! Raw pointer samples go in, discrete swipe or tap outcomes come out.
//! Whether a fired swipe is honored is decided by the consumer.

pub mod tracker;
