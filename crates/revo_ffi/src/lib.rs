//! FFI crate exposing `revo_core` to the Flutter host.

pub mod api;
