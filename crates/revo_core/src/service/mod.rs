//! Use-case services over the item source.
//!
//! # Responsibility
//! - Turn repository calls into screen-level operations.
//! - Keep FFI and CLI layers decoupled from storage details.

pub mod archive;
pub mod item_service;
