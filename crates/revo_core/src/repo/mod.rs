//! Data access for recordings.
//!
//! # Responsibility
//! - Define the item source contract consumed by screens and services.
//! - Keep SQLite query details out of interactive components.
//!
//! # Invariants
//! - Writes validate items before persistence.
//! - Missing rows surface as `RepoError::NotFound`, not as transport errors.

pub mod item_repo;
