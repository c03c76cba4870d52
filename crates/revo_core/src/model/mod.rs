//! Read-only domain model consumed by the interactive core.
//!
//! # Responsibility
//! - Define the diary entry shape (`Item`) shared by every carousel screen.
//! - Map emotions to their display colors and wave palettes.
//!
//! # Invariants
//! - Items are owned by the item source; the core never mutates them.
//! - Every item is identified by a stable positive `ItemId`.

pub mod item;
pub mod palette;
