//! Domain model for the item catalogue.
//!
//! # Responsibility
//! - Define the canonical item record shared by every storage backend.
//! - Define the value carriers used by search and update use-cases.
//!
//! # Invariants
//! - Every stored item is identified by a store-assigned `ItemId`.
//! - An item without an id is a `NewItem`; only repositories mint `Item`s.

pub mod item;
