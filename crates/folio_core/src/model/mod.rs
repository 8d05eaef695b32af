//! Site content model.
//!
//! # Responsibility
//! - Define the aggregate document persisted as one JSON value.
//! - Provide the compiled-in default document.
//!
//! # Invariants
//! - The aggregate document is the only unit of persistence.
//! - Nested configuration objects always carry every key.

pub mod defaults;
pub mod document;
