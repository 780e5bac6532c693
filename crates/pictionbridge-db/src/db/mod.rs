//! Repository implementations for the interface table.

pub mod updates;

pub use updates::{UpdateRepository, UpdateRow};
