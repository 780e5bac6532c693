//! Binary payload materialization for pending updates.
//!
//! [`BinaryStore`] owns the `<work>/binaries/` tree and writes one directory
//! per update, keyed by the numeric update id, so that filename collisions
//! between updates cannot collide on disk.

pub mod store;

pub use store::{BinaryStore, BINARY_DIR};
