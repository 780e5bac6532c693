//! PostgreSQL data access for the Piction interface table.
//!
//! The interface table is owned by the upstream integration; this crate only
//! reads it, extracts blobs as a side effect of reading, and deletes rows the
//! caller has finished processing.

pub mod db;

pub use db::{UpdateRepository, UpdateRow};
