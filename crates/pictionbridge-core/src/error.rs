//! Error types module
//!
//! Failures that cross a component boundary are represented by [`BridgeError`].
//! Per-row extraction problems deliberately do not appear here: they degrade to
//! [`crate::models::BinaryFile::Failed`] on the affected record instead of
//! aborting a batch.

use std::io;
use std::path::PathBuf;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[cfg(feature = "sqlx")]
    #[error("database error: {0}")]
    Database(#[source] SqlxError),

    /// A work directory (the binaries root or a per-update extraction
    /// directory) could not be created. Always fatal for the operation in
    /// flight: extraction cannot succeed without it.
    #[error("failed to create work directory {path}")]
    WorkDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for BridgeError {
    fn from(err: SqlxError) -> Self {
        BridgeError::Database(err)
    }
}
