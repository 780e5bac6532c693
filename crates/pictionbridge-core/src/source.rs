//! The update-source trait: the pending-update queue as a read/extract/delete
//! interface over a backing tabular store.

use async_trait::async_trait;

use crate::error::BridgeError;
use crate::models::Update;

#[async_trait]
pub trait UpdateSource {
    /// True iff the pending count is greater than zero. Derived from
    /// [`UpdateSource::update_count`], so the two are always consistent.
    async fn has_updates(&self) -> Result<bool, BridgeError>;

    /// Exact count of pending rows at the time of the call. Never cached.
    async fn update_count(&self) -> Result<i64, BridgeError>;

    /// Pending rows ordered by upload timestamp ascending (ties broken by id),
    /// at most `limit` of them when given. Each row's blob is extracted to
    /// disk before the record is returned. A per-row extraction failure does
    /// not abort the batch; the record comes back with
    /// [`crate::models::BinaryFile::Failed`]. Only a work-directory creation
    /// failure aborts the whole call.
    async fn get_updates(&self, limit: Option<i64>) -> Result<Vec<Update>, BridgeError>;

    /// Delete the backing row matching `update.id`. Exactly one affected row
    /// is expected; zero or more than one is logged as a warning, not raised.
    async fn delete_update(&self, update: &Update) -> Result<(), BridgeError>;
}
