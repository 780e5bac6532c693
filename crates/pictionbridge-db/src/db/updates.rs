//! Update repository: read/extract/delete over the Piction interface table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};

use pictionbridge_core::models::{BinaryFile, Update, UpdateAction, UpdateRelationship};
use pictionbridge_core::{BridgeError, UpdateSource};
use pictionbridge_storage::BinaryStore;

/// Row type for the interface table (for FromRow).
///
/// Column names and semantic types are the upstream integration's contract;
/// `bimage` is the inline blob this component exists to extract.
#[derive(Debug, sqlx::FromRow)]
pub struct UpdateRow {
    pub id: i64,
    pub piction_id: i32,
    pub filename: String,
    pub mimetype: String,
    pub img_size: i32,
    pub img_height: i32,
    pub img_width: i32,
    pub object_csid: Option<String>,
    pub media_csid: Option<String>,
    pub blob_csid: Option<String>,
    pub action: String,
    pub relationship: String,
    pub dt_addedtopiction: DateTime<Utc>,
    pub dt_uploaded: DateTime<Utc>,
    pub bimage: Vec<u8>,
}

impl UpdateRow {
    /// Map this row to the domain record, attaching an extraction outcome
    /// produced separately. Unrecognized enum values are logged and preserved;
    /// the row is never dropped over them.
    pub fn into_update(self, binary: BinaryFile) -> Update {
        let action = UpdateAction::parse(&self.action);
        if !action.is_recognized() {
            tracing::warn!(update.id = self.id, action = %self.action, "update has unknown action");
        }

        let relationship = UpdateRelationship::parse(&self.relationship);
        if !relationship.is_recognized() {
            tracing::warn!(
                update.id = self.id,
                relationship = %self.relationship,
                "update has unknown relationship"
            );
        }

        Update {
            id: self.id,
            piction_id: self.piction_id,
            filename: self.filename,
            mime_type: self.mimetype,
            img_size: self.img_size,
            img_height: self.img_height,
            img_width: self.img_width,
            object_csid: self.object_csid,
            media_csid: self.media_csid,
            blob_csid: self.blob_csid,
            action,
            relationship,
            date_time_added_to_piction: self.dt_addedtopiction,
            date_time_uploaded: self.dt_uploaded,
            binary,
        }
    }
}

/// The table name is configuration, not user input, but it is interpolated
/// into SQL; restrict it to a plain (optionally schema-qualified) identifier.
fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn count_sql(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", table)
}

fn select_sql(table: &str, with_limit: bool) -> String {
    let mut sql = format!(
        "SELECT id, piction_id, filename, mimetype, img_size, img_height, img_width, \
         object_csid, media_csid, blob_csid, action, relationship, dt_addedtopiction, \
         dt_uploaded, bimage FROM {} ORDER BY dt_uploaded, id",
        table
    );
    if with_limit {
        sql.push_str(" LIMIT $1");
    }
    sql
}

fn delete_sql(table: &str) -> String {
    format!("DELETE FROM {} WHERE id = $1", table)
}

/// Repository for the interface table, exposing it as an [`UpdateSource`].
#[derive(Clone)]
pub struct UpdateRepository {
    pool: PgPool,
    table: String,
    store: BinaryStore,
}

impl UpdateRepository {
    /// Build a ready-to-use repository. The store has already created its
    /// work directories, so no half-configured state exists after this.
    pub fn new(
        pool: PgPool,
        table: impl Into<String>,
        store: BinaryStore,
    ) -> Result<Self, BridgeError> {
        let table = table.into();
        if !is_valid_table_name(&table) {
            return Err(BridgeError::Config(format!(
                "invalid interface table name: {:?}",
                table
            )));
        }
        Ok(UpdateRepository { pool, table, store })
    }
}

#[async_trait]
impl UpdateSource for UpdateRepository {
    async fn has_updates(&self) -> Result<bool, BridgeError> {
        Ok(self.update_count().await? > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = %self.table))]
    async fn update_count(&self) -> Result<i64, BridgeError> {
        let (count,): (i64,) = sqlx::query_as(&count_sql(&self.table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.table = %self.table))]
    async fn get_updates(&self, limit: Option<i64>) -> Result<Vec<Update>, BridgeError> {
        let sql = select_sql(&self.table, limit.is_some());
        tracing::debug!(sql = %sql, "executing query");

        let mut query = sqlx::query_as::<Postgres, UpdateRow>(&sql);
        if let Some(limit) = limit {
            query = query.bind(limit);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut updates = Vec::with_capacity(rows.len());
        for row in rows {
            let binary = self
                .store
                .extract(row.id, &row.filename, i64::from(row.img_size), &row.bimage)
                .await?;
            let update = row.into_update(binary);
            tracing::debug!(update.id = update.id, filename = %update.filename, "found update");
            updates.push(update);
        }

        Ok(updates)
    }

    #[tracing::instrument(skip(self, update), fields(db.table = %self.table, update.id = update.id))]
    async fn delete_update(&self, update: &Update) -> Result<(), BridgeError> {
        tracing::debug!("deleting update");

        let result = sqlx::query(&delete_sql(&self.table))
            .bind(update.id)
            .execute(&self.pool)
            .await?;

        match result.rows_affected() {
            1 => {}
            0 => tracing::warn!("deletion affected no rows, update was not found"),
            n => tracing::warn!(
                rows_affected = n,
                "deletion affected multiple rows, interface table may contain duplicate ids"
            ),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> UpdateRow {
        UpdateRow {
            id: 42,
            piction_id: 7,
            filename: "photo.jpg".to_string(),
            mimetype: "image/jpeg".to_string(),
            img_size: 1024,
            img_height: 600,
            img_width: 800,
            object_csid: Some("obj-csid".to_string()),
            media_csid: None,
            blob_csid: Some("blob-csid".to_string()),
            action: "ADD".to_string(),
            relationship: "PRIMARY".to_string(),
            dt_addedtopiction: Utc::now(),
            dt_uploaded: Utc::now(),
            bimage: vec![0xff, 0xd8],
        }
    }

    #[test]
    fn row_maps_to_update() {
        let row = sample_row();
        let update = row.into_update(BinaryFile::Failed {
            reason: "stub".to_string(),
        });

        assert_eq!(update.id, 42);
        assert_eq!(update.piction_id, 7);
        assert_eq!(update.mime_type, "image/jpeg");
        assert_eq!(update.action, UpdateAction::Add);
        assert_eq!(update.relationship, UpdateRelationship::Primary);
        assert_eq!(update.object_csid.as_deref(), Some("obj-csid"));
        assert_eq!(update.media_csid, None);
    }

    #[test]
    fn row_with_unknown_action_is_still_mapped() {
        let mut row = sample_row();
        row.action = "PURGE".to_string();

        let update = row.into_update(BinaryFile::Failed {
            reason: "stub".to_string(),
        });

        assert_eq!(update.action, UpdateAction::Unrecognized("PURGE".to_string()));
        assert_eq!(update.relationship, UpdateRelationship::Primary);
    }

    #[test]
    fn table_name_validation() {
        assert!(is_valid_table_name("cspace_piction_interface"));
        assert!(is_valid_table_name("public.piction_updates"));
        assert!(is_valid_table_name("t1"));

        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("updates; DROP TABLE users"));
        assert!(!is_valid_table_name("\"quoted\""));
        assert!(!is_valid_table_name("spaced name"));
    }

    #[test]
    fn select_sql_orders_and_limits() {
        let sql = select_sql("piction_updates", false);
        assert!(sql.ends_with("ORDER BY dt_uploaded, id"));
        assert!(sql.contains("bimage FROM piction_updates"));

        let sql = select_sql("piction_updates", true);
        assert!(sql.ends_with("ORDER BY dt_uploaded, id LIMIT $1"));
    }

    #[test]
    fn count_and_delete_sql() {
        assert_eq!(
            count_sql("piction_updates"),
            "SELECT COUNT(*) FROM piction_updates"
        );
        assert_eq!(
            delete_sql("piction_updates"),
            "DELETE FROM piction_updates WHERE id = $1"
        );
    }
}
