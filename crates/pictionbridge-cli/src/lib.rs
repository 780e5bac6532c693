//! Shared helpers for the pictionbridge binary.

use serde::Serialize;

use pictionbridge_core::models::{BinaryFile, Update};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Per-update entry in the drain report.
#[derive(Debug, Serialize)]
pub struct UpdateReport {
    pub id: i64,
    pub filename: String,
    pub mime_type: String,
    pub action: String,
    pub relationship: String,
    pub binary: BinaryFile,
}

impl From<&Update> for UpdateReport {
    fn from(update: &Update) -> Self {
        UpdateReport {
            id: update.id,
            filename: update.filename.clone(),
            mime_type: update.mime_type.clone(),
            action: update.action.to_string(),
            relationship: update.relationship.to_string(),
            binary: update.binary.clone(),
        }
    }
}

/// Summary of one drain cycle, printed as JSON.
#[derive(Debug, Serialize)]
pub struct CycleReport {
    pub fetched: usize,
    pub extracted: usize,
    pub failed: usize,
    pub deleted: usize,
    /// Pending rows left in the interface table after the cycle.
    pub remaining: i64,
    pub updates: Vec<UpdateReport>,
}

/// Count (extracted, failed) outcomes in a batch.
pub fn count_outcomes(updates: &[Update]) -> (usize, usize) {
    let extracted = updates.iter().filter(|u| u.binary.is_extracted()).count();
    (extracted, updates.len() - extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pictionbridge_core::models::{UpdateAction, UpdateRelationship};
    use std::path::PathBuf;

    fn update(id: i64, binary: BinaryFile) -> Update {
        Update {
            id,
            piction_id: id as i32,
            filename: format!("{}.jpg", id),
            mime_type: "image/jpeg".to_string(),
            img_size: 10,
            img_height: 1,
            img_width: 1,
            object_csid: None,
            media_csid: None,
            blob_csid: None,
            action: UpdateAction::Add,
            relationship: UpdateRelationship::Primary,
            date_time_added_to_piction: Utc::now(),
            date_time_uploaded: Utc::now(),
            binary,
        }
    }

    #[test]
    fn count_outcomes_splits_extracted_and_failed() {
        let updates = vec![
            update(
                1,
                BinaryFile::Extracted {
                    path: PathBuf::from("/w/binaries/1/1.jpg"),
                    bytes_written: 10,
                },
            ),
            update(
                2,
                BinaryFile::Failed {
                    reason: "io".to_string(),
                },
            ),
            update(
                3,
                BinaryFile::Extracted {
                    path: PathBuf::from("/w/binaries/3/3.jpg"),
                    bytes_written: 10,
                },
            ),
        ];

        assert_eq!(count_outcomes(&updates), (2, 1));
        assert_eq!(count_outcomes(&[]), (0, 0));
    }

    #[test]
    fn update_report_uses_wire_enum_forms() {
        let u = update(
            5,
            BinaryFile::Failed {
                reason: "io".to_string(),
            },
        );
        let report = UpdateReport::from(&u);

        assert_eq!(report.id, 5);
        assert_eq!(report.action, "ADD");
        assert_eq!(report.relationship, "PRIMARY");
    }
}
