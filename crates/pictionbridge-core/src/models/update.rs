use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

/// Kind of change a pending update represents. Wire values are defined by the
/// Piction integration; anything else is preserved as [`UpdateAction::Unrecognized`]
/// rather than dropped, so the raw value stays available for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateAction {
    Add,
    Replace,
    Delete,
    Unrecognized(String),
}

impl UpdateAction {
    /// Never fails; unknown values land in `Unrecognized`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "ADD" => UpdateAction::Add,
            "REPLACE" => UpdateAction::Replace,
            "DELETE" => UpdateAction::Delete,
            other => UpdateAction::Unrecognized(other.to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, UpdateAction::Unrecognized(_))
    }
}

impl Display for UpdateAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UpdateAction::Add => write!(f, "ADD"),
            UpdateAction::Replace => write!(f, "REPLACE"),
            UpdateAction::Delete => write!(f, "DELETE"),
            UpdateAction::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}

/// Relationship between the media and its object in the downstream archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateRelationship {
    Primary,
    Alternate,
    Unrecognized(String),
}

impl UpdateRelationship {
    /// Never fails; unknown values land in `Unrecognized`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PRIMARY" => UpdateRelationship::Primary,
            "ALTERNATE" => UpdateRelationship::Alternate,
            other => UpdateRelationship::Unrecognized(other.to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, UpdateRelationship::Unrecognized(_))
    }
}

impl Display for UpdateRelationship {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UpdateRelationship::Primary => write!(f, "PRIMARY"),
            UpdateRelationship::Alternate => write!(f, "ALTERNATE"),
            UpdateRelationship::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}

/// Outcome of materializing an update's blob to disk.
///
/// A failed extraction keeps the update in the batch; callers inspect this
/// field instead of relying on an error to detect per-row problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BinaryFile {
    Extracted { path: PathBuf, bytes_written: u64 },
    Failed { reason: String },
}

impl BinaryFile {
    pub fn path(&self) -> Option<&Path> {
        match self {
            BinaryFile::Extracted { path, .. } => Some(path),
            BinaryFile::Failed { .. } => None,
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self, BinaryFile::Extracted { .. })
    }
}

/// One pending change record from the interface table.
///
/// Constructed fresh per poll and transient: it lives for one processing cycle
/// in the caller, after which the backing row is expected to be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    /// Backing-row primary key; also names the extraction directory.
    pub id: i64,
    pub piction_id: i32,
    pub filename: String,
    pub mime_type: String,
    /// Declared byte length of the blob, used only for integrity verification.
    pub img_size: i32,
    pub img_height: i32,
    pub img_width: i32,
    pub object_csid: Option<String>,
    pub media_csid: Option<String>,
    pub blob_csid: Option<String>,
    pub action: UpdateAction,
    pub relationship: UpdateRelationship,
    pub date_time_added_to_piction: DateTime<Utc>,
    pub date_time_uploaded: DateTime<Utc>,
    pub binary: BinaryFile,
}
