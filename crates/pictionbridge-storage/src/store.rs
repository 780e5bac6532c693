use std::path::{Path, PathBuf};

use pictionbridge_core::models::BinaryFile;
use pictionbridge_core::BridgeError;
use tokio::fs;

/// Subdirectory of the work path under which extraction directories are created.
pub const BINARY_DIR: &str = "binaries";

/// Filesystem store for extracted update binaries.
#[derive(Clone, Debug)]
pub struct BinaryStore {
    binaries_path: PathBuf,
}

impl BinaryStore {
    /// Create a store rooted at `<work_path>/binaries/`, creating the
    /// directory eagerly. Failure here is fatal: the component must not
    /// proceed in a state where extraction cannot succeed.
    pub async fn new(work_path: impl Into<PathBuf>) -> Result<Self, BridgeError> {
        let binaries_path = work_path.into().join(BINARY_DIR);

        fs::create_dir_all(&binaries_path).await.map_err(|e| {
            tracing::error!(
                path = %binaries_path.display(),
                error = %e,
                "failed to create work directory"
            );
            BridgeError::WorkDir {
                path: binaries_path.clone(),
                source: e,
            }
        })?;

        Ok(BinaryStore { binaries_path })
    }

    /// Extraction directory for one update: `<work>/binaries/<id>/`.
    ///
    /// Only the numeric id is used as the path component, never the
    /// externally-supplied filename or other metadata.
    pub fn update_dir(&self, id: i64) -> PathBuf {
        self.binaries_path.join(id.to_string())
    }

    /// Materialize one update's blob as `<work>/binaries/<id>/<filename>`.
    ///
    /// A pre-existing target file is overwritten (last-write-wins) after a
    /// warning. A byte count differing from `declared_size` is logged but the
    /// file is kept as written. Stream I/O failures degrade to
    /// [`BinaryFile::Failed`]; only a directory-creation failure is returned
    /// as an error and aborts the batch in flight.
    pub async fn extract(
        &self,
        id: i64,
        filename: &str,
        declared_size: i64,
        data: &[u8],
    ) -> Result<BinaryFile, BridgeError> {
        let dir = self.update_dir(id);

        fs::create_dir_all(&dir).await.map_err(|e| {
            tracing::error!(
                update.id = id,
                path = %dir.display(),
                error = %e,
                "failed to create extraction directory"
            );
            BridgeError::WorkDir {
                path: dir.clone(),
                source: e,
            }
        })?;

        let target = dir.join(filename);

        tracing::debug!(
            update.id = id,
            path = %target.display(),
            "extracting binary"
        );

        if fs::try_exists(&target).await.unwrap_or(false) {
            tracing::warn!(
                update.id = id,
                path = %target.display(),
                "binary file exists and will be overwritten"
            );
        }

        match write_binary(&target, data).await {
            Ok(bytes_written) => {
                if declared_size < 0 || bytes_written != declared_size as u64 {
                    tracing::warn!(
                        update.id = id,
                        expected = declared_size,
                        found = bytes_written,
                        "binary has incorrect size"
                    );
                }
                Ok(BinaryFile::Extracted {
                    path: target,
                    bytes_written,
                })
            }
            Err(e) => {
                tracing::error!(
                    update.id = id,
                    path = %target.display(),
                    error = %e,
                    "error extracting binary"
                );
                Ok(BinaryFile::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Stream-copy `data` into `target`, returning the number of bytes written.
/// The file handle is released on every path before returning.
async fn write_binary(target: &Path, data: &[u8]) -> std::io::Result<u64> {
    let mut file = fs::File::create(target).await?;
    let mut reader = data;
    let bytes_copied = tokio::io::copy(&mut reader, &mut file).await?;
    file.sync_all().await?;
    Ok(bytes_copied)
}
