//! Storage of uploaded files and generated artifacts.

use crate::StoreError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File storage rooted at one directory.
///
/// Uploaded files are copied in under a timestamped unique name; generated
/// artifacts (corrected text, batch reports) are written beside them.
pub struct FileStore {
    storage_dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `storage_dir`.
    pub fn new(storage_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.into();
        fs::create_dir_all(&storage_dir)?;
        Ok(Self { storage_dir })
    }

    /// The root directory of this store.
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Copy an external file into the store.
    ///
    /// The stored name is `<DDMMYYYY_HHMMSS>_<5-char-id>_<original-name>`,
    /// so repeated uploads of the same file never collide. Returns the
    /// original display name and the stored path.
    pub fn ingest(&self, source: &Path) -> Result<(String, PathBuf), StoreError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| StoreError::InvalidPath(source.display().to_string()))?
            .to_string_lossy()
            .to_string();

        let timestamp = chrono::Local::now().format("%d%m%Y_%H%M%S");
        let unique_id = uuid::Uuid::new_v4().to_string();
        let stored = self
            .storage_dir
            .join(format!("{}_{}_{}", timestamp, &unique_id[..5], file_name));

        fs::copy(source, &stored)?;
        info!("File uploaded: {}", file_name);
        Ok((file_name, stored))
    }

    /// Persist a corrected-text artifact for an uploaded document.
    ///
    /// Named `corrected_<stem>.txt`; the prefix is what batch enumeration
    /// uses to skip artifacts that are themselves outputs.
    pub fn save_correction(&self, original: &Path, corrected: &str) -> Result<PathBuf, StoreError> {
        let stem = original
            .file_stem()
            .ok_or_else(|| StoreError::InvalidPath(original.display().to_string()))?
            .to_string_lossy();

        let path = self.storage_dir.join(format!("corrected_{}.txt", stem));
        fs::write(&path, corrected)?;
        info!("File created: {}", path.display());
        Ok(path)
    }

    /// Write a batch report under `downloads/` with a timestamped name.
    pub fn save_batch_report(&self, report: &str) -> Result<PathBuf, StoreError> {
        let downloads = self.storage_dir.join("downloads");
        fs::create_dir_all(&downloads)?;

        let path = downloads.join(format!(
            "batch_results_{}.txt",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ));
        fs::write(&path, report)?;
        info!("Batch report saved: {}", path.display());
        Ok(path)
    }

    /// Copy a stored file out to `dest_dir` under its original name.
    ///
    /// The ingestion prefix is stripped from the suggested name when
    /// present.
    pub fn export(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf, StoreError> {
        if !source.exists() {
            return Err(StoreError::InvalidPath(format!(
                "source file does not exist: {}",
                source.display()
            )));
        }
        let name = source
            .file_name()
            .ok_or_else(|| StoreError::InvalidPath(source.display().to_string()))?
            .to_string_lossy()
            .to_string();

        let target = dest_dir.join(strip_ingest_prefix(&name));
        fs::copy(source, &target)?;
        Ok(target)
    }
}

/// Strip the `<DDMMYYYY_HHMMSS>_<5-char-id>_` ingestion prefix, if present.
fn strip_ingest_prefix(name: &str) -> &str {
    let parts: Vec<&str> = name.splitn(4, '_').collect();
    if parts.len() == 4
        && parts[0].len() == 8
        && parts[0].chars().all(|c| c.is_ascii_digit())
        && parts[1].len() == 6
        && parts[1].chars().all(|c| c.is_ascii_digit())
        && parts[2].len() == 5
    {
        parts[3]
    } else {
        name
    }
}
