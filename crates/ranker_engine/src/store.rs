use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ranker_logging::{ranker_debug, ranker_info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::ProgressRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store directory missing or not writable: {0}")]
    StoreDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode record: {0}")]
    Encode(String),
    #[error("failed to decode record {path:?}: {message}")]
    Decode { path: PathBuf, message: String },
}

/// Ensure the store directory exists; create if missing.
pub fn ensure_store_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StoreError::StoreDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StoreError::StoreDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StoreError::StoreDir(e.to_string()))?;
    }
    Ok(())
}

/// Stable per-identity filename: `{sanitized}--{short_hash(identity)}.ron`.
///
/// The hash keeps identities that sanitize to the same text apart.
pub fn record_filename(identity: &str) -> String {
    let sanitized: String = identity
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .take(40)
        .collect();
    let sanitized = sanitized.trim_matches('_');
    let sanitized = if sanitized.is_empty() { "user" } else { sanitized };
    format!("{sanitized}--{}.ron", short_hash(identity))
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    identity: String,
    record: ProgressRecord,
}

/// One RON file per identity; saving replaces the whole file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load(&self, identity: &str) -> Result<Option<ProgressRecord>, StoreError> {
        let path = self.dir.join(record_filename(identity));
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                ranker_debug!("No saved record at {:?}", path);
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let stored: StoredRecord = ron::from_str(&content).map_err(|err| StoreError::Decode {
            path: path.clone(),
            message: err.to_string(),
        })?;
        if stored.identity != identity {
            return Err(StoreError::Decode {
                path,
                message: "record belongs to another identity".to_string(),
            });
        }
        Ok(Some(stored.record))
    }

    pub fn save(&self, identity: &str, record: &ProgressRecord) -> Result<PathBuf, StoreError> {
        let stored = StoredRecord {
            identity: identity.to_string(),
            record: record.clone(),
        };
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&stored, pretty)
            .map_err(|err| StoreError::Encode(err.to_string()))?;
        ensure_store_dir(&self.dir)?;

        // Readers see either the old record or the new one, never a partial file.
        let path = self.dir.join(record_filename(identity));
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&path).map_err(|err| StoreError::Io(err.error))?;

        ranker_info!("Saved {:?} record to {:?}", record.status, path);
        Ok(path)
    }
}
