use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use notifier_core::{FeedCursor, ProgressItem};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The slot exists but cannot be interpreted; manual recovery required.
    #[error("state slot '{slot}' is corrupt: {message}")]
    Corrupt { slot: String, message: String },
    #[error("could not encode state for slot '{slot}': {message}")]
    Encode { slot: String, message: String },
    #[error("state directory missing or not writable: {0}")]
    StateDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Load/persist named state slots.
///
/// These are the run controller's only touch points for cross-run state:
/// read once at run start, written at most once at run end.
pub trait StateStore: Send + Sync {
    /// Previous progress snapshot, or the empty set on first run.
    fn load_progress(&self, slot: &str) -> Result<Vec<ProgressItem>, StoreError>;

    fn save_progress(&self, slot: &str, items: &[ProgressItem]) -> Result<(), StoreError>;

    /// Last fully-processed feed id, or `None` when the slot has never been
    /// seeded. The caller decides whether an absent cursor is acceptable.
    fn load_cursor(&self, slot: &str) -> Result<Option<FeedCursor>, StoreError>;

    fn save_cursor(&self, slot: &str, cursor: FeedCursor) -> Result<(), StoreError>;
}

/// Directory-backed store with one file per named slot.
///
/// Progress slots hold the full previous snapshot as JSON; feed slots hold a
/// single decimal cursor. Loads tolerate a missing file, saves go through a
/// temp-file-then-rename so a crash never leaves a torn state file.
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{slot}.{extension}"))
    }

    fn write_atomic(&self, filename: &str, content: &str) -> Result<(), StoreError> {
        self.ensure_state_dir()?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }

    fn ensure_state_dir(&self) -> Result<(), StoreError> {
        if self.dir.exists() {
            let meta =
                fs::metadata(&self.dir).map_err(|err| StoreError::StateDir(err.to_string()))?;
            if !meta.is_dir() {
                return Err(StoreError::StateDir("path is not a directory".into()));
            }
        } else {
            fs::create_dir_all(&self.dir).map_err(|err| StoreError::StateDir(err.to_string()))?;
        }
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load_progress(&self, slot: &str) -> Result<Vec<ProgressItem>, StoreError> {
        let path = self.slot_path(slot, "json");
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::Io(err)),
        };

        serde_json::from_str(&content).map_err(|err| StoreError::Corrupt {
            slot: slot.to_string(),
            message: err.to_string(),
        })
    }

    fn save_progress(&self, slot: &str, items: &[ProgressItem]) -> Result<(), StoreError> {
        let content = serde_json::to_string(items).map_err(|err| StoreError::Encode {
            slot: slot.to_string(),
            message: err.to_string(),
        })?;
        self.write_atomic(&format!("{slot}.json"), &content)
    }

    fn load_cursor(&self, slot: &str) -> Result<Option<FeedCursor>, StoreError> {
        let path = self.slot_path(slot, "cursor");
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Io(err)),
        };

        content
            .parse::<FeedCursor>()
            .map(Some)
            .map_err(|err| StoreError::Corrupt {
                slot: slot.to_string(),
                message: err.to_string(),
            })
    }

    fn save_cursor(&self, slot: &str, cursor: FeedCursor) -> Result<(), StoreError> {
        self.write_atomic(&format!("{slot}.cursor"), &cursor.to_string())
    }
}
