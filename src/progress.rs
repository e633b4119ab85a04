//! Persisted progress of an unfinished run.
//!
//! `load` never fails: anything unreadable is reported as "no saved
//! progress". `save` always rewrites the whole snapshot.

use crate::error::ProgressError;
use crate::models::ProgressSnapshot;
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROGRESS_FILE: &str = "progress.json";

pub trait ProgressStore {
    fn load(&mut self) -> Option<ProgressSnapshot>;
    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<(), ProgressError>;
    fn clear(&mut self) -> Result<(), ProgressError>;
}

impl<T: ProgressStore + ?Sized> ProgressStore for Box<T> {
    fn load(&mut self) -> Option<ProgressSnapshot> {
        (**self).load()
    }

    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<(), ProgressError> {
        (**self).save(snapshot)
    }

    fn clear(&mut self) -> Result<(), ProgressError> {
        (**self).clear()
    }
}

/// Shared parsing for stores that keep the snapshot as JSON text.
pub fn decode_snapshot(raw: &str) -> Option<ProgressSnapshot> {
    match serde_json::from_str::<ProgressSnapshot>(raw) {
        Ok(mut snapshot) if snapshot.is_consistent() => {
            snapshot.trim_unattempted();
            Some(snapshot)
        }
        Ok(snapshot) => {
            warn!(
                "Ignoring saved progress: {} answers for {} questions",
                snapshot.user_answers.len(),
                snapshot.questions.len()
            );
            None
        }
        Err(e) => {
            warn!("Ignoring unreadable saved progress: {}", e);
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_PROGRESS_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&mut self) -> Option<ProgressSnapshot> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode_snapshot(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Cannot read {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<(), ProgressError> {
        let data = serde_json::to_string(snapshot)?;
        let tmp = self.temp_path();
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        debug!(
            "Saved progress: {}/{} answered",
            snapshot.answered_count(),
            snapshot.questions.len()
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ProgressError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the snapshot in memory, round-tripped through JSON so it behaves
/// like the file store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Option<String>,
    pub saves: usize,
    pub fail_saves: bool,
    pub fail_clears: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: &ProgressSnapshot) -> Result<Self, ProgressError> {
        Ok(Self {
            data: Some(serde_json::to_string(snapshot)?),
            ..Self::default()
        })
    }

    pub fn with_raw(raw: &str) -> Self {
        Self {
            data: Some(raw.to_string()),
            ..Self::default()
        }
    }

    pub fn peek(&self) -> Option<ProgressSnapshot> {
        self.data.as_deref().and_then(decode_snapshot)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }
}

impl ProgressStore for InMemoryStore {
    fn load(&mut self) -> Option<ProgressSnapshot> {
        self.peek()
    }

    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<(), ProgressError> {
        if self.fail_saves {
            return Err(ProgressError::Io(std::io::Error::other("save disabled")));
        }
        self.data = Some(serde_json::to_string(snapshot)?);
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ProgressError> {
        if self.fail_clears {
            return Err(ProgressError::Io(std::io::Error::other("clear disabled")));
        }
        self.data = None;
        Ok(())
    }
}
