//! File-backed key/value store with browser local-storage semantics.
//!
//! Values are strings keyed by name, kept in one JSON object on disk. The
//! store is a best-effort cache: a missing or corrupt file reads as empty,
//! and write failures are returned for the caller to log.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use grimoire_core::contact::{ContactSubmission, SUBMISSIONS_KEY};
use grimoire_core::theme::{Theme, THEME_KEY};
use grimoire_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Local store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Local store encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Local store unreadable");
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Local store corrupt, starting empty");
            BTreeMap::new()
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<(), StoreError> {
        let mut entries = self.read_all();
        entries.insert(key.to_string(), value.into());
        self.write_all(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all();
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    // ---- typed keys ----

    /// All stored contact submissions, oldest first.
    pub fn submissions(&self) -> Vec<ContactSubmission> {
        self.get(SUBMISSIONS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Append a submission and return the new total.
    pub fn append_submission(&self, submission: ContactSubmission) -> Result<usize, StoreError> {
        let mut all = self.submissions();
        all.push(submission);
        self.set(SUBMISSIONS_KEY, serde_json::to_string(&all)?)?;
        Ok(all.len())
    }

    /// The saved theme, ignoring unrecognized values.
    pub fn theme(&self) -> Option<Theme> {
        self.get(THEME_KEY).and_then(|raw| raw.parse().ok())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), StoreError> {
        self.set(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn submission(name: &str) -> ContactSubmission {
        ContactSubmission {
            name: name.into(),
            email: format!("{}@hogwarts.ac.uk", name.to_lowercase()),
            house: "Hufflepuff".into(),
            message: "Hello from the kitchens".into(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("store.json"));
        assert!(store.get("anything").is_none());
        assert!(store.submissions().is_empty());
        assert!(store.theme().is_none());
    }

    #[test]
    fn set_get_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("nested/store.json"));
        store.set("greeting", "mischief managed").unwrap();
        assert_eq!(store.get("greeting").as_deref(), Some("mischief managed"));
        store.remove("greeting").unwrap();
        assert!(store.get("greeting").is_none());
    }

    #[test]
    fn corrupt_file_reads_empty_and_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = LocalStore::open(&path);
        assert!(store.get("theme").is_none());
        store.set_theme(Theme::Dark).unwrap();
        assert_eq!(store.theme(), Some(Theme::Dark));
    }

    #[test]
    fn submissions_are_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("store.json"));

        assert_eq!(store.append_submission(submission("Cedric")).unwrap(), 1);
        assert_eq!(store.append_submission(submission("Hannah")).unwrap(), 2);

        let names: Vec<String> = store.submissions().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Cedric", "Hannah"]);
    }

    #[test]
    fn unknown_theme_value_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("store.json"));
        store.set(THEME_KEY, "sepia").unwrap();
        assert!(store.theme().is_none());
    }
}
