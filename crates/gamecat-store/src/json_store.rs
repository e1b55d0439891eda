//! Whole-file JSON persistence with atomic replace

use crate::{GameRecord, StoreError, StoreOp};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The catalog file on disk
#[derive(Debug, Clone)]
pub struct GameStore {
    path: PathBuf,
}

impl GameStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. A missing file is an empty catalog.
    pub fn load(&self) -> Result<Vec<GameRecord>, StoreError> {
        if !self.path.exists() {
            tracing::debug!("{} does not exist yet, catalog is empty", self.path.display());
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| {
            tracing::error!("Failed to read {}: {}", self.path.display(), source);
            StoreError::io(StoreOp::Read, &self.path, source)
        })?;

        let records: Vec<GameRecord> = serde_json::from_str(&contents).map_err(|source| {
            tracing::error!("{} is not a valid catalog: {}", self.path.display(), source);
            StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        tracing::debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Replace the file contents with `records`.
    ///
    /// The new contents go to a sibling temp file which is then renamed over
    /// the catalog, so readers see either the old list or the new one.
    pub fn save(&self, records: &[GameRecord]) -> Result<(), StoreError> {
        let mut json = serde_json::to_string_pretty(records).map_err(|source| {
            StoreError::io(StoreOp::Write, &self.path, std::io::Error::other(source))
        })?;
        json.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| {
                tracing::error!("Failed to create {}: {}", parent.display(), source);
                StoreError::io(StoreOp::CreateDir, parent, source)
            })?;
        }

        let temp_path = self.temp_path();
        if let Err(err) = write_synced(&temp_path, json.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            tracing::error!("Failed to write {}: {}", temp_path.display(), err);
            return Err(StoreError::io(StoreOp::Write, &temp_path, err));
        }

        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            tracing::error!(
                "Failed to move {} into place at {}: {}",
                temp_path.display(),
                self.path.display(),
                err
            );
            return Err(StoreError::io(StoreOp::Rename, &self.path, err));
        }

        // Make the rename itself durable
        if let Err(err) = sync_parent_dir(&self.path) {
            tracing::error!("Failed to sync directory of {}: {}", self.path.display(), err);
            return Err(StoreError::io(StoreOp::Sync, &self.path, err));
        }

        tracing::debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Whether the catalog file (or its directory, before first write) accepts writes
    pub fn is_writable(&self) -> bool {
        let target = if self.path.exists() {
            self.path.as_path()
        } else {
            match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                Some(parent) => parent,
                None => Path::new("."),
            }
        };

        fs::metadata(target)
            .map(|meta| !meta.permissions().readonly())
            .unwrap_or(false)
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "games.json".to_string());
        let unique = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.path
            .with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), unique))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent() {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            fs::File::open(parent)?.sync_all()?;
        }
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<GameRecord> {
        vec![
            GameRecord::new("Pong", "/games/pong/cover.png").with_description("classic"),
            GameRecord::new("Space Rocks", "/games/space-rocks/cover.png")
                .with_url("https://x.test/games/space-rocks/index.html"),
        ]
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = GameStore::new(temp_dir.path().join("games.json"));
        assert!(store.load().unwrap().is_empty());
        // Loading never creates the file
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = GameStore::new(temp_dir.path().join("games.json"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let store = GameStore::new(temp_dir.path().join("data").join("games.json"));

        store.save(&[]).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap().trim(), "[]");
    }

    #[test]
    fn test_save_load_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = GameStore::new(temp_dir.path().join("games.json"));
        store.save(&sample()).unwrap();
        let first = fs::read(store.path()).unwrap();

        let loaded = store.load().unwrap();
        store.save(&loaded).unwrap();

        assert_eq!(fs::read(store.path()).unwrap(), first);
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = GameStore::new(temp_dir.path().join("games.json"));
        store.save(&sample()).unwrap();
        store.save(&sample()[..1]).unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_invalid_json_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("games.json");
        fs::write(&path, "[{\"title\": \"Pong\",").unwrap();

        let err = GameStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("games.json");

        for content in [r#"{"title":"Pong"}"#, r#"["Pong"]"#, r#"[{"title":"Pong"}]"#] {
            fs::write(&path, content).unwrap();
            let err = GameStore::new(&path).load().unwrap_err();
            assert!(
                matches!(err, StoreError::Corrupt { .. }),
                "expected corrupt for {content}"
            );
        }
    }

    #[test]
    fn test_empty_array_loads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("games.json");
        fs::write(&path, "[]").unwrap();
        assert!(GameStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_save_under_a_file_fails_cleanly() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let store = GameStore::new(blocker.join("games.json"));

        let err = store.save(&sample()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(err.path(), blocker.as_path());

        // Nothing was written next to the blocker, and the blocker is intact
        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("blocker")]);
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_sync_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("games.json");
        fs::write(&path, "[]").unwrap();
        sync_parent_dir(&path).unwrap();
        sync_parent_dir(Path::new("games.json")).unwrap();
    }

    #[test]
    fn test_writable_before_first_save() {
        let temp_dir = TempDir::new().unwrap();
        let store = GameStore::new(temp_dir.path().join("games.json"));
        assert!(store.is_writable());
    }
}
