use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::io::vault::{BlobCipher, VaultError};
use crate::model::chat::ChatMessage;
use crate::model::document::Document;
use crate::model::folder::Folder;
use crate::model::project::Project;
use crate::model::settings::Settings;
use crate::model::store::Store;

/// Name of the data directory discovered by walking up from cwd
pub const DATA_DIR_NAME: &str = "folio";
/// The sealed store blob inside it
pub const BLOB_FILE: &str = "folio.dat";
/// Plaintext dump written when a blob write fails, so committed in-memory
/// changes survive until the user can retry or export
pub const RESCUE_FILE: &str = ".rescue.json";

/// Error type for the persistence gateway. Nothing here is fatal: on a
/// failed save the in-memory store is intact and a rescue dump was
/// attempted.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("not a folio data directory: no {DATA_DIR_NAME}/ found")]
    NotADataDir,
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("stored data is unreadable: {0}")]
    Corrupt(String),
}

impl From<VaultError> for PersistenceError {
    fn from(e: VaultError) -> Self {
        PersistenceError::Corrupt(e.to_string())
    }
}

/// The persisted shape: whole-store snapshot plus format metadata. Every
/// collection defaults so a partial file (or an older version) loads with
/// the missing keys empty.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveFile {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
    #[serde(default = "current_version")]
    pub version: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

fn current_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl SaveFile {
    pub fn from_store(store: &Store) -> Self {
        SaveFile {
            projects: store.projects.clone(),
            documents: store.documents.clone(),
            folders: store.folders.clone(),
            settings: store.settings.clone(),
            chat_history: store.chat_history.clone(),
            version: current_version(),
            timestamp: Utc::now(),
        }
    }

    /// Rebuild a store, reseating the id allocator past every imported id
    pub fn into_store(self) -> Store {
        let mut store = Store {
            projects: self.projects,
            folders: self.folders,
            documents: self.documents,
            settings: self.settings,
            chat_history: self.chat_history,
            ..Store::new()
        };
        store.reseat_allocator();
        store
    }
}

/// Write `content` to `path` atomically via temp file + rename
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Walk up from `start` looking for a `folio/` directory holding a blob or
/// settings file.
pub fn discover_data_dir(start: &Path) -> Result<PathBuf, PersistenceError> {
    let mut current = start.to_path_buf();
    loop {
        let dir = current.join(DATA_DIR_NAME);
        if dir.is_dir() && (dir.join(BLOB_FILE).exists() || dir.join("settings.toml").exists()) {
            return Ok(dir);
        }
        if !current.pop() {
            return Err(PersistenceError::NotADataDir);
        }
    }
}

/// Create a fresh data directory with an empty sealed store
pub fn init_data_dir(root: &Path, cipher: &dyn BlobCipher) -> Result<PathBuf, PersistenceError> {
    let dir = root.join(DATA_DIR_NAME);
    fs::create_dir_all(&dir).map_err(|e| PersistenceError::Write {
        path: dir.clone(),
        source: e,
    })?;
    let store = Store::new();
    save_store(&dir, &store, cipher)?;
    Ok(dir)
}

/// Serialize, seal, and atomically write the whole store. On write failure
/// the plaintext JSON is dumped to the rescue file first, then the error
/// surfaces (non-fatally) to the caller.
pub fn save_store(
    data_dir: &Path,
    store: &Store,
    cipher: &dyn BlobCipher,
) -> Result<(), PersistenceError> {
    let save = SaveFile::from_store(store);
    let json = serde_json::to_vec(&save).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
    let sealed = cipher.seal(&json);

    let path = data_dir.join(BLOB_FILE);
    if let Err(e) = atomic_write(&path, &sealed) {
        let rescue = data_dir.join(RESCUE_FILE);
        let _ = atomic_write(&rescue, &json);
        return Err(PersistenceError::Write { path, source: e });
    }
    Ok(())
}

/// Read, unseal, and parse the store blob. A missing blob is an empty
/// store, not an error.
pub fn load_store(data_dir: &Path, cipher: &dyn BlobCipher) -> Result<Store, PersistenceError> {
    let path = data_dir.join(BLOB_FILE);
    if !path.exists() {
        return Ok(Store::new());
    }
    let sealed = fs::read(&path).map_err(|e| PersistenceError::Read {
        path: path.clone(),
        source: e,
    })?;
    let json = cipher.open(&sealed)?;
    let save: SaveFile =
        serde_json::from_slice(&json).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
    Ok(save.into_store())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::vault::Base64Armor;
    use crate::model::document::DocKind;
    use crate::ops::document_ops::{DocumentFields, create_document};
    use crate::ops::project_ops::{ProjectFields, create_project};
    use tempfile::TempDir;

    fn sample_store() -> Store {
        let mut store = Store::new();
        let pid = create_project(
            &mut store,
            ProjectFields {
                title: "Novel".into(),
                ..Default::default()
            },
        )
        .unwrap();
        create_document(
            &mut store,
            pid,
            None,
            DocumentFields {
                title: "Chapter 1".into(),
                kind: DocKind::Chapter,
            },
        )
        .unwrap();
        store
    }

    #[test]
    fn save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let cipher = Base64Armor;
        let store = sample_store();

        save_store(tmp.path(), &store, &cipher).unwrap();
        let loaded = load_store(tmp.path(), &cipher).unwrap();

        assert_eq!(loaded.projects.len(), 1);
        assert_eq!(loaded.projects[0].title, "Novel");
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.documents[0].kind, DocKind::Chapter);
    }

    #[test]
    fn blob_on_disk_is_sealed_not_plaintext() {
        let tmp = TempDir::new().unwrap();
        let store = sample_store();
        save_store(tmp.path(), &store, &Base64Armor).unwrap();

        let raw = fs::read_to_string(tmp.path().join(BLOB_FILE)).unwrap();
        assert!(!raw.contains("Novel"));
        assert!(!raw.contains("projects"));
    }

    #[test]
    fn missing_blob_loads_empty_store() {
        let tmp = TempDir::new().unwrap();
        let loaded = load_store(tmp.path(), &Base64Armor).unwrap();
        assert!(loaded.projects.is_empty());
        assert!(loaded.documents.is_empty());
    }

    #[test]
    fn corrupt_blob_is_reported_not_fatal() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(BLOB_FILE), "not armor at all !!!").unwrap();
        let result = load_store(tmp.path(), &Base64Armor);
        assert!(matches!(result, Err(PersistenceError::Corrupt(_))));
    }

    #[test]
    fn partial_save_file_defaults_missing_keys() {
        let save: SaveFile = serde_json::from_str(r#"{"projects":[]}"#).unwrap();
        assert!(save.documents.is_empty());
        assert!(save.folders.is_empty());
        assert!(save.chat_history.is_empty());
        assert_eq!(save.settings.highlight_color, "#fff59d");
    }

    #[test]
    fn loaded_store_allocates_past_imported_ids() {
        let tmp = TempDir::new().unwrap();
        let store = sample_store();
        let max_id = store.documents[0].id.max(store.projects[0].id);
        save_store(tmp.path(), &store, &Base64Armor).unwrap();

        let mut loaded = load_store(tmp.path(), &Base64Armor).unwrap();
        assert!(loaded.allocate_id() > max_id);
    }

    #[test]
    fn discover_walks_up_from_nested_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = init_data_dir(tmp.path(), &Base64Armor).unwrap();
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(discover_data_dir(&nested).unwrap(), dir);
    }

    #[test]
    fn discover_fails_outside_any_data_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_data_dir(tmp.path()),
            Err(PersistenceError::NotADataDir)
        ));
    }

    #[test]
    fn atomic_write_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("f.txt");
        atomic_write(&path, b"one").unwrap();
        atomic_write(&path, b"two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }
}
