//! One-file-per-ruleset storage.
//!
//! Each ruleset lives in `<config-dir>/regex-rulesets/<name>`; the file name
//! is the ruleset's identity and the body is the rule block text.

use crate::host::fs::atomic_write;
use crate::safety::{validate_ruleset_name, SafetyError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Directory under the configuration directory holding ruleset files.
pub const RULESETS_DIR: &str = "regex-rulesets";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("A ruleset named '{0}' already exists")]
    NameExists(String),

    #[error("Ruleset '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    InvalidName(#[from] SafetyError),

    #[error("Ruleset storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Directory-backed ruleset store.
#[derive(Debug, Clone)]
pub struct RulesetStore {
    dir: PathBuf,
}

impl RulesetStore {
    /// Open the store under `config_dir`, creating the directory if needed.
    pub fn open(config_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = config_dir.as_ref().join(RULESETS_DIR);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(io_error(&dir))?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_ruleset_name(name)?;
        Ok(self.dir.join(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_ok_and(|path| path.is_file())
    }

    /// Stored name equal to `name` ignoring case, if any.
    pub fn find_case_insensitive(&self, name: &str) -> Result<Option<String>, StorageError> {
        let wanted = name.to_lowercase();
        Ok(self
            .names()?
            .into_iter()
            .find(|existing| existing.to_lowercase() == wanted))
    }

    /// Names of every stored ruleset, sorted.
    pub fn names(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_error(&self.dir))? {
            let entry = entry.map_err(io_error(&self.dir))?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn read(&self, name: &str) -> Result<String, StorageError> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        fs::read_to_string(&path).map_err(io_error(&path))
    }

    /// Store a new ruleset. Fails without touching anything when a ruleset
    /// with the same name (ignoring case) exists.
    pub fn create(&self, name: &str, content: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        if let Some(existing) = self.find_case_insensitive(name)? {
            return Err(StorageError::NameExists(existing));
        }
        atomic_write(&path, content.as_bytes()).map_err(io_error(&path))?;
        info!(ruleset = name, "ruleset created");
        Ok(())
    }

    /// Replace a ruleset's content, renaming it when `new_name` differs.
    ///
    /// `old_name` must be stored under that exact name, and `new_name` must
    /// not collide (ignoring case) with any other ruleset. The rename writes
    /// the new file first and removes the old one after.
    pub fn update(&self, old_name: &str, new_name: &str, content: &str) -> Result<(), StorageError> {
        let old_path = self.path_for(old_name)?;
        let new_path = self.path_for(new_name)?;

        if !old_path.is_file() {
            return Err(StorageError::NotFound(old_name.to_string()));
        }
        if let Some(existing) = self.find_case_insensitive(new_name)? {
            if existing != old_name {
                return Err(StorageError::NameExists(existing));
            }
        }

        if old_name == new_name {
            atomic_write(&new_path, content.as_bytes()).map_err(io_error(&new_path))?;
            info!(ruleset = new_name, "ruleset updated");
            return Ok(());
        }

        if old_name.to_lowercase() == new_name.to_lowercase() {
            // Case-only rename: both paths may name the same file.
            fs::rename(&old_path, &new_path).map_err(io_error(&new_path))?;
            atomic_write(&new_path, content.as_bytes()).map_err(io_error(&new_path))?;
        } else {
            atomic_write(&new_path, content.as_bytes()).map_err(io_error(&new_path))?;
            fs::remove_file(&old_path).map_err(io_error(&old_path))?;
        }

        info!(from = old_name, to = new_name, "ruleset renamed");
        Ok(())
    }

    /// Remove a ruleset. Returns whether a file was removed.
    pub fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(io_error(&path))?;
        info!(ruleset = name, "ruleset deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, RulesetStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RulesetStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_creates_directory() {
        let (dir, store) = store();
        assert!(dir.path().join(RULESETS_DIR).is_dir());
        assert_eq!(store.dir(), dir.path().join(RULESETS_DIR));
        assert!(store.names().unwrap().is_empty());
    }

    #[test]
    fn test_create_and_read() {
        let (_dir, store) = store();
        store.create("tidy", "\"a\"\n->\n\"b\"").unwrap();
        assert!(store.exists("tidy"));
        assert_eq!(store.read("tidy").unwrap(), "\"a\"\n->\n\"b\"");
        assert_eq!(store.names().unwrap(), vec!["tidy".to_string()]);
    }

    #[test]
    fn test_create_collision_is_case_insensitive() {
        let (_dir, store) = store();
        store.create("Tidy", "original").unwrap();

        let err = store.create("tidy", "replacement").unwrap_err();
        assert!(matches!(err, StorageError::NameExists(ref name) if name == "Tidy"));
        assert_eq!(store.read("Tidy").unwrap(), "original");
    }

    #[test]
    fn test_create_rejects_bad_names() {
        let (_dir, store) = store();
        assert!(matches!(
            store.create("../escape", "x"),
            Err(StorageError::InvalidName(_))
        ));
        assert!(matches!(store.create("", "x"), Err(StorageError::InvalidName(_))));
    }

    #[test]
    fn test_read_missing() {
        let (_dir, store) = store();
        assert!(matches!(store.read("nope"), Err(StorageError::NotFound(_))));
        assert!(!store.exists("nope"));
    }

    #[test]
    fn test_update_in_place() {
        let (_dir, store) = store();
        store.create("tidy", "v1").unwrap();
        store.update("tidy", "tidy", "v2").unwrap();
        assert_eq!(store.read("tidy").unwrap(), "v2");
    }

    #[test]
    fn test_update_rename() {
        let (_dir, store) = store();
        store.create("old", "v1").unwrap();
        store.update("old", "new", "v2").unwrap();
        assert!(!store.exists("old"));
        assert_eq!(store.read("new").unwrap(), "v2");
    }

    #[test]
    fn test_update_case_only_rename() {
        let (_dir, store) = store();
        store.create("tidy", "v1").unwrap();
        store.update("tidy", "Tidy", "v2").unwrap();
        assert_eq!(store.names().unwrap(), vec!["Tidy".to_string()]);
        assert_eq!(store.read("Tidy").unwrap(), "v2");
    }

    #[test]
    fn test_update_rename_collision() {
        let (_dir, store) = store();
        store.create("a", "A").unwrap();
        store.create("b", "B").unwrap();

        let err = store.update("a", "B", "changed").unwrap_err();
        assert!(matches!(err, StorageError::NameExists(_)));
        assert_eq!(store.read("a").unwrap(), "A");
        assert_eq!(store.read("b").unwrap(), "B");
    }

    #[test]
    fn test_update_missing_ruleset() {
        let (_dir, store) = store();
        let err = store.update("ghost", "ghost", "x").unwrap_err();
        assert!(matches!(err, StorageError::NotFound(ref name) if name == "ghost"));
        assert!(!store.exists("ghost"));

        let err = store.update("ghost", "spirit", "x").unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
        assert!(store.names().unwrap().is_empty());
    }

    #[test]
    fn test_update_in_place_keeps_names_unique() {
        let (_dir, store) = store();
        store.create("Tidy", "original").unwrap();

        assert!(store.update("tidy", "tidy", "changed").is_err());
        assert_eq!(store.names().unwrap(), vec!["Tidy".to_string()]);
        assert_eq!(store.read("Tidy").unwrap(), "original");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_dir, store) = store();
        store.create("tidy", "x").unwrap();
        assert!(store.delete("tidy").unwrap());
        assert!(!store.delete("tidy").unwrap());
        assert!(!store.exists("tidy"));
    }
}
