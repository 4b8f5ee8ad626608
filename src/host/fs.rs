use crate::host::{FileSystem, FolderListing, HostError};
use crate::safety::VaultGuard;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

const MARKDOWN_EXTENSION: &str = "md";

/// [`FileSystem`] over a directory on disk, confined by a [`VaultGuard`].
#[derive(Debug, Clone)]
pub struct LocalFs {
    guard: VaultGuard,
}

impl LocalFs {
    pub fn new(guard: VaultGuard) -> Self {
        Self { guard }
    }

    pub fn guard(&self) -> &VaultGuard {
        &self.guard
    }
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> Result<String, HostError> {
        let path = self.guard.validate_path(path)?;
        fs::read_to_string(&path).map_err(|source| HostError::Io { path, source })
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), HostError> {
        let path = self.guard.validate_path(path)?;
        atomic_write(&path, content.as_bytes()).map_err(|source| HostError::Io { path, source })
    }

    fn markdown_files(&self, folder: &Path) -> Result<FolderListing, HostError> {
        let folder = self.guard.validate_path(folder)?;

        let mut listing = FolderListing::default();
        for entry in WalkDir::new(&folder) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => {
                    let path = source.path().unwrap_or(folder.as_path()).to_path_buf();
                    warn!(path = %path.display(), error = %source, "skipping unreadable entry");
                    listing.errors.push((path.clone(), HostError::Walk { path, source }));
                    continue;
                }
            };
            if entry.file_type().is_file()
                && entry.path().extension().and_then(|s| s.to_str()) == Some(MARKDOWN_EXTENSION)
                && self.guard.validate_path(entry.path()).is_ok()
            {
                listing.files.push(entry.path().to_path_buf());
            }
        }

        listing.files.sort();
        Ok(listing)
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the file keeps its old content.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Path has no parent directory",
        )
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::SafetyError;
    use std::path::PathBuf;

    fn setup() -> (tempfile::TempDir, LocalFs) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("notes/deep")).unwrap();
        fs::write(dir.path().join("notes/a.md"), "a").unwrap();
        fs::write(dir.path().join("notes/deep/b.md"), "b").unwrap();
        fs::write(dir.path().join("notes/c.txt"), "c").unwrap();
        fs::write(dir.path().join("top.md"), "top").unwrap();
        let local = LocalFs::new(VaultGuard::new(dir.path()).unwrap());
        (dir, local)
    }

    #[test]
    fn test_markdown_files_nested_and_sorted() {
        let (dir, local) = setup();
        let listing = local.markdown_files(&dir.path().join("notes")).unwrap();
        assert!(listing.errors.is_empty());
        let names: Vec<_> = listing
            .files
            .iter()
            .map(|p| p.strip_prefix(local.guard().vault_root()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("notes/a.md"), PathBuf::from("notes/deep/b.md")]
        );
    }

    #[test]
    fn test_markdown_files_missing_folder() {
        let (dir, local) = setup();
        let result = local.markdown_files(&dir.path().join("gone"));
        assert!(matches!(result, Err(HostError::Safety(_))));
    }

    #[test]
    fn test_read_write_roundtrip() {
        let (dir, local) = setup();
        let path = dir.path().join("top.md");
        local.write(&path, "rewritten").unwrap();
        assert_eq!(local.read(&path).unwrap(), "rewritten");
    }

    #[test]
    fn test_read_missing_file() {
        let (dir, local) = setup();
        let result = local.read(&dir.path().join("missing.md"));
        assert!(matches!(
            result,
            Err(HostError::Safety(SafetyError::Canonicalize(_)))
        ));
    }

    #[test]
    fn test_write_outside_vault_rejected() {
        let (_dir, local) = setup();
        let other = tempfile::tempdir().unwrap();
        let path = other.path().join("x.md");
        fs::write(&path, "x").unwrap();

        assert!(local.write(&path, "y").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "x");
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.md");
        fs::write(&path, "original content").unwrap();

        atomic_write(&path, b"modified").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "modified");
    }
}
