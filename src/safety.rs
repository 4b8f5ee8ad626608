use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Boundary checks for files touched by rule application.
///
/// Rules only ever rewrite files inside the vault root, and never files
/// under the forbidden directories (the ruleset store, VCS metadata).
#[derive(Debug, Clone)]
pub struct VaultGuard {
    /// Absolute, canonical vault root
    vault_root: PathBuf,
    /// Canonical paths that must never be rewritten
    forbidden_paths: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("Path is outside vault: {path} (vault: {vault})")]
    OutsideVault { path: PathBuf, vault: PathBuf },

    #[error("Path is in forbidden directory: {path} (forbidden: {forbidden})")]
    ForbiddenPath { path: PathBuf, forbidden: PathBuf },

    #[error("Invalid ruleset name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

impl VaultGuard {
    /// Create a guard rooted at `vault_root`.
    ///
    /// The root is canonicalized so symlinks cannot be used to escape it.
    pub fn new(vault_root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        let vault_root = vault_root.as_ref().canonicalize()?;

        let mut forbidden_paths = Vec::new();
        if let Ok(git_dir) = vault_root.join(".git").canonicalize() {
            forbidden_paths.push(git_dir);
        }

        Ok(Self {
            vault_root,
            forbidden_paths,
        })
    }

    /// Add a directory whose files must never be rewritten.
    ///
    /// Directories that do not exist yet are ignored.
    pub fn forbid(mut self, path: impl AsRef<Path>) -> Self {
        if let Ok(canonical) = path.as_ref().canonicalize() {
            self.forbidden_paths.push(canonical);
        }
        self
    }

    /// Check that a path is safe to read or rewrite.
    ///
    /// Relative paths resolve against the vault root. Returns the
    /// canonical absolute path.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.vault_root.join(path)
        };

        let canonical = absolute.canonicalize()?;
        self.check_canonical(&canonical)?;
        Ok(canonical)
    }

    fn check_canonical(&self, canonical: &Path) -> Result<(), SafetyError> {
        if !canonical.starts_with(&self.vault_root) {
            return Err(SafetyError::OutsideVault {
                path: canonical.to_path_buf(),
                vault: self.vault_root.clone(),
            });
        }

        for forbidden in &self.forbidden_paths {
            if canonical.starts_with(forbidden) {
                return Err(SafetyError::ForbiddenPath {
                    path: canonical.to_path_buf(),
                    forbidden: forbidden.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn vault_root(&self) -> &Path {
        &self.vault_root
    }
}

/// Check that `name` can be used as a ruleset file name.
pub fn validate_ruleset_name(name: &str) -> Result<(), SafetyError> {
    let invalid = |reason| SafetyError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(invalid("name contains a path separator"));
    }
    match Path::new(name).components().next() {
        Some(Component::Normal(_)) => Ok(()),
        _ => Err(invalid("name is a reserved path component")),
    }
}
