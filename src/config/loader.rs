use crate::config::schema::Settings;
use crate::host::fs::atomic_write;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the persisted settings under the configuration directory.
pub const SETTINGS_FILE: &str = "data.json";

#[derive(Debug)]
pub enum SettingsError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
}

impl SettingsError {
    fn with_path(self, path: &Path) -> Self {
        match self {
            SettingsError::Json { path: None, source } => SettingsError::Json {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io { path, source } => {
                write!(f, "failed to access settings at {}: {}", path.display(), source)
            }
            SettingsError::Json { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse settings JSON ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse settings JSON: {}", source),
            },
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io { source, .. } => Some(source),
            SettingsError::Json { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<Settings, SettingsError> {
    serde_json::from_str(input).map_err(|source| SettingsError::Json { path: None, source })
}

/// Load settings from `path`; a missing file yields the defaults.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

pub fn save_to_path(settings: &Settings, path: impl AsRef<Path>) -> Result<(), SettingsError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Json {
        path: Some(path.to_path_buf()),
        source,
    })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    atomic_write(path, json.as_bytes()).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
