//! Collaborators supplied by the host application.
//!
//! The pipeline reads and writes text only through these traits, so the
//! same logic drives an in-memory buffer, the local file system, or an
//! embedding editor.

pub mod editor;
pub mod fs;
pub mod notify;

pub use editor::BufferEditor;
pub use fs::LocalFs;
pub use notify::{AutoConfirm, LogNotifier};

use crate::safety::SafetyError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list files under {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Safety(#[from] SafetyError),
}

/// Viewport offset of an editor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub top: f64,
    pub left: f64,
}

/// The active document.
pub trait Editor {
    /// Currently selected text, `None` when nothing is selected.
    fn selection(&self) -> Option<String>;

    /// Whole document text.
    fn value(&self) -> String;

    fn replace_selection(&mut self, text: &str);

    fn set_value(&mut self, text: &str);

    fn scroll_position(&self) -> ScrollPosition;

    fn scroll_to(&mut self, position: ScrollPosition);
}

/// Markdown files found under a folder.
#[derive(Debug, Default)]
pub struct FolderListing {
    /// Files to process, in a stable order
    pub files: Vec<PathBuf>,
    /// Entries the walk could not read; the rest of the folder is still listed
    pub errors: Vec<(PathBuf, HostError)>,
}

/// Text file access.
pub trait FileSystem {
    fn read(&self, path: &Path) -> Result<String, HostError>;

    fn write(&self, path: &Path, content: &str) -> Result<(), HostError>;

    /// Every markdown file nested under `folder`.
    ///
    /// Fails only when `folder` itself is unusable.
    fn markdown_files(&self, folder: &Path) -> Result<FolderListing, HostError>;
}

/// User-facing notices.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Yes/no prompts gating destructive actions.
pub trait Confirmer {
    fn confirm(&self, title: &str, message: &str) -> bool;
}
