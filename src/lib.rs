//! Regex Pipeline: named regex rulesets applied to text
//!
//! A ruleset is an ordered list of search/replace rules stored as a small
//! text file. Rules run in sequence, each on the output of the previous
//! one, against an editor buffer, a single file, or every markdown file
//! under a folder.
//!
//! # Architecture
//!
//! - [`parser`] turns ruleset text into [`Rule`]s and back.
//! - [`engine`] applies rules through an injected [`RegexEngine`].
//! - [`pipeline`] owns storage, settings and the application surfaces.
//! - [`host`] holds the traits the pipeline reads and writes through.
//!
//! # Ruleset format
//!
//! ```text
//! "(\w+)@(\w+)"g
//! ->
//! "$2@$1"
//!
//! "\s+$"gm
//! ->
//! ""x
//! ```
//!
//! The trailing `x` makes the second rule delete its matches.
//!
//! # Example
//!
//! ```
//! use regex_pipeline::RuleEngine;
//!
//! let ruleset = "\"(\\w+)@(\\w+)\"g\n->\n\"$2@$1\"";
//! let result = RuleEngine::new().process_regex("alice@wonderland", "swap", ruleset);
//!
//! assert_eq!(result.content, "wonderland@alice");
//! assert_eq!(result.count, 1);
//! ```

pub mod cache;
pub mod commands;
pub mod config;
pub mod engine;
pub mod form;
pub mod host;
pub mod messages;
pub mod parser;
pub mod pipeline;
pub mod rule;
pub mod safety;
pub mod storage;

// Re-exports
pub use commands::{CommandHandle, CommandRegistry};
pub use config::{Settings, SettingsError};
pub use engine::{ApplicationResult, NativeRegexEngine, RegexEngine, RegexError, RuleEngine};
pub use form::{FormError, FormField, RuleForm};
pub use host::{
    AutoConfirm, BufferEditor, Confirmer, Editor, FileSystem, FolderListing, HostError, LocalFs,
    LogNotifier, Notifier, ScrollPosition,
};
pub use parser::{parse_all, parse_first, serialize, serialize_all};
pub use pipeline::{BatchReport, PipelineError, RegexPipeline, RulesetEvent};
pub use rule::{Rule, RuleMode};
pub use safety::{SafetyError, VaultGuard};
pub use storage::{RulesetStore, StorageError};
