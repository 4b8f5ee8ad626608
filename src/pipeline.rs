//! Ruleset lifecycle and the application surfaces.
//!
//! [`RegexPipeline`] ties the ruleset store, the persisted settings and the
//! rule engine together:
//! - create / update / delete rulesets, keeping the settings list in sync
//! - track the default ruleset by name, re-validated on every use
//! - apply a ruleset to an editor buffer, a file, or every markdown file
//!   under a folder
//!
//! Lifecycle changes are returned as [`RulesetEvent`]s so the surrounding
//! application can keep its own registrations (see [`crate::commands`]).

use crate::config::{self, Settings, SettingsError, SETTINGS_FILE};
use crate::engine::{ApplicationResult, NativeRegexEngine, RegexEngine, RuleEngine};
use crate::form::{FormError, RuleForm};
use crate::host::{AutoConfirm, Confirmer, Editor, FileSystem, HostError, LogNotifier, Notifier};
use crate::messages;
use crate::parser;
use crate::rule::Rule;
use crate::storage::{RulesetStore, StorageError};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("A ruleset named '{0}' already exists")]
    NameExists(String),

    #[error("Ruleset '{0}' not found")]
    NotFound(String),

    #[error("No default ruleset is set")]
    NoDefault,

    #[error("Folder run cancelled")]
    Cancelled,

    #[error(transparent)]
    InvalidForm(#[from] FormError),

    #[error(transparent)]
    Storage(StorageError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Host(#[from] HostError),
}

impl From<StorageError> for PipelineError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NameExists(name) => PipelineError::NameExists(name),
            StorageError::NotFound(name) => PipelineError::NotFound(name),
            other => PipelineError::Storage(other),
        }
    }
}

/// Ruleset lifecycle change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesetEvent {
    Added(String),
    Updated(String),
    Renamed { from: String, to: String },
    Removed(String),
}

impl fmt::Display for RulesetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesetEvent::Added(name) => write!(f, "added '{name}'"),
            RulesetEvent::Updated(name) => write!(f, "updated '{name}'"),
            RulesetEvent::Renamed { from, to } => write!(f, "renamed '{from}' to '{to}'"),
            RulesetEvent::Removed(name) => write!(f, "removed '{name}'"),
        }
    }
}

/// Outcome of running a ruleset over a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Sum of per-file rule counts
    pub count: usize,
    /// Files transformed and written back
    pub processed: Vec<PathBuf>,
    /// Files that could not be read or written, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct RegexPipeline<E = NativeRegexEngine> {
    config_dir: PathBuf,
    store: RulesetStore,
    settings: Settings,
    engine: RuleEngine<E>,
    files: Box<dyn FileSystem>,
    notifier: Box<dyn Notifier>,
    confirmer: Box<dyn Confirmer>,
}

impl RegexPipeline<NativeRegexEngine> {
    /// Open the pipeline rooted at `config_dir` with the native regex engine.
    pub fn open(
        config_dir: impl AsRef<Path>,
        files: impl FileSystem + 'static,
    ) -> Result<Self, PipelineError> {
        Self::with_engine(config_dir, files, RuleEngine::new())
    }
}

impl<E: RegexEngine> RegexPipeline<E> {
    /// Open the pipeline with a custom rule engine.
    ///
    /// Creates the ruleset directory if needed and reconciles the settings
    /// list with the files actually stored.
    pub fn with_engine(
        config_dir: impl AsRef<Path>,
        files: impl FileSystem + 'static,
        engine: RuleEngine<E>,
    ) -> Result<Self, PipelineError> {
        let config_dir = config_dir.as_ref().to_path_buf();
        let store = RulesetStore::open(&config_dir)?;
        let settings = config::load_from_path(config_dir.join(SETTINGS_FILE))?;

        let mut pipeline = Self {
            config_dir,
            store,
            settings,
            engine,
            files: Box::new(files),
            notifier: Box::new(LogNotifier),
            confirmer: Box::new(AutoConfirm(false)),
        };
        pipeline.sync_rulesets()?;
        Ok(pipeline)
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_confirmer(mut self, confirmer: impl Confirmer + 'static) -> Self {
        self.confirmer = Box::new(confirmer);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &RulesetStore {
        &self.store
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Ruleset names in settings order.
    pub fn list_rulesets(&self) -> &[String] {
        &self.settings.rules
    }

    pub fn read_ruleset(&self, name: &str) -> Result<String, PipelineError> {
        Ok(self.store.read(name)?)
    }

    pub fn ruleset_rules(&self, name: &str) -> Result<Vec<Rule>, PipelineError> {
        Ok(parser::parse_all(&self.store.read(name)?))
    }

    fn persist(&self) -> Result<(), PipelineError> {
        config::save_to_path(&self.settings, self.config_dir.join(SETTINGS_FILE))?;
        Ok(())
    }

    /// Reconcile the settings list with the ruleset directory.
    pub fn sync_rulesets(&mut self) -> Result<bool, PipelineError> {
        let stored = self.store.names()?;
        let changed = self.settings.sync_with(&stored);
        if changed {
            info!(rulesets = stored.len(), "ruleset list resynced with storage");
            self.persist()?;
        }
        Ok(changed)
    }

    fn report_conflict(&self, error: PipelineError) -> PipelineError {
        match &error {
            PipelineError::NameExists(_) => self.notifier.notify(messages::NAME_EXISTS_ERR),
            PipelineError::NotFound(name) => self.notifier.notify(&messages::not_found(name)),
            _ => {}
        }
        error
    }

    /// Store a new ruleset. Fails on a case-insensitive name collision.
    pub fn create_ruleset(
        &mut self,
        name: &str,
        content: &str,
    ) -> Result<RulesetEvent, PipelineError> {
        self.store
            .create(name, content)
            .map_err(|e| self.report_conflict(e.into()))?;
        if self.settings.add_rule(name) {
            self.persist()?;
        }
        Ok(RulesetEvent::Added(name.to_string()))
    }

    /// Replace a ruleset's content, renaming it when `new_name` differs.
    ///
    /// Fails with `NotFound` when `old_name` is not stored; nothing is
    /// written in that case.
    pub fn update_ruleset(
        &mut self,
        old_name: &str,
        new_name: &str,
        content: &str,
    ) -> Result<RulesetEvent, PipelineError> {
        self.store
            .update(old_name, new_name, content)
            .map_err(|e| self.report_conflict(e.into()))?;

        if old_name == new_name {
            return Ok(RulesetEvent::Updated(new_name.to_string()));
        }

        self.settings.rename_rule(old_name, new_name);
        self.persist()?;
        Ok(RulesetEvent::Renamed {
            from: old_name.to_string(),
            to: new_name.to_string(),
        })
    }

    /// Remove a ruleset; a no-op when it is already gone.
    ///
    /// Clears the default pointer if it referred to this ruleset.
    pub fn delete_ruleset(&mut self, name: &str) -> Result<RulesetEvent, PipelineError> {
        self.store.delete(name)?;
        self.settings.remove_rule(name);
        self.persist()?;
        Ok(RulesetEvent::Removed(name.to_string()))
    }

    /// Validate a quick-action form and store it.
    ///
    /// `editing` names the ruleset being edited; `None` creates a new one.
    /// Nothing is written when validation fails.
    pub fn save_form(
        &mut self,
        form: &RuleForm,
        editing: Option<&str>,
    ) -> Result<RulesetEvent, PipelineError> {
        let content = form
            .to_content(self.engine.regex_engine())
            .inspect_err(|e| self.notifier.notify(&e.to_string()))?;
        match editing {
            Some(old_name) => self.update_ruleset(old_name, &form.name, &content),
            None => self.create_ruleset(&form.name, &content),
        }
    }

    pub fn set_confirm_folder_action(&mut self, confirm: bool) -> Result<(), PipelineError> {
        self.settings.confirm_folder_action = confirm;
        self.persist()
    }

    /// Point the default at `name`, or clear it with `None`.
    pub fn set_default_ruleset(&mut self, name: Option<&str>) -> Result<(), PipelineError> {
        if let Some(name) = name {
            if !self.store.exists(name) {
                return Err(PipelineError::NotFound(name.to_string()));
            }
        }
        self.settings.default_rule = name.map(str::to_string);
        self.persist()
    }

    /// The default ruleset, if set and still stored.
    ///
    /// A pointer to a ruleset that no longer exists is cleared.
    pub fn default_ruleset(&mut self) -> Result<Option<String>, PipelineError> {
        let Some(name) = self.settings.default_rule.clone() else {
            return Ok(None);
        };
        if self.store.exists(&name) {
            return Ok(Some(name));
        }
        warn!(ruleset = %name, "default ruleset no longer exists, clearing");
        self.settings.default_rule = None;
        self.persist()?;
        Ok(None)
    }

    fn resolve_default(&mut self) -> Result<String, PipelineError> {
        match self.default_ruleset()? {
            Some(name) => Ok(name),
            None => {
                self.notifier.notify(messages::NO_DEFAULT_ERR);
                Err(PipelineError::NoDefault)
            }
        }
    }

    /// Read the ruleset text, notifying "not found" when it is missing.
    fn load_ruleset(&self, name: &str) -> Result<String, PipelineError> {
        if !self.store.exists(name) {
            self.notifier.notify(&messages::not_found(name));
            return Err(PipelineError::NotFound(name.to_string()));
        }
        Ok(self.store.read(name)?)
    }

    /// Apply a ruleset to the editor's selection, or the whole document
    /// when nothing is selected. The viewport is restored afterwards.
    pub fn apply_ruleset(
        &self,
        name: &str,
        editor: &mut dyn Editor,
    ) -> Result<ApplicationResult, PipelineError> {
        let ruleset = self.load_ruleset(name)?;

        let selection = editor.selection();
        let subject = selection.clone().unwrap_or_else(|| editor.value());
        let position = editor.scroll_position();

        let result = self.engine.process_regex(&subject, name, &ruleset);

        if selection.is_some() {
            editor.replace_selection(&result.content);
        } else {
            editor.set_value(&result.content);
        }
        editor.scroll_to(position);

        self.notifier.notify(&messages::executed(name, result.count));
        Ok(result)
    }

    /// Apply a ruleset to one file, overwriting it in place.
    pub fn apply_ruleset_to_file(
        &self,
        path: &Path,
        name: &str,
    ) -> Result<ApplicationResult, PipelineError> {
        let ruleset = self.load_ruleset(name)?;

        let subject = self.files.read(path)?;
        let result = self.engine.process_regex(&subject, name, &ruleset);
        self.files.write(path, &result.content)?;

        self.notifier.notify(&messages::executed(name, result.count));
        Ok(result)
    }

    /// Apply a ruleset to every markdown file under `folder`, one file at a
    /// time. A file that fails to read or write, or a directory entry the
    /// walk could not read, is recorded in the report and the batch moves on.
    pub fn apply_ruleset_to_folder(
        &self,
        folder: &Path,
        name: &str,
    ) -> Result<BatchReport, PipelineError> {
        let ruleset = self.load_ruleset(name)?;

        if self.settings.confirm_folder_action
            && !self.confirmer.confirm(
                messages::FOLDER_ACTION_CONFIRM_TITLE,
                messages::FOLDER_ACTION_CONFIRM_MSG,
            )
        {
            info!(ruleset = name, folder = %folder.display(), "folder run declined");
            return Err(PipelineError::Cancelled);
        }

        let rules = parser::parse_all(&ruleset);
        let listing = self.files.markdown_files(folder)?;
        let mut report = BatchReport {
            failures: listing
                .errors
                .into_iter()
                .map(|(path, error)| (path, error.to_string()))
                .collect(),
            ..BatchReport::default()
        };

        for file in listing.files {
            match self.apply_rules_to_file(&file, name, &rules) {
                Ok(count) => {
                    report.count += count;
                    report.processed.push(file);
                }
                Err(error) => {
                    warn!(file = %file.display(), %error, "skipping file in folder run");
                    report.failures.push((file, error.to_string()));
                }
            }
        }

        self.notifier.notify(&messages::executed(name, report.count));
        Ok(report)
    }

    fn apply_rules_to_file(
        &self,
        path: &Path,
        name: &str,
        rules: &[Rule],
    ) -> Result<usize, HostError> {
        let subject = self.files.read(path)?;
        let result = self.engine.process_rules(&subject, name, rules);
        self.files.write(path, &result.content)?;
        Ok(result.count)
    }

    pub fn apply_default(
        &mut self,
        editor: &mut dyn Editor,
    ) -> Result<ApplicationResult, PipelineError> {
        let name = self.resolve_default()?;
        self.apply_ruleset(&name, editor)
    }

    pub fn apply_default_to_file(&mut self, path: &Path) -> Result<ApplicationResult, PipelineError> {
        let name = self.resolve_default()?;
        self.apply_ruleset_to_file(path, &name)
    }

    pub fn apply_default_to_folder(&mut self, folder: &Path) -> Result<BatchReport, PipelineError> {
        let name = self.resolve_default()?;
        self.apply_ruleset_to_folder(folder, &name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{BufferEditor, LocalFs, ScrollPosition};
    use crate::safety::VaultGuard;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Notifier for Recorder {
        fn notify(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    fn setup() -> (tempfile::TempDir, RegexPipeline, Recorder) {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(".config");
        fs::create_dir_all(&config).unwrap();
        let files = LocalFs::new(VaultGuard::new(dir.path()).unwrap().forbid(&config));
        let recorder = Recorder::default();
        let pipeline = RegexPipeline::open(&config, files)
            .unwrap()
            .with_notifier(recorder.clone())
            .with_confirmer(AutoConfirm(true));
        (dir, pipeline, recorder)
    }

    #[test]
    fn test_create_registers_in_settings() {
        let (_dir, mut pipeline, _) = setup();
        let event = pipeline.create_ruleset("tidy", "\"a\"\n->\n\"b\"").unwrap();
        assert_eq!(event, RulesetEvent::Added("tidy".into()));
        assert_eq!(pipeline.list_rulesets(), ["tidy".to_string()]);
        assert_eq!(pipeline.ruleset_rules("tidy").unwrap().len(), 1);
    }

    #[test]
    fn test_create_collision_notifies() {
        let (_dir, mut pipeline, recorder) = setup();
        pipeline.create_ruleset("Tidy", "original").unwrap();

        let err = pipeline.create_ruleset("TIDY", "other").unwrap_err();
        assert!(matches!(err, PipelineError::NameExists(_)));
        assert_eq!(pipeline.read_ruleset("Tidy").unwrap(), "original");
        assert_eq!(recorder.0.borrow().last().unwrap(), messages::NAME_EXISTS_ERR);
    }

    #[test]
    fn test_rename_moves_default() {
        let (_dir, mut pipeline, _) = setup();
        pipeline.create_ruleset("old", "x").unwrap();
        pipeline.set_default_ruleset(Some("old")).unwrap();

        let event = pipeline.update_ruleset("old", "new", "y").unwrap();
        assert_eq!(
            event,
            RulesetEvent::Renamed {
                from: "old".into(),
                to: "new".into()
            }
        );
        assert_eq!(pipeline.default_ruleset().unwrap().as_deref(), Some("new"));
        assert_eq!(pipeline.list_rulesets(), ["new".to_string()]);
    }

    #[test]
    fn test_update_requires_existing_ruleset() {
        let (_dir, mut pipeline, recorder) = setup();
        pipeline.create_ruleset("Tidy", "x").unwrap();

        let err = pipeline.update_ruleset("ghost", "ghost", "y").unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(_)));
        assert_eq!(recorder.0.borrow().last().unwrap(), "ghost not found!");
        assert!(!pipeline.store().exists("ghost"));

        assert!(pipeline.update_ruleset("tidy", "tidy", "y").is_err());
        assert_eq!(pipeline.store().names().unwrap(), vec!["Tidy".to_string()]);
        assert_eq!(pipeline.list_rulesets(), ["Tidy".to_string()]);
    }

    #[test]
    fn test_delete_clears_default() {
        let (_dir, mut pipeline, _) = setup();
        pipeline.create_ruleset("tidy", "x").unwrap();
        pipeline.set_default_ruleset(Some("tidy")).unwrap();

        pipeline.delete_ruleset("tidy").unwrap();
        assert_eq!(pipeline.settings().default_rule, None);
        assert!(pipeline.list_rulesets().is_empty());

        // Idempotent
        pipeline.delete_ruleset("tidy").unwrap();
    }

    #[test]
    fn test_dangling_default_is_cleared() {
        let (_dir, mut pipeline, _) = setup();
        pipeline.create_ruleset("tidy", "x").unwrap();
        pipeline.set_default_ruleset(Some("tidy")).unwrap();
        fs::remove_file(pipeline.store().dir().join("tidy")).unwrap();

        assert_eq!(pipeline.default_ruleset().unwrap(), None);
        assert_eq!(pipeline.settings().default_rule, None);
    }

    #[test]
    fn test_set_default_requires_existing() {
        let (_dir, mut pipeline, _) = setup();
        assert!(matches!(
            pipeline.set_default_ruleset(Some("missing")),
            Err(PipelineError::NotFound(_))
        ));
    }

    #[test]
    fn test_apply_to_whole_document_restores_scroll() {
        let (_dir, mut pipeline, recorder) = setup();
        pipeline
            .create_ruleset("upper", "\"a\"\n->\n\"A\"\n\n\"b\"\n->\n\"B\"")
            .unwrap();

        let mut editor = BufferEditor::new("abc\nabc");
        let position = ScrollPosition {
            top: 42.0,
            left: 0.0,
        };
        editor.scroll_to(position);

        let result = pipeline.apply_ruleset("upper", &mut editor).unwrap();
        assert_eq!(result.count, 2);
        assert_eq!(editor.text(), "ABc\nABc");
        assert_eq!(editor.scroll_position(), position);
        assert_eq!(
            recorder.0.borrow().last().unwrap(),
            "Executed 'upper' with 2 replacements."
        );
    }

    #[test]
    fn test_apply_to_selection_only() {
        let (_dir, mut pipeline, _) = setup();
        pipeline.create_ruleset("x", "\"o\"\n->\n\"0\"").unwrap();

        let mut editor = BufferEditor::new("foo foo foo");
        editor.select(4..7);
        pipeline.apply_ruleset("x", &mut editor).unwrap();
        assert_eq!(editor.text(), "foo f00 foo");
    }

    #[test]
    fn test_apply_missing_ruleset_leaves_buffer() {
        let (_dir, pipeline, recorder) = setup();
        let mut editor = BufferEditor::new("untouched");

        let err = pipeline.apply_ruleset("ghost", &mut editor).unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(_)));
        assert_eq!(editor.text(), "untouched");
        assert_eq!(recorder.0.borrow().last().unwrap(), "ghost not found!");
    }

    #[test]
    fn test_apply_to_file() {
        let (dir, mut pipeline, _) = setup();
        pipeline.create_ruleset("x", "\"x\"\n->\n\"y\"").unwrap();
        let file = dir.path().join("note.md");
        fs::write(&file, "xox").unwrap();

        let result = pipeline.apply_ruleset_to_file(&file, "x").unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(fs::read_to_string(&file).unwrap(), "yoy");
    }

    #[test]
    fn test_folder_run_sums_counts() {
        let (dir, mut pipeline, _) = setup();
        pipeline.create_ruleset("x", "\"x\"\n->\n\"y\"").unwrap();
        let folder = dir.path().join("notes");
        fs::create_dir_all(folder.join("sub")).unwrap();
        for file in ["a.md", "b.md", "sub/c.md"] {
            fs::write(folder.join(file), "x").unwrap();
        }

        let report = pipeline.apply_ruleset_to_folder(&folder, "x").unwrap();
        assert_eq!(report.count, 3);
        assert_eq!(report.processed.len(), 3);
        assert!(report.is_clean());
        for file in ["a.md", "b.md", "sub/c.md"] {
            assert_eq!(fs::read_to_string(folder.join(file)).unwrap(), "y");
        }
    }

    #[test]
    fn test_folder_run_declined() {
        let (dir, mut pipeline, _) = setup();
        pipeline.create_ruleset("x", "\"x\"\n->\n\"y\"").unwrap();
        let mut pipeline = pipeline.with_confirmer(AutoConfirm(false));
        let file = dir.path().join("a.md");
        fs::write(&file, "x").unwrap();

        let err = pipeline.apply_ruleset_to_folder(dir.path(), "x").unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled));
        assert_eq!(fs::read_to_string(&file).unwrap(), "x");

        pipeline.set_confirm_folder_action(false).unwrap();
        let report = pipeline.apply_ruleset_to_folder(dir.path(), "x").unwrap();
        assert_eq!(report.count, 1);
        assert_eq!(fs::read_to_string(&file).unwrap(), "y");
    }

    #[test]
    fn test_default_surfaces() {
        let (dir, mut pipeline, recorder) = setup();
        let file = dir.path().join("a.md");
        fs::write(&file, "x").unwrap();

        let err = pipeline.apply_default_to_file(&file).unwrap_err();
        assert!(matches!(err, PipelineError::NoDefault));
        assert_eq!(recorder.0.borrow().last().unwrap(), messages::NO_DEFAULT_ERR);

        pipeline.create_ruleset("x", "\"x\"\n->\n\"y\"").unwrap();
        pipeline.set_default_ruleset(Some("x")).unwrap();
        pipeline.apply_default_to_file(&file).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "y");

        let mut editor = BufferEditor::new("xx");
        pipeline.apply_default(&mut editor).unwrap();
        assert_eq!(editor.text(), "yy");
    }

    #[test]
    fn test_save_form_validates_before_writing() {
        let (_dir, mut pipeline, recorder) = setup();
        let form = RuleForm {
            name: "bad".into(),
            pattern: "(".into(),
            ..RuleForm::default()
        };

        let err = pipeline.save_form(&form, None).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidForm(FormError::InvalidRegex { .. })));
        assert!(!pipeline.store().exists("bad"));
        assert_eq!(recorder.0.borrow().last().unwrap(), messages::REGEX_INVALID_ERR);

        let form = RuleForm {
            pattern: "\\s+$".into(),
            delete: true,
            ..form
        };
        pipeline.save_form(&form, None).unwrap();
        assert_eq!(
            pipeline.ruleset_rules("bad").unwrap(),
            vec![Rule::delete("\\s+$", "gm")]
        );
    }

    #[test]
    fn test_save_form_rejects_path_like_name() {
        let (_dir, mut pipeline, recorder) = setup();
        let form = RuleForm {
            name: "../escape".into(),
            pattern: "a".into(),
            ..RuleForm::default()
        };

        let err = pipeline.save_form(&form, None).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidForm(FormError::InvalidName { .. })
        ));
        assert_eq!(recorder.0.borrow().last().unwrap(), messages::NAME_INVALID_ERR);
        assert!(pipeline.list_rulesets().is_empty());
    }

    #[test]
    fn test_open_resyncs_settings() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(".config");
        {
            let files = LocalFs::new(VaultGuard::new(dir.path()).unwrap());
            let mut pipeline = RegexPipeline::open(&config, files).unwrap();
            pipeline.create_ruleset("a", "x").unwrap();
        }
        fs::write(config.join("regex-rulesets/b"), "y").unwrap();

        let files = LocalFs::new(VaultGuard::new(dir.path()).unwrap());
        let pipeline = RegexPipeline::open(&config, files).unwrap();
        assert_eq!(pipeline.list_rulesets(), ["a".to_string(), "b".to_string()]);
    }
}
