use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use regex_pipeline::{
    messages, AutoConfirm, BufferEditor, CommandRegistry, Confirmer, LocalFs, Notifier,
    PipelineError, RegexPipeline, RuleForm, RuleMode, VaultGuard,
};
use similar::{ChangeTag, TextDiff};
use std::env;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "regex-pipeline")]
#[command(about = "Apply named regex rulesets to text, files and folders", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration directory holding rulesets and settings
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Root directory files may be rewritten under (defaults to the current directory)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored rulesets
    List,

    /// Show the rules of a ruleset
    Show {
        name: String,

        /// Print the raw ruleset text
        #[arg(long)]
        raw: bool,
    },

    /// Create a ruleset from a single rule or a ruleset file
    Create {
        name: String,

        #[command(flatten)]
        rule: RuleArgs,
    },

    /// Replace a ruleset's content, optionally renaming it
    Update {
        name: String,

        /// New name for the ruleset
        #[arg(long)]
        rename: Option<String>,

        #[command(flatten)]
        rule: RuleArgs,
    },

    /// Delete a ruleset
    Delete {
        name: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show, set or clear the default ruleset
    Default {
        name: Option<String>,

        #[arg(long, conflicts_with = "name")]
        clear: bool,
    },

    /// Turn the confirmation before folder runs on or off
    ConfirmFolder {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },

    /// Transform stdin to stdout (default ruleset when none is given)
    Run {
        name: Option<String>,

        /// Only transform this byte range, e.g. 10..42
        #[arg(long, value_parser = parse_range)]
        selection: Option<Range<usize>>,
    },

    /// Apply a ruleset to one file in place
    Apply {
        name: String,

        file: PathBuf,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Apply a ruleset to every markdown file under a folder
    ApplyFolder {
        name: String,

        folder: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List the command registered for each ruleset
    Commands,
}

#[derive(clap::Args)]
struct RuleArgs {
    /// Search pattern
    #[arg(short, long)]
    pattern: Option<String>,

    /// Regex flags
    #[arg(short, long)]
    flags: Option<String>,

    /// Replacement text ($1, ${name} reference groups)
    #[arg(short, long)]
    replacement: Option<String>,

    /// Delete matches instead of replacing them
    #[arg(short = 'x', long)]
    delete: bool,

    /// Read the full ruleset text from a file instead
    #[arg(long, conflicts_with_all = ["pattern", "flags", "replacement", "delete"])]
    from_file: Option<PathBuf>,
}

impl RuleArgs {
    fn apply_to(self, form: &mut RuleForm) {
        if let Some(pattern) = self.pattern {
            form.pattern = pattern;
        }
        if let Some(flags) = self.flags {
            form.flags = flags;
        }
        if let Some(replacement) = self.replacement {
            form.replacement = replacement;
        }
        if self.delete {
            form.delete = true;
        }
    }
}

/// Prints notices to stderr so stdout stays clean for `run`.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        if message.starts_with("Error") || message.ends_with("not found!") {
            eprintln!("{}", message.red());
        } else {
            eprintln!("{}", message.green());
        }
    }
}

/// Asks on the terminal, defaulting to "no".
struct PromptConfirmer;

impl Confirmer for PromptConfirmer {
    fn confirm(&self, title: &str, message: &str) -> bool {
        eprintln!("{}", title.bold());
        eprint!("{} [y/N] ", message);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

fn parse_range(value: &str) -> std::result::Result<Range<usize>, String> {
    let (start, end) = value
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got '{value}'"))?;
    let start = start.parse().map_err(|e| format!("bad start '{start}': {e}"))?;
    let end = end.parse().map_err(|e| format!("bad end '{end}': {e}"))?;
    Ok(start..end)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config_dir = resolve_config_dir(cli.config_dir)?;
    let vault = match cli.vault {
        Some(path) => path,
        None => env::current_dir()?,
    };

    match cli.command {
        Commands::List => cmd_list(&config_dir, &vault),
        Commands::Show { name, raw } => cmd_show(&config_dir, &vault, &name, raw),
        Commands::Create { name, rule } => cmd_create(&config_dir, &vault, &name, rule),
        Commands::Update { name, rename, rule } => {
            cmd_update(&config_dir, &vault, &name, rename, rule)
        }
        Commands::Delete { name, yes } => cmd_delete(&config_dir, &vault, &name, yes),
        Commands::Default { name, clear } => cmd_default(&config_dir, &vault, name, clear),
        Commands::ConfirmFolder { enabled } => {
            let mut pipeline = open_pipeline(&config_dir, &vault)?;
            pipeline.set_confirm_folder_action(enabled)?;
            println!("Folder confirmation {}", if enabled { "on" } else { "off" });
            Ok(())
        }
        Commands::Run { name, selection } => cmd_run(&config_dir, &vault, name, selection),
        Commands::Apply { name, file, diff } => {
            let file = env::current_dir()?.join(file);
            cmd_apply(&config_dir, &vault, &name, &file, diff)
        }
        Commands::ApplyFolder { name, folder, yes } => {
            let folder = env::current_dir()?.join(folder);
            cmd_apply_folder(&config_dir, &vault, &name, &folder, yes)
        }
        Commands::Commands => cmd_commands(&config_dir, &vault),
    }
}

/// Resolve the configuration directory
///
/// Priority order:
/// 1. Explicit --config-dir flag
/// 2. REGEX_PIPELINE_HOME environment variable
/// 3. ~/.config/regex-pipeline
fn resolve_config_dir(cli_config_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = cli_config_dir {
        return Ok(path);
    }

    if let Ok(env_path) = env::var("REGEX_PIPELINE_HOME") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }

    match home::home_dir() {
        Some(home) => Ok(home.join(".config").join("regex-pipeline")),
        None => anyhow::bail!(
            "{}\n{}\n  {}\n  {}",
            "Could not determine a configuration directory.".red(),
            "Try one of:".bold(),
            "1. Specify explicitly: regex-pipeline --config-dir /path/to/config <command>",
            "2. Set environment variable: export REGEX_PIPELINE_HOME=/path/to/config"
        ),
    }
}

fn open_pipeline(config_dir: &Path, vault: &Path) -> Result<RegexPipeline> {
    fs::create_dir_all(config_dir)
        .with_context(|| format!("failed to create {}", config_dir.display()))?;
    let guard = VaultGuard::new(vault)
        .with_context(|| format!("invalid vault root {}", vault.display()))?
        .forbid(config_dir);

    let pipeline = RegexPipeline::open(config_dir, LocalFs::new(guard))?
        .with_notifier(TerminalNotifier)
        .with_confirmer(PromptConfirmer);
    Ok(pipeline)
}

/// Turn errors the pipeline already reported to the user into a plain
/// non-zero exit; everything else propagates.
fn finish<T>(result: std::result::Result<T, PipelineError>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(
            PipelineError::NotFound(_)
            | PipelineError::NameExists(_)
            | PipelineError::NoDefault
            | PipelineError::InvalidForm(_),
        ) => std::process::exit(1),
        Err(PipelineError::Cancelled) => {
            eprintln!("{}", "Cancelled, no files were changed.".yellow());
            std::process::exit(1)
        }
        Err(e) => Err(e.into()),
    }
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (transformed)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn cmd_list(config_dir: &Path, vault: &Path) -> Result<()> {
    let mut pipeline = open_pipeline(config_dir, vault)?;
    let default = pipeline.default_ruleset()?;

    if pipeline.list_rulesets().is_empty() {
        println!("{}", "No rulesets stored".yellow());
        println!("  {}", pipeline.store().dir().display().to_string().dimmed());
        return Ok(());
    }

    println!("{}", "Rulesets:".bold());
    for name in pipeline.list_rulesets() {
        let rules = pipeline.ruleset_rules(name).map(|r| r.len()).unwrap_or(0);
        let marker = if default.as_deref() == Some(name.as_str()) {
            "★".yellow()
        } else {
            " ".normal()
        };
        println!("{} {} ({} rules)", marker, name, rules);
    }
    Ok(())
}

fn cmd_show(config_dir: &Path, vault: &Path, name: &str, raw: bool) -> Result<()> {
    let pipeline = open_pipeline(config_dir, vault)?;
    let content = pipeline.read_ruleset(name)?;

    if raw {
        print!("{}", content);
        return Ok(());
    }

    let rules = regex_pipeline::parse_all(&content);
    println!("{} ({} rules)", name.bold(), rules.len());
    for (idx, rule) in rules.iter().enumerate() {
        let mode = match rule.mode {
            RuleMode::Substitute => "replace".cyan(),
            RuleMode::Delete => "delete".red(),
        };
        println!("  {}. [{}] {}", idx + 1, mode, rule);
    }
    Ok(())
}

fn cmd_create(config_dir: &Path, vault: &Path, name: &str, rule: RuleArgs) -> Result<()> {
    let mut pipeline = open_pipeline(config_dir, vault)?;

    let event = match rule.from_file.clone() {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            finish(pipeline.create_ruleset(name, &content))?
        }
        None => {
            let mut form = RuleForm {
                name: name.to_string(),
                ..RuleForm::default()
            };
            rule.apply_to(&mut form);
            finish(pipeline.save_form(&form, None))?
        }
    };

    println!("{} Ruleset {}", "✓".green(), event);
    Ok(())
}

fn cmd_update(
    config_dir: &Path,
    vault: &Path,
    name: &str,
    rename: Option<String>,
    rule: RuleArgs,
) -> Result<()> {
    let mut pipeline = open_pipeline(config_dir, vault)?;
    let existing = pipeline.read_ruleset(name)?;
    let new_name = rename.unwrap_or_else(|| name.to_string());

    let event = match rule.from_file.clone() {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            finish(pipeline.update_ruleset(name, &new_name, &content))?
        }
        None => {
            let mut form = RuleForm::from_ruleset(&new_name, &existing);
            rule.apply_to(&mut form);
            finish(pipeline.save_form(&form, Some(name)))?
        }
    };

    println!("{} Ruleset {}", "✓".green(), event);
    Ok(())
}

fn cmd_delete(config_dir: &Path, vault: &Path, name: &str, yes: bool) -> Result<()> {
    let mut pipeline = open_pipeline(config_dir, vault)?;

    if !yes && !PromptConfirmer.confirm("Delete quick action", &messages::delete_confirm(name)) {
        println!("{}", "Nothing deleted".yellow());
        return Ok(());
    }

    let event = pipeline.delete_ruleset(name)?;
    println!("{} Ruleset {}", "✓".green(), event);
    Ok(())
}

fn cmd_default(
    config_dir: &Path,
    vault: &Path,
    name: Option<String>,
    clear: bool,
) -> Result<()> {
    let mut pipeline = open_pipeline(config_dir, vault)?;

    if clear {
        pipeline.set_default_ruleset(None)?;
        println!("Default ruleset cleared");
        return Ok(());
    }

    match name {
        Some(name) => {
            match pipeline.set_default_ruleset(Some(&name)) {
                Ok(()) => println!("Default ruleset: {}", name.bold()),
                Err(PipelineError::NotFound(_)) => {
                    eprintln!("{}", messages::not_found(&name).red());
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
        None => match pipeline.default_ruleset()? {
            Some(name) => println!("{}", name),
            None => println!("{}", "No default ruleset".dimmed()),
        },
    }
    Ok(())
}

fn cmd_run(
    config_dir: &Path,
    vault: &Path,
    name: Option<String>,
    selection: Option<Range<usize>>,
) -> Result<()> {
    let mut pipeline = open_pipeline(config_dir, vault)?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let mut editor = BufferEditor::new(input);
    if let Some(range) = selection {
        editor.select(range);
        if !editor.has_selection() {
            anyhow::bail!("selection is empty, out of bounds or splits a character");
        }
    }

    match name {
        Some(name) => finish(pipeline.apply_ruleset(&name, &mut editor))?,
        None => finish(pipeline.apply_default(&mut editor))?,
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(editor.text().as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn cmd_apply(
    config_dir: &Path,
    vault: &Path,
    name: &str,
    file: &Path,
    show_diff: bool,
) -> Result<()> {
    let pipeline = open_pipeline(config_dir, vault)?;

    let before = if show_diff {
        fs::read_to_string(file).ok()
    } else {
        None
    };

    let result = finish(pipeline.apply_ruleset_to_file(file, name))?;

    if let Some(before) = before {
        if before != result.content {
            display_diff(file, &before, &result.content);
        }
    }
    Ok(())
}

fn cmd_apply_folder(
    config_dir: &Path,
    vault: &Path,
    name: &str,
    folder: &Path,
    yes: bool,
) -> Result<()> {
    let mut pipeline = open_pipeline(config_dir, vault)?;
    if yes {
        pipeline = pipeline.with_confirmer(AutoConfirm(true));
    }

    let report = finish(pipeline.apply_ruleset_to_folder(folder, name))?;

    for file in &report.processed {
        println!("{} {}", "✓".green(), file.display());
    }
    for (file, reason) in &report.failures {
        eprintln!("{} {}: {}", "✗".red(), file.display(), reason);
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} files", format!("{}", report.processed.len()).green());
    println!("  {} rules executed", format!("{}", report.count).green());
    println!("  {} failed", format!("{}", report.failures.len()).red());

    if !report.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_commands(config_dir: &Path, vault: &Path) -> Result<()> {
    let pipeline = open_pipeline(config_dir, vault)?;
    let registry = CommandRegistry::from_names(pipeline.list_rulesets());

    if registry.is_empty() {
        println!("{}", "No commands registered".yellow());
        return Ok(());
    }
    for (_, handle) in registry.iter() {
        println!("{}  {}", handle.id.cyan(), handle.label);
    }
    Ok(())
}
