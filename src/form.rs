//! Authoring-time validation of a single-rule ruleset.

use crate::engine::{RegexEngine, RegexError};
use crate::messages;
use crate::parser;
use crate::rule::{Rule, RuleMode, DEFAULT_FLAGS};
use crate::safety::{validate_ruleset_name, SafetyError};
use thiserror::Error;

/// Input field an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Pattern,
    Flags,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{}", messages::NAME_EMPTY_ERR)]
    EmptyName,

    #[error("{}", messages::NAME_INVALID_ERR)]
    InvalidName { reason: String },

    #[error("{}", messages::PATTERN_EMPTY_ERR)]
    EmptyPattern,

    #[error("{}", messages::FLAGS_INVALID_ERR)]
    InvalidFlags { reason: String },

    #[error("{}", messages::REGEX_INVALID_ERR)]
    InvalidRegex { reason: String },
}

impl FormError {
    /// The field to flag in the form.
    pub fn field(&self) -> FormField {
        match self {
            FormError::EmptyName | FormError::InvalidName { .. } => FormField::Name,
            FormError::EmptyPattern | FormError::InvalidRegex { .. } => FormField::Pattern,
            FormError::InvalidFlags { .. } => FormField::Flags,
        }
    }
}

/// Editable fields of a quick action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleForm {
    pub name: String,
    pub pattern: String,
    pub flags: String,
    pub replacement: String,
    pub delete: bool,
}

impl Default for RuleForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            pattern: String::new(),
            flags: DEFAULT_FLAGS.to_string(),
            replacement: String::new(),
            delete: false,
        }
    }
}

impl RuleForm {
    /// Prefill the form from a stored ruleset's first rule.
    pub fn from_ruleset(name: &str, content: &str) -> Self {
        let rule = parser::parse_first(content);
        Self {
            name: name.to_string(),
            pattern: rule.pattern,
            flags: rule.flags,
            replacement: rule.replacement,
            delete: rule.mode == RuleMode::Delete,
        }
    }

    pub fn rule(&self) -> Rule {
        Rule {
            pattern: self.pattern.clone(),
            flags: self.flags.clone(),
            replacement: self.replacement.clone(),
            mode: if self.delete {
                RuleMode::Delete
            } else {
                RuleMode::Substitute
            },
        }
    }

    /// Check every field, returning the first problem found.
    ///
    /// Checks run in form order: name, pattern, flags, then regex syntax.
    pub fn validate<E: RegexEngine>(&self, engine: &E) -> Result<Rule, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::EmptyName);
        }
        if let Err(SafetyError::InvalidName { reason, .. }) = validate_ruleset_name(&self.name) {
            return Err(FormError::InvalidName {
                reason: reason.to_string(),
            });
        }
        if self.pattern.is_empty() {
            return Err(FormError::EmptyPattern);
        }

        let rule = self.rule();
        match engine.compile(&rule.pattern, rule.effective_flags()) {
            Ok(_) => Ok(rule),
            Err(RegexError::InvalidFlags { reason, .. }) => Err(FormError::InvalidFlags { reason }),
            Err(RegexError::InvalidPattern { source, .. }) => Err(FormError::InvalidRegex {
                reason: source.to_string(),
            }),
        }
    }

    /// Ruleset text for the validated form.
    pub fn to_content<E: RegexEngine>(&self, engine: &E) -> Result<String, FormError> {
        self.validate(engine).map(|rule| parser::serialize(&rule))
    }
}
