use std::fmt;

/// Flags used when a rule carries none of its own.
pub const DEFAULT_FLAGS: &str = "gm";

/// Mode token that switches a rule into delete mode.
pub const DELETE_MARKER: &str = "x";

/// What a rule does with each match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleMode {
    /// Replace every match with the rule's replacement text
    #[default]
    Substitute,
    /// Replace every match with the empty string
    Delete,
}

impl RuleMode {
    /// Interpret the trailing token of a rule block.
    pub fn from_marker(marker: &str) -> Self {
        if marker == DELETE_MARKER {
            RuleMode::Delete
        } else {
            RuleMode::Substitute
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            RuleMode::Substitute => "",
            RuleMode::Delete => DELETE_MARKER,
        }
    }
}

/// One search/replace step of a ruleset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Regular expression source
    pub pattern: String,
    /// Regex flags; empty means [`DEFAULT_FLAGS`] at match time
    pub flags: String,
    /// Replacement text, may contain `$1` / `${name}` references
    pub replacement: String,
    pub mode: RuleMode,
}

impl Rule {
    pub fn substitute(
        pattern: impl Into<String>,
        flags: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            flags: flags.into(),
            replacement: replacement.into(),
            mode: RuleMode::Substitute,
        }
    }

    pub fn delete(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            flags: flags.into(),
            replacement: String::new(),
            mode: RuleMode::Delete,
        }
    }

    /// Placeholder returned when ruleset text holds no rule block yet.
    pub fn empty() -> Self {
        Self {
            pattern: String::new(),
            flags: DEFAULT_FLAGS.to_string(),
            replacement: String::new(),
            mode: RuleMode::Substitute,
        }
    }

    /// Flags to compile with: the rule's own, or the defaults when empty.
    pub fn effective_flags(&self) -> &str {
        if self.flags.is_empty() {
            DEFAULT_FLAGS
        } else {
            &self.flags
        }
    }

    /// Text each match is replaced with.
    pub fn effective_replacement(&self) -> &str {
        match self.mode {
            RuleMode::Substitute => &self.replacement,
            RuleMode::Delete => "",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            RuleMode::Substitute => write!(
                f,
                "/{}/{} -> {:?}",
                self.pattern,
                self.effective_flags(),
                self.replacement
            ),
            RuleMode::Delete => write!(f, "/{}/{} -> (delete)", self.pattern, self.effective_flags()),
        }
    }
}
