use crate::engine::matcher::{NativeRegexEngine, RegexEngine};
use crate::parser;
use crate::rule::Rule;
use tracing::{debug, warn};

/// Output of running one ruleset over one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationResult {
    /// Transformed text
    pub content: String,
    /// Number of rules that compiled and ran (not the number of matches)
    pub count: usize,
}

impl ApplicationResult {
    pub fn is_unchanged(&self, subject: &str) -> bool {
        self.content == subject
    }
}

/// Applies rules in order, each to the output of the previous one.
///
/// A rule whose pattern or flags fail to compile is logged and skipped;
/// it never aborts the rest of the ruleset.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine<E = NativeRegexEngine> {
    regex: E,
}

impl RuleEngine<NativeRegexEngine> {
    pub fn new() -> Self {
        Self {
            regex: NativeRegexEngine::new(),
        }
    }
}

impl<E: RegexEngine> RuleEngine<E> {
    /// Create an engine over a custom regex capability.
    pub fn with_regex_engine(regex: E) -> Self {
        Self { regex }
    }

    pub fn regex_engine(&self) -> &E {
        &self.regex
    }

    /// Parse `ruleset_text` and apply its rules to `subject`.
    ///
    /// `ruleset_name` only labels diagnostics for skipped rules.
    pub fn process_regex(
        &self,
        subject: &str,
        ruleset_name: &str,
        ruleset_text: &str,
    ) -> ApplicationResult {
        let rules = parser::parse_all(ruleset_text);
        self.process_rules(subject, ruleset_name, &rules)
    }

    /// Apply already-parsed rules to `subject`.
    pub fn process_rules(
        &self,
        subject: &str,
        ruleset_name: &str,
        rules: &[Rule],
    ) -> ApplicationResult {
        let mut output = subject.to_string();
        let mut count = 0;

        for (idx, rule) in rules.iter().enumerate() {
            match self.regex.compile(&rule.pattern, rule.effective_flags()) {
                Ok(regex) => {
                    output = regex.replace_all(&output, rule.effective_replacement());
                    count += 1;
                    debug!(ruleset = ruleset_name, rule = idx + 1, %rule, "rule executed");
                }
                Err(error) => {
                    warn!(
                        ruleset = ruleset_name,
                        rule = idx + 1,
                        %error,
                        "skipping invalid regex rule"
                    );
                }
            }
        }

        ApplicationResult {
            content: output,
            count,
        }
    }
}
