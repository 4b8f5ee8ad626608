//! Ruleset text format.
//!
//! A ruleset is a flat text file holding one or more rule blocks:
//!
//! ```text
//! "<pattern>"<flags>
//! ->
//! "<replacement>"<mode>
//! ```
//!
//! The line breaks around `->` are optional and may be `\n`, `\r\n` or `\r`.
//! Pattern and replacement bodies may span lines. A mode token of `x`
//! turns the rule into a delete rule. Anything between blocks that does not
//! match the grammar (comments, blank lines) is ignored.
//!
//! Bodies are matched non-greedily up to the next `"`, so a body holding an
//! unescaped quote can shift a block boundary. Stored rulesets depend on this
//! behaviour, so it is kept as is.

use crate::rule::{Rule, RuleMode};
use regex::{Captures, Regex};
use std::sync::LazyLock;

const RULE_BLOCK: &str =
    r#"(?msR)^"(.+?)"([a-z]*?)(?:\r\n|\r|\n)?->(?:\r\n|\r|\n)?"(.*?)"([a-z]*?)(?:\r\n|\r|\n)?$"#;

static RULE_PARSER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(RULE_BLOCK).expect("rule block grammar is a valid regex"));

fn rule_from_captures(caps: &Captures<'_>) -> Rule {
    let group = |idx: usize| caps.get(idx).map_or("", |m| m.as_str());
    Rule {
        pattern: group(1).to_string(),
        flags: group(2).to_string(),
        replacement: group(3).to_string(),
        mode: RuleMode::from_marker(group(4)),
    }
}

/// Extract every rule block from `text`, in textual order.
///
/// Parsing is purely syntactic: flags are not checked here, invalid rules
/// are skipped later when the engine fails to compile them.
pub fn parse_all(text: &str) -> Vec<Rule> {
    RULE_PARSER
        .captures_iter(text)
        .map(|caps| rule_from_captures(&caps))
        .collect()
}

/// Extract the first rule block, or [`Rule::empty`] when there is none.
pub fn parse_first(text: &str) -> Rule {
    RULE_PARSER
        .captures(text)
        .map(|caps| rule_from_captures(&caps))
        .unwrap_or_else(Rule::empty)
}

/// Format a single rule as a rule block.
pub fn serialize(rule: &Rule) -> String {
    format!(
        "\"{}\"{}\n->\n\"{}\"{}",
        rule.pattern,
        rule.flags,
        rule.replacement,
        rule.mode.marker()
    )
}

/// Format several rules, one block per rule separated by a blank line.
pub fn serialize_all(rules: &[Rule]) -> String {
    rules.iter().map(serialize).collect::<Vec<_>>().join("\n\n")
}
