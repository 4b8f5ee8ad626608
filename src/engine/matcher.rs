//! Regex capability consumed by the rule engine.
//!
//! The engine only needs to compile a `(pattern, flags)` pair and replace
//! every match in a string. [`NativeRegexEngine`] backs this with the
//! `regex` crate; tests may swap in their own [`RegexEngine`].

use crate::cache;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RegexError {
    #[error("Invalid regex flags '{flags}': {reason}")]
    InvalidFlags { flags: String, reason: String },

    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled rule pattern.
pub trait CompiledRegex {
    /// Replace every match in `subject`.
    ///
    /// `replacement` may reference capture groups (`$1`, `${name}`). A bare
    /// reference takes the longest run of letters, digits and `_` as the
    /// group name, so `$1_x` names a group `1_x` and expands to nothing;
    /// write `${1}_x` for group 1 followed by `_x`. `$$` is a literal `$`.
    fn replace_all(&self, subject: &str, replacement: &str) -> String;

    fn is_match(&self, subject: &str) -> bool;
}

/// Compiles rule patterns.
pub trait RegexEngine {
    fn compile(&self, pattern: &str, flags: &str) -> Result<Box<dyn CompiledRegex>, RegexError>;
}

/// Parsed flag letters.
///
/// `g` is accepted for compatibility; replacement is always global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegexFlags {
    pub global: bool,
    pub multi_line: bool,
    pub case_insensitive: bool,
    pub dot_matches_new_line: bool,
    pub unicode: bool,
    pub indices: bool,
}

impl RegexFlags {
    /// Parse a flag string, rejecting unknown and repeated letters.
    pub fn parse(flags: &str) -> Result<Self, RegexError> {
        let mut parsed = RegexFlags::default();
        let invalid = |reason: String| RegexError::InvalidFlags {
            flags: flags.to_string(),
            reason,
        };

        for ch in flags.chars() {
            let slot = match ch {
                'g' => &mut parsed.global,
                'm' => &mut parsed.multi_line,
                'i' => &mut parsed.case_insensitive,
                's' => &mut parsed.dot_matches_new_line,
                'u' => &mut parsed.unicode,
                'd' => &mut parsed.indices,
                'y' => return Err(invalid("sticky matching ('y') is not supported".to_string())),
                other => return Err(invalid(format!("unknown flag '{other}'"))),
            };
            if *slot {
                return Err(invalid(format!("flag '{ch}' given more than once")));
            }
            *slot = true;
        }

        Ok(parsed)
    }

    fn builder(&self, pattern: &str) -> RegexBuilder {
        let mut builder = RegexBuilder::new(pattern);
        builder
            .multi_line(self.multi_line)
            .case_insensitive(self.case_insensitive)
            .dot_matches_new_line(self.dot_matches_new_line)
            .crlf(self.multi_line);
        builder
    }
}

/// [`RegexEngine`] backed by the `regex` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRegexEngine;

impl NativeRegexEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compile to a concrete [`Regex`], going through the thread-local cache.
    pub fn build(&self, pattern: &str, flags: &str) -> Result<Regex, RegexError> {
        let parsed = RegexFlags::parse(flags)?;
        cache::get_or_compile(pattern, flags, || {
            parsed
                .builder(pattern)
                .build()
                .map_err(|source| RegexError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
        })
    }
}

impl CompiledRegex for Regex {
    fn replace_all(&self, subject: &str, replacement: &str) -> String {
        Regex::replace_all(self, subject, replacement).into_owned()
    }

    fn is_match(&self, subject: &str) -> bool {
        Regex::is_match(self, subject)
    }
}

impl RegexEngine for NativeRegexEngine {
    fn compile(&self, pattern: &str, flags: &str) -> Result<Box<dyn CompiledRegex>, RegexError> {
        Ok(Box::new(self.build(pattern, flags)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let flags = RegexFlags::parse("gmi").unwrap();
        assert!(flags.global);
        assert!(flags.multi_line);
        assert!(flags.case_insensitive);
        assert!(!flags.dot_matches_new_line);
    }

    #[test]
    fn test_parse_empty_flags() {
        assert_eq!(RegexFlags::parse("").unwrap(), RegexFlags::default());
    }

    #[test]
    fn test_reject_unknown_flag() {
        let err = RegexFlags::parse("gq").unwrap_err();
        assert!(matches!(err, RegexError::InvalidFlags { .. }));
    }

    #[test]
    fn test_reject_sticky_and_duplicates() {
        assert!(RegexFlags::parse("y").is_err());
        assert!(RegexFlags::parse("gg").is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = NativeRegexEngine::new().compile("[", "g").err().unwrap();
        assert!(matches!(err, RegexError::InvalidPattern { .. }));
    }

    #[test]
    fn test_replace_all_matches() {
        let regex = NativeRegexEngine::new().compile("o", "").unwrap();
        assert_eq!(regex.replace_all("foo boo", "0"), "f00 b00");
    }

    #[test]
    fn test_case_insensitive_flag() {
        let regex = NativeRegexEngine::new().compile("abc", "gi").unwrap();
        assert_eq!(regex.replace_all("ABC abc", "x"), "x x");
    }

    #[test]
    fn test_multi_line_anchors() {
        let engine = NativeRegexEngine::new();
        let regex = engine.compile("^- ", "gm").unwrap();
        assert_eq!(regex.replace_all("- a\n- b", "* "), "* a\n* b");

        let regex = engine.compile("^- ", "g").unwrap();
        assert_eq!(regex.replace_all("- a\n- b", "* "), "* a\n- b");
    }

    #[test]
    fn test_multi_line_handles_crlf() {
        let regex = NativeRegexEngine::new().compile(" +$", "gm").unwrap();
        assert_eq!(regex.replace_all("a  \r\nb \r\n", ""), "a\r\nb\r\n");
    }

    #[test]
    fn test_dot_all_flag() {
        let engine = NativeRegexEngine::new();
        assert!(engine.compile("a.b", "s").unwrap().is_match("a\nb"));
        assert!(!engine.compile("a.b", "").unwrap().is_match("a\nb"));
    }

    #[test]
    fn test_capture_group_replacement() {
        let regex = NativeRegexEngine::new()
            .compile(r"(\w+)@(\w+)", "g")
            .unwrap();
        assert_eq!(
            regex.replace_all("alice@wonderland bob@builder", "$2@$1"),
            "wonderland@alice builder@bob"
        );
    }

    #[test]
    fn test_group_reference_needs_braces_before_word_chars() {
        let regex = NativeRegexEngine::new().compile(r"(\w+)-(\d+)", "g").unwrap();
        assert_eq!(regex.replace_all("item-42", "${1}_$2"), "item_42");
        assert_eq!(regex.replace_all("item-42", "$1_$2"), "42");
        assert_eq!(regex.replace_all("item-42", "$$1"), "$1");
    }
}
