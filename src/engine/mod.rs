//! Sequential rule application.

pub mod matcher;
pub mod processor;

pub use matcher::{CompiledRegex, NativeRegexEngine, RegexEngine, RegexError, RegexFlags};
pub use processor::{ApplicationResult, RuleEngine};
