//! One invocable command per ruleset.
//!
//! The registry is owned by the application layer and follows
//! [`RulesetEvent`]s; the engine itself never registers anything.

use crate::pipeline::RulesetEvent;
use std::collections::BTreeMap;

/// Prefix of every ruleset command id.
pub const COMMAND_PREFIX: &str = "apply-ruleset";

/// A registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHandle {
    /// Stable id, `apply-ruleset:<name>`
    pub id: String,
    /// Label shown in the command palette
    pub label: String,
}

impl CommandHandle {
    fn for_ruleset(name: &str) -> Self {
        Self {
            id: format!("{COMMAND_PREFIX}:{name}"),
            label: format!("Apply ruleset: {name}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    handles: BTreeMap<String, CommandHandle>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one command per ruleset name.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a String>) -> Self {
        let mut registry = Self::new();
        for name in names {
            registry.register(name);
        }
        registry
    }

    fn register(&mut self, name: &str) {
        self.handles
            .insert(name.to_string(), CommandHandle::for_ruleset(name));
    }

    /// Follow a ruleset lifecycle change.
    pub fn handle_event(&mut self, event: &RulesetEvent) {
        match event {
            RulesetEvent::Added(name) => self.register(name),
            RulesetEvent::Renamed { from, to } => {
                self.handles.remove(from);
                self.register(to);
            }
            RulesetEvent::Removed(name) => {
                self.handles.remove(name);
            }
            RulesetEvent::Updated(_) => {}
        }
    }

    pub fn get(&self, ruleset: &str) -> Option<&CommandHandle> {
        self.handles.get(ruleset)
    }

    /// Ruleset behind a command id.
    pub fn resolve(&self, id: &str) -> Option<&str> {
        let name = id.strip_prefix(COMMAND_PREFIX)?.strip_prefix(':')?;
        self.handles.get_key_value(name).map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandHandle)> {
        self.handles.iter().map(|(name, handle)| (name.as_str(), handle))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_lifecycle() {
        let names = vec!["a".to_string()];
        let mut registry = CommandRegistry::from_names(&names);
        assert_eq!(registry.len(), 1);

        registry.handle_event(&RulesetEvent::Added("b".into()));
        registry.handle_event(&RulesetEvent::Renamed {
            from: "a".into(),
            to: "c".into(),
        });
        registry.handle_event(&RulesetEvent::Updated("c".into()));
        assert!(registry.get("a").is_none());
        assert_eq!(registry.get("c").unwrap().id, "apply-ruleset:c");

        registry.handle_event(&RulesetEvent::Removed("b".into()));
        let remaining: Vec<_> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(remaining, vec!["c"]);
    }

    #[test]
    fn test_resolve_id() {
        let names = vec!["tidy up".to_string()];
        let registry = CommandRegistry::from_names(&names);
        assert_eq!(registry.resolve("apply-ruleset:tidy up"), Some("tidy up"));
        assert_eq!(registry.resolve("apply-ruleset:other"), None);
        assert_eq!(registry.resolve("something-else"), None);
    }
}
