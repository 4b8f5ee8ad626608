use serde::{Deserialize, Serialize};

fn default_confirm_folder_action() -> bool {
    true
}

/// Persisted plugin settings.
///
/// `rules` mirrors the ruleset directory, in the order rulesets were
/// created. `default_rule` is a name reference only: it is re-checked
/// against storage before every use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub default_rule: Option<String>,
    #[serde(default = "default_confirm_folder_action")]
    pub confirm_folder_action: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            default_rule: None,
            confirm_folder_action: default_confirm_folder_action(),
        }
    }
}

impl Settings {
    pub fn contains_rule(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule == name)
    }

    /// Append `name` unless already listed. Returns whether it was added.
    pub fn add_rule(&mut self, name: &str) -> bool {
        if self.contains_rule(name) {
            return false;
        }
        self.rules.push(name.to_string());
        true
    }

    /// Rename a listed ruleset in place, keeping its position, and let the
    /// default pointer follow it.
    pub fn rename_rule(&mut self, old_name: &str, new_name: &str) {
        match self.rules.iter().position(|rule| rule == old_name) {
            Some(idx) => self.rules[idx] = new_name.to_string(),
            None => {
                self.add_rule(new_name);
            }
        }
        if self.default_rule.as_deref() == Some(old_name) {
            self.default_rule = Some(new_name.to_string());
        }
    }

    /// Drop a ruleset from the list, clearing the default if it pointed there.
    pub fn remove_rule(&mut self, name: &str) {
        self.rules.retain(|rule| rule != name);
        if self.default_rule.as_deref() == Some(name) {
            self.default_rule = None;
        }
    }

    /// Reconcile the list with the names actually present in storage.
    ///
    /// Listed names whose file vanished are dropped, unlisted files are
    /// appended in the given order, and a dangling default is cleared.
    /// Returns whether anything changed.
    pub fn sync_with(&mut self, stored: &[String]) -> bool {
        let before = self.clone();

        self.rules.retain(|rule| stored.contains(rule));
        for name in stored {
            self.add_rule(name);
        }
        if let Some(default) = &self.default_rule {
            if !self.contains_rule(default) {
                self.default_rule = None;
            }
        }

        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.rules.is_empty());
        assert_eq!(settings.default_rule, None);
        assert!(settings.confirm_folder_action);
    }

    #[test]
    fn test_json_keys_are_camel_case() {
        let settings = Settings {
            rules: vec!["tidy".to_string()],
            default_rule: Some("tidy".to_string()),
            confirm_folder_action: false,
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rules": ["tidy"],
                "defaultRule": "tidy",
                "confirmFolderAction": false
            })
        );
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"rules": ["a"]}"#).unwrap();
        assert_eq!(settings.rules, vec!["a".to_string()]);
        assert_eq!(settings.default_rule, None);
        assert!(settings.confirm_folder_action);
    }

    #[test]
    fn test_rename_keeps_position_and_default() {
        let mut settings = Settings {
            rules: vec!["a".into(), "b".into(), "c".into()],
            default_rule: Some("b".into()),
            confirm_folder_action: true,
        };
        settings.rename_rule("b", "bee");
        assert_eq!(settings.rules, vec!["a", "bee", "c"]);
        assert_eq!(settings.default_rule.as_deref(), Some("bee"));
    }

    #[test]
    fn test_remove_clears_default() {
        let mut settings = Settings {
            rules: vec!["a".into(), "b".into()],
            default_rule: Some("a".into()),
            confirm_folder_action: true,
        };
        settings.remove_rule("a");
        assert_eq!(settings.rules, vec!["b"]);
        assert_eq!(settings.default_rule, None);

        settings.default_rule = Some("b".into());
        settings.remove_rule("a");
        assert_eq!(settings.default_rule.as_deref(), Some("b"));
    }

    #[test]
    fn test_sync_with_storage() {
        let mut settings = Settings {
            rules: vec!["gone".into(), "kept".into()],
            default_rule: Some("gone".into()),
            confirm_folder_action: true,
        };
        let stored = vec!["kept".to_string(), "new".to_string()];

        assert!(settings.sync_with(&stored));
        assert_eq!(settings.rules, vec!["kept", "new"]);
        assert_eq!(settings.default_rule, None);
        assert!(!settings.sync_with(&stored));
    }
}
