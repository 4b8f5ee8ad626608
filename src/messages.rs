//! User-facing strings.

pub const NAME_EMPTY_ERR: &str = "Error: Quick action name cannot be empty!";
pub const NAME_INVALID_ERR: &str = "Error: Quick action name cannot be used as a file name!";
pub const NAME_EXISTS_ERR: &str = "Error: An action with this name already exists!";
pub const PATTERN_EMPTY_ERR: &str = "Error: Regex pattern cannot be empty!";
pub const FLAGS_INVALID_ERR: &str = "Error: Invalid regex flags provided!";
pub const REGEX_INVALID_ERR: &str = "Error: Invalid regular expression syntax!";
pub const NO_DEFAULT_ERR: &str = "Error: No default quick action is set!";

pub const FOLDER_ACTION_CONFIRM_TITLE: &str = "Confirm action";
pub const FOLDER_ACTION_CONFIRM_MSG: &str = "Are you sure that you want to run default quick action on every file inside this folder? This action is irreversible.";

pub fn not_found(name: &str) -> String {
    format!("{name} not found!")
}

pub fn executed(name: &str, count: usize) -> String {
    format!("Executed '{name}' with {count} replacements.")
}

pub fn delete_confirm(name: &str) -> String {
    format!("Are you sure you want to delete quick action \"{name}\"?")
}
