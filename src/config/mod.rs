pub mod loader;
pub mod schema;

pub use loader::{load_from_path, load_from_str, save_to_path, SettingsError, SETTINGS_FILE};
pub use schema::Settings;
