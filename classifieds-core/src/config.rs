//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "listingsFile": "listings.txt",
//!   "usersFile": "users.csv",
//!   "autoSave": true
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.json";
const AUTO_SAVE_ENV: &str = "CLASSIFIEDS_AUTO_SAVE";

/// Raw settings.json structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default = "default_listings_file")]
    listings_file: String,
    #[serde(default = "default_users_file")]
    users_file: String,
    #[serde(default = "default_auto_save")]
    auto_save: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            listings_file: default_listings_file(),
            users_file: default_users_file(),
            auto_save: default_auto_save(),
            other: HashMap::new(),
        }
    }
}

fn default_listings_file() -> String {
    "listings.txt".to_string()
}

fn default_users_file() -> String {
    "users.csv".to_string()
}

fn default_auto_save() -> bool {
    true
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listings file name, relative to the data directory
    pub listings_file: String,
    /// Users file name, relative to the data directory
    pub users_file: String,
    /// Write both data files after every change
    pub auto_save: bool,
}

impl Default for Config {
    fn default() -> Self {
        let raw = SettingsFile::default();
        Self {
            listings_file: raw.listings_file,
            users_file: raw.users_file,
            auto_save: raw.auto_save,
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// Auto-save can be forced via the CLASSIFIEDS_AUTO_SAVE environment
    /// variable (for scripting and tests).
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;

        let auto_save = match std::env::var(AUTO_SAVE_ENV).ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.auto_save,
        };

        Ok(Self {
            listings_file: raw.listings_file,
            users_file: raw.users_file,
            auto_save,
        })
    }

    /// Save config to the data directory
    /// Preserves other settings this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join(SETTINGS_FILE);
        let mut settings = read_settings(data_dir)?;

        settings.listings_file = self.listings_file.clone();
        settings.users_file = self.users_file.clone();
        settings.auto_save = self.auto_save;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
        Ok(())
    }

    pub fn enable_auto_save(&mut self) {
        self.auto_save = true;
    }

    pub fn disable_auto_save(&mut self) {
        self.auto_save = false;
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.listings_file, "listings.txt");
        assert_eq!(config.users_file, "users.csv");
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"usersFile": "people.csv", "theme": "dark"}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        assert_eq!(config.users_file, "people.csv");
        assert_eq!(config.listings_file, "listings.txt");

        config.listings_file = "ads.txt".to_string();
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["listingsFile"], "ads.txt");
        assert_eq!(saved["usersFile"], "people.csv");
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.users_file, "users.csv");
    }
}
