//! Configuration management for schoolbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::image::DEFAULT_MAX_IMAGE_BYTES;
use crate::storage::DEFAULT_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "schoolbook";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "schoolbook.db";

/// Image used for schools registered without an upload.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/traditional-schoolhouse.png";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SCHOOLBOOK_`, sections split on `__`)
/// 2. TOML config file at `~/.config/schoolbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Add-school form configuration.
    pub form: FormConfig,
    /// Demonstration data configuration.
    pub seed: SeedConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the key/value database.
    /// Defaults to `~/.local/share/schoolbook/schoolbook.db`
    pub database_path: Option<PathBuf>,
    /// Key the school list is stored under.
    pub key: String,
}

/// Add-school form configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Image recorded when no file is uploaded.
    pub placeholder_image: String,
    /// Largest accepted upload in bytes.
    pub max_image_bytes: u64,
}

/// Demonstration data configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Show the built-in demonstration schools when the store is empty.
    pub demo_records: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Resolved at runtime
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { demo_records: true }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Self::from_figment(Self::figment(config_file))
    }

    /// The layered figment for the given config file.
    #[must_use]
    pub fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("SCHOOLBOOK_").split("__"))
    }

    /// Extract and validate a configuration from a figment.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.key must not be empty".to_string(),
            });
        }

        if self.form.placeholder_image.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "form.placeholder_image must not be empty".to_string(),
            });
        }

        if self.form.max_image_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "form.max_image_bytes must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.storage.key, "schools");
        assert_eq!(config.form.placeholder_image, "/traditional-schoolhouse.png");
        assert_eq!(config.form.max_image_bytes, 5 * 1024 * 1024);
        assert!(config.seed.demo_records);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_key() {
        let mut config = Config::default();
        config.storage.key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("storage.key"));
    }

    #[test]
    fn test_validate_empty_placeholder() {
        let mut config = Config::default();
        config.form.placeholder_image = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("placeholder_image"));
    }

    #[test]
    fn test_validate_zero_image_limit() {
        let mut config = Config::default();
        config.form.max_image_bytes = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("max_image_bytes"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("schoolbook.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("schoolbook"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .expect("defaults should load");
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "schoolbook.toml",
                r#"
                [storage]
                key = "campus"

                [seed]
                demo_records = false
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("schoolbook.toml")))
                .expect("toml should load");
            assert_eq!(config.storage.key, "campus");
            assert!(!config.seed.demo_records);
            assert_eq!(config.form, FormConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("schoolbook.toml", "[storage]\nkey = \"from_file\"\n")?;
            jail.set_env("SCHOOLBOOK_STORAGE__KEY", "from_env");
            jail.set_env("SCHOOLBOOK_FORM__PLACEHOLDER_IMAGE", "/blank.svg");

            let config = Config::load_from(Some(PathBuf::from("schoolbook.toml")))
                .expect("env should load");
            assert_eq!(config.storage.key, "from_env");
            assert_eq!(config.form.placeholder_image, "/blank.svg");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_file_value_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("schoolbook.toml", "[form]\nmax_image_bytes = 0\n")?;

            let result = Config::load_from(Some(PathBuf::from("schoolbook.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("placeholder_image"));
        assert!(json.contains("demo_records"));
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"key": "campus"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.key, "campus");
        assert!(storage.database_path.is_none());
    }
}
