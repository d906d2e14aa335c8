//! # Config Store
//!
//! Loads and saves the user's [`Configuration`]. Loading never fails: a missing
//! file yields the defaults, and an unreadable or corrupt one is logged and
//! replaced by the defaults. Saving is a total overwrite done through a temporary
//! file in the same directory, so the settings file is either the old version or
//! the new one, never a truncated mix.

use crate::constants::DEFAULT_ENVIRONMENT_NAME;
use crate::core::paths;
use crate::models::Configuration;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Failure reading or writing `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Filesystem access failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for [`Configuration`].
    #[error("Failed to parse config file: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// The settings could not be serialized.
    #[error("Failed to serialize config to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// The temporary file could not replace the old one.
    #[error("Could not replace the config file: {0}")]
    Persist(#[from] tempfile::PersistError),
    /// The path has no directory to write into.
    #[error("Config file path '{0}' has no parent directory.")]
    NoParentDir(String),
}

/// Reads the configuration at `path`, falling back to defaults on any problem.
pub fn load(path: &Path) -> Configuration {
    if !path.exists() {
        log::debug!("No config file at '{}', using defaults.", path.display());
        return Configuration::default();
    }

    match try_load(path) {
        Ok(mut config) => {
            if !is_valid_environment_name(&config.environment_name) {
                log::warn!(
                    "Ignoring invalid environment name '{}' in '{}'; using '{}'.",
                    config.environment_name,
                    path.display(),
                    DEFAULT_ENVIRONMENT_NAME
                );
                config.environment_name = DEFAULT_ENVIRONMENT_NAME.to_string();
            }
            config
        }
        Err(e) => {
            log::warn!(
                "Could not read config '{}', using defaults: {}",
                path.display(),
                e
            );
            Configuration::default()
        }
    }
}

fn try_load(path: &Path) -> Result<Configuration, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Writes `config` to `path`, creating the containing directory if needed.
pub fn save(path: &Path, config: &Configuration) -> Result<(), ConfigError> {
    let dir = path
        .parent()
        .ok_or_else(|| ConfigError::NoParentDir(path.display().to_string()))?;
    fs::create_dir_all(dir)?;

    let toml_string = toml::to_string_pretty(config)?;
    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(toml_string.as_bytes())?;
    temp_file.flush()?;
    temp_file.persist(path)?;

    log::debug!("Saved config to '{}'.", path.display());
    Ok(())
}

/// An environment name must be exactly one plain path component.
pub fn is_valid_environment_name(name: &str) -> bool {
    paths::is_plain_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = load(&dir.path().join("config.toml"));
        assert_eq!(config, Configuration::default());
        assert_eq!(config.environment_name, "venv");
        assert!(config.gitignore_enabled);
    }

    #[test]
    fn test_load_corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "environment_name = [not toml").unwrap();

        assert_eq!(load(&path), Configuration::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "gitignore_enabled = false\nunknown_key = 3\n").unwrap();

        let config = load(&path);
        assert_eq!(config.environment_name, "venv");
        assert!(!config.gitignore_enabled);
    }

    #[test]
    fn test_load_rejects_path_like_environment_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "environment_name = \"../escape\"\n").unwrap();

        assert_eq!(load(&path).environment_name, "venv");
    }

    #[test]
    fn test_save_creates_directory_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("crowbar").join("config.toml");

        let first = Configuration {
            environment_name: ".venv".to_string(),
            gitignore_enabled: false,
        };
        save(&path, &first).unwrap();
        assert_eq!(load(&path), first);

        save(&path, &Configuration::default()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("environment_name = \"venv\""));
        assert!(!content.contains(".venv"));
    }

    #[test]
    fn test_environment_name_validation() {
        assert!(is_valid_environment_name("venv"));
        assert!(is_valid_environment_name(".venv"));
        assert!(!is_valid_environment_name(""));
        assert!(!is_valid_environment_name("."));
        assert!(!is_valid_environment_name(".."));
        assert!(!is_valid_environment_name("a/b"));
        assert!(!is_valid_environment_name("/venv"));
    }
}
