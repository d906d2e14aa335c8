// src/core/paths.rs

use crate::constants::{APP_DIR_NAME, CONFIG_DIR_ENV, CONFIG_FILENAME};
use lazy_static::lazy_static;
use std::env;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

lazy_static! {
    static ref SYSTEM_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Failure locating the configuration directory.
#[derive(Error, Debug)]
pub enum PathError {
    /// The OS reports no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The override variable could not be expanded.
    #[error("Could not expand '{value}' from {variable}: {reason}")]
    Expansion {
        /// Name of the variable.
        variable: &'static str,
        /// Its raw value.
        value: String,
        /// What went wrong.
        reason: String,
    },
}

/// Returns the crowbar configuration directory.
///
/// `CROWBAR_CONFIG_DIR` wins when set (with `~` and `$VAR` expanded).
/// Otherwise this is `<os config dir>/crowbar`, computed once and memoized.
/// The directory is not created here; saving the config does that.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    if let Ok(raw) = env::var(CONFIG_DIR_ENV) {
        if !raw.trim().is_empty() {
            let expanded = shellexpand::full(&raw).map_err(|e| PathError::Expansion {
                variable: CONFIG_DIR_ENV,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            return Ok(PathBuf::from(expanded.into_owned()));
        }
    }

    let mut cached_path_guard = SYSTEM_CONFIG_DIR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(APP_DIR_NAME);
    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path to `config.toml`.
pub fn get_config_file_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// True when `name` is exactly one plain path component: no separators, no
/// root, no `.` or `..`.
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_plain_name() {
        assert!(is_plain_name("venv"));
        assert!(is_plain_name(".venv"));
        assert!(!is_plain_name(""));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name("/bin/echo"));
        assert!(!is_plain_name("../bin/tool"));
        assert!(!is_plain_name("sub/tool"));
        assert!(!is_plain_name("tool/"));
    }
}
