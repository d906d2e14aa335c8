// src/core/provisioner.rs

use crate::constants::GITIGNORE_FILENAME;
use crate::core::layout::BinaryLayout;
use crate::models::{EnvironmentHandle, EnvironmentRef};
use crate::system::executor::{ExecutionError, ProcessRunner};
use crate::system::package_manager::BackendKind;
use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Failure making an environment usable.
#[derive(Error, Debug)]
pub enum ProvisioningError {
    /// The environment creator failed.
    #[error("Could not create environment at '{path}': {source}")]
    Creation {
        /// Environment directory.
        path: String,
        /// Why the creator failed.
        #[source]
        source: ExecutionError,
    },
}

/// Everything `ensure` needs besides the target location.
#[derive(Debug, Clone, Copy)]
pub struct ProvisionOptions<'a> {
    /// Creates the environment.
    pub backend: &'a BackendKind,
    /// Where the interpreter is expected.
    pub layout: &'a BinaryLayout,
    /// Interpreter used by `-m venv`.
    pub system_python: &'a str,
    /// Add the new environment to `.gitignore`.
    pub gitignore_enabled: bool,
}

/// Makes sure `root_directory/environment_name` is a usable environment.
///
/// A missing environment is created with the backend's creator. A directory
/// whose interpreter is missing (left behind by an interrupted creation) is
/// handed to the creator again. Nothing is cleaned up when creation fails.
pub fn ensure(
    root_directory: &Path,
    environment_name: &str,
    options: ProvisionOptions<'_>,
    runner: &ProcessRunner,
) -> Result<EnvironmentHandle, ProvisioningError> {
    let reference = EnvironmentRef::new(root_directory, environment_name);
    let handle = EnvironmentHandle::from_reference(&reference, options.layout);

    let exists = handle.environment_dir.is_dir();
    if exists && handle.interpreter_path.exists() {
        log::debug!("Environment ready at '{}'", handle.environment_dir.display());
        return Ok(handle);
    }

    if exists {
        println!(
            "{}",
            format!(
                t!("provision.info.repairing"),
                name = environment_name,
                path = handle.environment_dir.display()
            )
            .yellow()
        );
    } else {
        println!(
            t!("provision.info.creating"),
            name = environment_name.cyan(),
            backend = options.backend.name()
        );
    }

    options
        .backend
        .create_environment(options.system_python, &handle.environment_dir, runner)
        .map_err(|source| ProvisioningError::Creation {
            path: handle.environment_dir.display().to_string(),
            source,
        })?;

    if options.gitignore_enabled {
        match register_in_gitignore(root_directory, environment_name) {
            Ok(true) => println!(
                t!("provision.info.gitignore_added"),
                name = environment_name,
                file = GITIGNORE_FILENAME
            ),
            Ok(false) => log::debug!("'{}' already ignored.", environment_name),
            Err(e) => {
                log::warn!("Could not update {}: {}", GITIGNORE_FILENAME, e);
                eprintln!(
                    "{}",
                    format!(
                        t!("provision.warn.gitignore_failed"),
                        file = GITIGNORE_FILENAME,
                        error = e
                    )
                    .yellow()
                );
            }
        }
    }

    Ok(handle)
}

/// Appends `entry` to `<directory>/.gitignore` unless it is already listed.
///
/// `venv`, `venv/`, `/venv` and `/venv/` all count as the same entry. Returns
/// whether the file was changed.
pub fn register_in_gitignore(directory: &Path, entry: &str) -> io::Result<bool> {
    let path = directory.join(GITIGNORE_FILENAME);
    let existing = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    let already_listed = existing
        .lines()
        .map(|line| line.trim().trim_start_matches('/').trim_end_matches('/'))
        .any(|line| line == entry);
    if already_listed {
        return Ok(false);
    }

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    writeln!(file, "{}", entry)?;
    Ok(true)
}
