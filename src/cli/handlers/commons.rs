// src/cli/handlers/commons.rs

// Errors and helpers shared by several handlers.

use colored::Colorize;
use std::path::Path;
use thiserror::Error;

use crate::{
    core::{
        manifest::{self, SyncError},
        session::Session,
    },
    models::{EnvironmentHandle, Manifest},
    system::package_manager::PackageManager,
};

/// User input that points at something that does not exist.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Bare `install` with no `requirements.txt` to read.
    #[error("No packages given and no manifest found at '{path}'.")]
    NoManifest { path: String },
    /// `run` was given a file that does not exist.
    #[error("The file '{path}' does not exist.")]
    ScriptNotFound { path: String },
    /// An external command that nothing provides.
    #[error("'{name}' is not a crowbar command, an executable of the environment or a script.")]
    CommandNotFound { name: String },
    /// `name` was given more than one path component.
    #[error("'{name}' is not a valid environment name (use a single directory name).")]
    InvalidEnvironmentName { name: String },
}

/// Regenerates the manifest after a successful install or uninstall.
///
/// A failure here is only a warning: the package change already happened and
/// is not rolled back. Ctrl+C during the query is still an interruption and
/// is returned as an error.
pub fn sync_after_mutation(
    session: &Session,
    handle: &EnvironmentHandle,
    package_manager: &dyn PackageManager,
) -> Result<Option<Manifest>, SyncError> {
    let manifest_path = Session::manifest_path(&handle.root_directory);
    match manifest::sync(package_manager, &session.runner(), &manifest_path) {
        Err(e) if e.is_interrupted() => Err(e),
        Ok(manifest) => {
            println!(
                t!("sync.info.updated"),
                file = display_relative(&manifest_path, &session.cwd),
                count = manifest.entries.len()
            );
            Ok(Some(manifest))
        }
        Err(e) => {
            log::warn!("Manifest sync failed: {}", e);
            eprintln!(
                "{}",
                format!(
                    t!("sync.warn.failed"),
                    file = manifest_path.display(),
                    error = e
                )
                .yellow()
            );
            Ok(None)
        }
    }
}

/// `path` relative to `base` when it lies underneath it, for shorter messages.
pub fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

/// Joins operands for progress messages.
pub fn join_names(names: &[String]) -> String {
    names.join(" ")
}
