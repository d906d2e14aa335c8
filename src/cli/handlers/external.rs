// src/cli/handlers/external.rs

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::commons::CommandError;
use crate::{
    constants::{BOOTSTRAP_EXECUTABLES, SCRIPT_EXTENSIONS},
    core::{paths, session::Session},
    models::EnvironmentHandle,
    system::executor::ExecutionError,
};

/// How an external command will be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalTarget {
    /// An executable from the environment's scripts directory.
    EnvironmentExecutable(PathBuf),
    /// A Python file run by the environment interpreter.
    Script(PathBuf),
}

/// Handles any verb that is not built in.
///
/// Global mode runs it straight from `PATH`. Otherwise the environment is
/// resolved (and created if needed), and the command is taken from the
/// environment's scripts directory or, if it names a Python file, run with
/// the environment interpreter. A command that not even a new environment
/// could provide fails before anything is created.
pub fn handle(command: &str, args: Vec<String>, session: &mut Session) -> Result<()> {
    if session.global {
        return match session.runner().run(command, &args) {
            Err(ExecutionError::NotFound(_)) => Err(not_found(command)),
            other => Ok(other?),
        };
    }

    if session.locate().is_none() && !could_come_from_new_environment(command, session) {
        log::debug!("No environment and '{}' is not a bootstrap executable", command);
        return Err(not_found(command));
    }

    let handle = session.resolve_environment()?;
    match find_target(command, &handle, session) {
        Some(ExternalTarget::EnvironmentExecutable(executable)) => {
            log::debug!("Using '{}' from the environment", executable.display());
            session.runner().run(&executable, &args)?;
        }
        Some(ExternalTarget::Script(script)) => {
            log::debug!("Running '{}' as a script", script.display());
            let mut script_args = vec![script.into_os_string()];
            script_args.extend(args.into_iter().map(Into::into));
            session.runner().run(&handle.interpreter_path, &script_args)?;
        }
        None => return Err(not_found(command)),
    }
    Ok(())
}

/// Decides what `command` refers to inside the environment.
///
/// Only a plain name is looked up in the scripts directory; paths never
/// resolve to an environment executable.
pub fn find_target(command: &str, handle: &EnvironmentHandle, session: &Session) -> Option<ExternalTarget> {
    if paths::is_plain_name(command) {
        let executable = session.layout.executable(&handle.scripts_directory, command);
        if executable.is_file() {
            return Some(ExternalTarget::EnvironmentExecutable(executable));
        }
        let bare = handle.scripts_directory.join(command);
        if bare.is_file() {
            return Some(ExternalTarget::EnvironmentExecutable(bare));
        }
    }

    if is_existing_script(command, session) {
        return Some(ExternalTarget::Script(PathBuf::from(command)));
    }
    None
}

/// A `.py`/`.pyw` file name.
pub fn looks_like_script(command: &str) -> bool {
    Path::new(command)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SCRIPT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

fn is_existing_script(command: &str, session: &Session) -> bool {
    looks_like_script(command) && session.cwd.join(command).is_file()
}

fn could_come_from_new_environment(command: &str, session: &Session) -> bool {
    BOOTSTRAP_EXECUTABLES.contains(&command) || is_existing_script(command, session)
}

fn not_found(command: &str) -> anyhow::Error {
    CommandError::CommandNotFound {
        name: command.to_string(),
    }
    .into()
}
