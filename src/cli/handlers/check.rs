// src/cli/handlers/check.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::{
    cli::args::{Target, TargetArgs},
    core::session::Session,
};

/// Result of a read-only environment lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentStatus {
    /// Name that was searched for.
    pub environment_name: String,
    /// Directory holding the environment, if one was found.
    pub root_directory: Option<PathBuf>,
}

/// Looks for the configured environment without creating anything.
pub fn environment_status(session: &Session) -> EnvironmentStatus {
    EnvironmentStatus {
        environment_name: session.environment_name().to_string(),
        root_directory: session.locate().map(|found| found.root_directory),
    }
}

/// The main handler for the `check` command.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let TargetArgs { target } = TargetArgs::try_parse_from(&args)?;
    match target {
        Target::Env => {
            let status = environment_status(session);
            match &status.root_directory {
                Some(root) => println!(
                    t!("check.info.found"),
                    name = status.environment_name.cyan(),
                    root = root.display()
                ),
                None => println!(
                    t!("check.info.none"),
                    name = status.environment_name.cyan(),
                    cwd = session.cwd.display()
                ),
            }
        }
    }
    Ok(())
}
