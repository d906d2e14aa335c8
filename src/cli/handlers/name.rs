// src/cli/handlers/name.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use super::commons::CommandError;
use crate::{cli::args::NameArgs, core::config_store, core::session::Session};

/// The main handler for the `name` command.
/// Changes the environment directory name used from now on. Existing
/// environments are neither renamed nor searched for.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let name_args = NameArgs::try_parse_from(&args)?;
    let new_name = name_args.name.trim().to_string();

    if !config_store::is_valid_environment_name(&new_name) {
        return Err(CommandError::InvalidEnvironmentName { name: new_name }.into());
    }

    session.config.environment_name = new_name;
    session
        .save_config()
        .with_context(|| format!("Could not save '{}'", session.config_path.display()))?;

    println!(
        t!("name.info.updated"),
        name = session.environment_name().green()
    );
    Ok(())
}
