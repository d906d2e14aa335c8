// src/cli/handlers/create.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::args::{Target, TargetArgs},
    core::{locator, session::Session},
};

/// The main handler for the `create` command.
/// Provisions an environment in the current directory, even when an ancestor
/// already has one. An environment already present here is left alone.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let TargetArgs { target } = TargetArgs::try_parse_from(&args)?;
    match target {
        Target::Env => {
            let name = session.environment_name();
            if locator::has_environment(&session.cwd, name) {
                println!(
                    "{}",
                    format!(
                        t!("create.warn.exists"),
                        name = name,
                        cwd = session.cwd.display()
                    )
                    .yellow()
                );
                return Ok(());
            }

            let handle = session.provision(&session.cwd)?;
            println!(
                t!("create.info.created"),
                path = handle.environment_dir.display().to_string().green()
            );
        }
    }
    Ok(())
}
