// src/cli/handlers/gitignore.rs

use anyhow::{Context, Result};
use clap::Parser;

use crate::{cli::args::GitignoreArgs, core::session::Session};

/// The main handler for the `gitignore` command.
/// Toggles whether new environments are added to `.gitignore`.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let gitignore_args = GitignoreArgs::try_parse_from(&args)?;
    session.config.gitignore_enabled = gitignore_args.state.enabled();
    session
        .save_config()
        .with_context(|| format!("Could not save '{}'", session.config_path.display()))?;

    if session.config.gitignore_enabled {
        println!("{}", t!("gitignore.info.enabled"));
    } else {
        println!("{}", t!("gitignore.info.disabled"));
    }
    Ok(())
}
