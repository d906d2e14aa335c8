// src/cli/handlers/show.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::args::{ShowArgs, ShowField},
    core::session::Session,
};

/// The main handler for the `show` command.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;
    let config = &session.config;

    match show_args.field {
        ShowField::Name => println!("{}", config.environment_name),
        ShowField::Gitignore => println!("{}", on_off(config.gitignore_enabled)),
        ShowField::Config => {
            println!("{}", t!("show.header").bold());
            println!(
                "  {:<20} {}",
                t!("show.label.config_file").blue(),
                session.config_path.display()
            );
            println!(
                "  {:<20} {}",
                t!("show.label.environment_name").blue(),
                config.environment_name
            );
            println!(
                "  {:<20} {}",
                t!("show.label.gitignore").blue(),
                on_off(config.gitignore_enabled)
            );
            println!(
                "  {:<20} {}",
                t!("show.label.backend").blue(),
                session.backend.name()
            );
            println!(
                "  {:<20} {}",
                t!("show.label.python").blue(),
                session.system_python
            );
        }
    }
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
