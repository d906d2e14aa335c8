// src/cli/handlers/run.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use super::commons::CommandError;
use crate::{cli::args::RunArgs, core::session::Session};

/// The main handler for the `run` command.
/// Executes a Python file with the project interpreter (or the system one in
/// global mode), forwarding any extra arguments.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;

    if !session.cwd.join(&run_args.file).is_file() {
        return Err(CommandError::ScriptNotFound {
            path: run_args.file,
        }
        .into());
    }

    let interpreter: PathBuf = if session.global {
        session.system_python.clone().into()
    } else {
        session.resolve_environment()?.interpreter_path
    };

    println!(
        "{}",
        format!(
            t!("run.info.running"),
            file = run_args.file,
            interpreter = interpreter.display()
        )
        .dimmed()
    );

    let mut script_args = vec![run_args.file];
    script_args.extend(run_args.args);
    session.runner().run(&interpreter, &script_args)?;
    Ok(())
}
