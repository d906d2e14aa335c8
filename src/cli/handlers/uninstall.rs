// src/cli/handlers/uninstall.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use super::commons;
use crate::{cli::args::UninstallArgs, core::session::Session, system::package_manager::PackageManager};

/// The main handler for the `uninstall` command.
/// Removes packages without prompting, then rewrites the manifest.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let uninstall_args = UninstallArgs::try_parse_from(&args)?;
    let packages = uninstall_args.packages;

    if session.global {
        println!(
            t!("uninstall.info.global"),
            packages = commons::join_names(&packages).cyan()
        );
        session
            .global_package_manager()
            .uninstall(&session.runner(), &packages)?;
        return Ok(());
    }

    let handle = session.resolve_environment()?;
    println!(
        t!("uninstall.info.uninstalling"),
        packages = commons::join_names(&packages).cyan(),
        name = session.environment_name()
    );
    let package_manager = session.package_manager(&handle);
    package_manager.uninstall(&session.runner(), &packages)?;
    commons::sync_after_mutation(session, &handle, package_manager.as_ref())?;
    Ok(())
}
