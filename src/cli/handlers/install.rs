// src/cli/handlers/install.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use super::commons::{self, CommandError};
use crate::{
    cli::args::InstallArgs,
    constants::MANIFEST_FILENAME,
    core::{manifest::normalize_name, session::Session},
    models::ManifestEntry,
    system::package_manager::PackageManager,
};

/// The main handler for the `install` command.
///
/// With package names: install into the project environment (created if
/// needed), then rewrite the manifest. Without names: install from the
/// manifest and leave it as it is. A bare `install` with neither an
/// environment nor a manifest fails before anything is created.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let install_args = InstallArgs::try_parse_from(&args)?;
    let packages = install_args.packages;

    if session.global {
        return install_globally(session, &packages);
    }

    if packages.is_empty() {
        let root = session
            .locate()
            .map(|found| found.root_directory)
            .unwrap_or_else(|| session.cwd.clone());
        let manifest_path = Session::manifest_path(&root);
        if !manifest_path.is_file() {
            return Err(CommandError::NoManifest {
                path: manifest_path.display().to_string(),
            }
            .into());
        }

        let handle = session.resolve_environment()?;
        println!(
            t!("install.info.from_manifest"),
            file = commons::display_relative(&manifest_path, &session.cwd)
        );
        session
            .package_manager(&handle)
            .install_from_manifest(&session.runner(), &manifest_path)?;
        return Ok(());
    }

    let handle = session.resolve_environment()?;
    println!(
        t!("install.info.installing"),
        packages = commons::join_names(&packages).cyan()
    );
    let package_manager = session.package_manager(&handle);
    package_manager.install(&session.runner(), &packages)?;

    if let Some(manifest) = commons::sync_after_mutation(session, &handle, package_manager.as_ref())? {
        for name in requested_names(&packages) {
            if !manifest.contains(&name) {
                log::warn!("'{}' not listed in the regenerated manifest.", name);
            }
        }
    }
    Ok(())
}

fn install_globally(session: &Session, packages: &[String]) -> Result<()> {
    let pip = session.global_package_manager();
    if packages.is_empty() {
        let manifest_path = session.cwd.join(MANIFEST_FILENAME);
        if !manifest_path.is_file() {
            return Err(CommandError::NoManifest {
                path: manifest_path.display().to_string(),
            }
            .into());
        }
        println!(
            t!("install.info.global_from_manifest"),
            file = MANIFEST_FILENAME
        );
        pip.install_from_manifest(&session.runner(), &manifest_path)?;
    } else {
        println!(
            t!("install.info.global"),
            packages = commons::join_names(packages).cyan()
        );
        pip.install(&session.runner(), packages)?;
    }
    Ok(())
}

/// Distribution names from install operands, skipping pip options.
fn requested_names(operands: &[String]) -> Vec<String> {
    operands
        .iter()
        .filter_map(|operand| ManifestEntry::parse_line(operand))
        .filter(|entry| !entry.version_spec.starts_with(':'))
        .map(|entry| normalize_name(&entry.package_name))
        .collect()
}
