// src/bin/crowbar.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use crowbar::{
    CancellationToken,
    cli::{Cli, dispatcher},
    constants::LOG_ENV,
    core::session::Session,
    system::executor::ExecutionError,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// The main entry point of `crowbar` (also installed as `cb`).
/// It sets up logging and the Ctrl+C listener, dispatches the request and
/// performs centralized error handling.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn")).init();

    let cancellation_token = Arc::new(AtomicBool::new(false));
    listen_for_interrupt(cancellation_token.clone());

    if let Err(e) = run_cli(Cli::parse(), cancellation_token) {
        // An interrupted child already told the user what happened.
        let interrupted = e.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<ExecutionError>(),
                Some(ExecutionError::Interrupted(_))
            )
        });
        if interrupted {
            std::process::exit(130);
        }

        eprintln!("\n{}: {}", "Error".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        std::process::exit(1);
    }
}

/// Raises the token on Ctrl+C. The executor notices it, stops the running
/// child and reports the interruption.
fn listen_for_interrupt(cancellation_token: CancellationToken) {
    let spawned = thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    log::warn!("Could not start the Ctrl+C listener: {}", e);
                    return;
                }
            };
            runtime.block_on(async {
                loop {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        log::warn!("Ctrl+C listener stopped: {}", e);
                        return;
                    }
                    log::debug!("Ctrl+C received");
                    cancellation_token.store(true, Ordering::SeqCst);
                }
            });
        });
    if let Err(e) = spawned {
        log::warn!("Could not spawn the Ctrl+C listener: {}", e);
    }
}

/// Builds the session once and hands the request to the dispatcher.
fn run_cli(cli: Cli, cancellation_token: CancellationToken) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let mut session = Session::from_env(cli.global, cancellation_token)?;
    dispatcher::dispatch(cli.into_request(), &mut session)
}
