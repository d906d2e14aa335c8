//! crowbar finds the Python environment of the current project, creating it
//! when there is none, and runs package managers and scripts inside it.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Raised by the Ctrl+C listener; polled by the process executor.
pub type CancellationToken = Arc<AtomicBool>;

/// Command-line parsing and verb handlers.
pub mod cli;
/// File names, defaults and environment variables.
pub mod constants;
/// Environment resolution, settings and the manifest.
pub mod core;
/// Plain data shared across modules.
pub mod models;
/// Child processes and package managers.
pub mod system;
