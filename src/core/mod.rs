// src/core/mod.rs

/// Loading and saving user settings.
pub mod config_store;
/// Per-platform executable locations.
pub mod layout;
/// Upward search for an existing environment.
pub mod locator;
/// `requirements.txt` parsing and regeneration.
pub mod manifest;
/// Configuration directory resolution.
pub mod paths;
/// Environment creation and repair.
pub mod provisioner;
/// Per-invocation state.
pub mod session;
