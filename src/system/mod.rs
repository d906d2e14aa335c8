//! # System Interaction Layer
//!
//! Boundary between crowbar's resolution logic and the external tools it drives.
//!
//! ## Modules
//!
//! - **`executor`**: spawns child processes for one invocation, with inherited
//!   stdio, `Ctrl+C` cancellation, output capture and the `cmd /C` fallback on
//!   Windows.
//! - **`package_manager`**: the `PackageManager` capability (`install`,
//!   `uninstall`, `freeze`) implemented for pip and conda, plus `BackendKind`,
//!   which creates environments and picks the right implementation.

/// Child process execution.
pub mod executor;
/// pip and conda.
pub mod package_manager;
