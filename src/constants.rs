// src/constants.rs

/// Name of the per-user configuration directory (inside the OS config dir).
pub const APP_DIR_NAME: &str = "crowbar";

/// Name of the settings file inside the configuration directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment name used when nothing has been configured.
pub const DEFAULT_ENVIRONMENT_NAME: &str = "venv";

/// The dependency manifest kept in the project root.
pub const MANIFEST_FILENAME: &str = "requirements.txt";

/// The version-control ignore file updated after provisioning.
pub const GITIGNORE_FILENAME: &str = ".gitignore";

/// Overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "CROWBAR_CONFIG_DIR";

/// Overrides the system interpreter used for `-m venv` and global mode.
pub const PYTHON_ENV: &str = "CROWBAR_PYTHON";

/// Forces the package-manager backend (`venv` or `conda`).
pub const BACKEND_ENV: &str = "CROWBAR_BACKEND";

/// Log filter read by `env_logger`.
pub const LOG_ENV: &str = "CROWBAR_LOG";

/// File extensions treated as runnable Python scripts.
pub const SCRIPT_EXTENSIONS: &[&str] = &["py", "pyw"];

/// Executables every freshly created environment provides. An unknown command
/// outside any environment only triggers provisioning when it is one of these.
pub const BOOTSTRAP_EXECUTABLES: &[&str] = &["python", "python3", "pip", "pip3"];
