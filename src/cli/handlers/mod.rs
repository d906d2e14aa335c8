// src/cli/handlers/mod.rs

// One module per crowbar verb, plus the fallback for external commands.

/// `check env`
pub mod check;
/// Errors and helpers shared by handlers.
pub mod commons;
/// `create env`
pub mod create;
/// Anything that is not a built-in verb.
pub mod external;
/// `gitignore on|off`
pub mod gitignore;
/// `install` / `add`
pub mod install;
/// `name <name>`
pub mod name;
/// `run <file>`
pub mod run;
/// `show name|gitignore|config`
pub mod show;
/// `uninstall` / `remove` / `rm`
pub mod uninstall;
