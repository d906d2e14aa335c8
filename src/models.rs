// src/models.rs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::DEFAULT_ENVIRONMENT_NAME;
use crate::core::layout::BinaryLayout;

// --- PERSISTED SETTINGS ---

/// User settings stored in `config.toml`.
///
/// Every key is optional on disk; anything missing takes its default and
/// unknown keys are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// Directory name searched for (and created) as the project environment.
    pub environment_name: String,
    /// Whether a freshly provisioned environment is added to `.gitignore`.
    pub gitignore_enabled: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            environment_name: DEFAULT_ENVIRONMENT_NAME.to_string(),
            gitignore_enabled: true,
        }
    }
}

// --- ENVIRONMENT MODELS ---

/// An environment found on disk: `root_directory/environment_name` exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentRef {
    /// Directory that contains the environment.
    pub root_directory: PathBuf,
    /// Name of the environment directory.
    pub environment_name: String,
}

impl EnvironmentRef {
    /// Reference to `root_directory/environment_name`.
    pub fn new(root_directory: impl Into<PathBuf>, environment_name: impl Into<String>) -> Self {
        Self {
            root_directory: root_directory.into(),
            environment_name: environment_name.into(),
        }
    }

    /// The environment directory itself.
    pub fn environment_dir(&self) -> PathBuf {
        self.root_directory.join(&self.environment_name)
    }
}

/// Executable locations inside a provisioned environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentHandle {
    /// Project root; the manifest lives here.
    pub root_directory: PathBuf,
    /// `root_directory/environment_name`.
    pub environment_dir: PathBuf,
    /// The environment's `python`.
    pub interpreter_path: PathBuf,
    /// The environment's `pip`.
    pub package_manager_path: PathBuf,
    /// `bin/` or `Scripts/`.
    pub scripts_directory: PathBuf,
}

impl EnvironmentHandle {
    /// Derives every path from the reference and the platform's binary layout.
    pub fn from_reference(reference: &EnvironmentRef, layout: &BinaryLayout) -> Self {
        let environment_dir = reference.environment_dir();
        let scripts_directory = environment_dir.join(layout.bin_subdir);
        Self {
            root_directory: reference.root_directory.clone(),
            interpreter_path: layout.executable(&scripts_directory, "python"),
            package_manager_path: layout.executable(&scripts_directory, "pip"),
            environment_dir,
            scripts_directory,
        }
    }
}

// --- MANIFEST ---

/// One requirement line, e.g. `requests==2.32.3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Distribution name as written.
    pub package_name: String,
    /// Everything after the name (`==2.32.3`, `@ file:///...`, `=1.0=py_0`).
    pub version_spec: String,
}

/// The parsed content of `requirements.txt`, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Package lines; comments and options are dropped.
    pub entries: Vec<ManifestEntry>,
}

// --- INVOCATION ---

/// A single parsed invocation. Built once from the command line and consumed
/// by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// `install`, `run`, `show`, ... or the name of an external command.
    /// `None` when the tool is called without arguments.
    pub verb: Option<String>,
    /// Everything after the verb, untouched.
    pub operands: Vec<String>,
    /// `-g/--global`.
    pub global: bool,
}

impl CommandRequest {
    /// Splits a raw argument vector into verb and operands.
    pub fn from_args(args: Vec<String>, global: bool) -> Self {
        let mut args = args.into_iter();
        Self {
            verb: args.next(),
            operands: args.collect(),
            global,
        }
    }
}
