// src/core/session.rs

use crate::{
    CancellationToken,
    constants::{MANIFEST_FILENAME, PYTHON_ENV},
    core::{
        config_store,
        layout::{BinaryLayout, Platform, layout_for},
        locator, paths,
        provisioner::{self, ProvisionOptions, ProvisioningError},
    },
    models::{Configuration, EnvironmentHandle, EnvironmentRef},
    system::{
        executor::ProcessRunner,
        package_manager::{BackendKind, PackageManager, Pip},
    },
};
use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Everything one invocation works with. Built once, before dispatch; the
/// configuration is read here and passed down instead of being re-read.
#[derive(Debug, Clone)]
pub struct Session {
    /// Directory crowbar was started in.
    pub cwd: PathBuf,
    /// Location of `config.toml`.
    pub config_path: PathBuf,
    /// Settings, loaded once.
    pub config: Configuration,
    /// Executable layout of this platform.
    pub layout: BinaryLayout,
    /// venv or conda.
    pub backend: BackendKind,
    /// Interpreter used to create venvs and for global mode.
    pub system_python: String,
    /// `-g` was given.
    pub global: bool,
    /// Raised on Ctrl+C.
    pub cancellation_token: CancellationToken,
}

impl Session {
    /// Builds the session from the process environment.
    pub fn from_env(global: bool, cancellation_token: CancellationToken) -> Result<Self> {
        let cwd = env::current_dir()?;
        let config_path = paths::get_config_file_path()?;
        let config = config_store::load(&config_path);
        let system_python = env::var(PYTHON_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| default_system_python().to_string());

        let session = Self {
            cwd,
            config_path,
            config,
            layout: layout_for(Platform::current()),
            backend: BackendKind::detect(),
            system_python,
            global,
            cancellation_token,
        };
        log::debug!("Session: {:?}", session);
        Ok(session)
    }

    /// A session with explicit paths and backend, for embedding and tests.
    pub fn new(
        cwd: impl Into<PathBuf>,
        config_path: impl Into<PathBuf>,
        backend: BackendKind,
        system_python: impl Into<String>,
        global: bool,
    ) -> Self {
        let config_path = config_path.into();
        Self {
            cwd: cwd.into(),
            config: config_store::load(&config_path),
            config_path,
            layout: layout_for(Platform::current()),
            backend,
            system_python: system_python.into(),
            global,
            cancellation_token: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A process runner bound to `cwd` and the token.
    pub fn runner(&self) -> ProcessRunner {
        ProcessRunner::new(&self.cwd, self.cancellation_token.clone())
    }

    /// The configured environment directory name.
    pub fn environment_name(&self) -> &str {
        &self.config.environment_name
    }

    /// Read-only lookup of the configured environment above `cwd`.
    pub fn locate(&self) -> Option<EnvironmentRef> {
        locator::locate(&self.cwd, self.environment_name())
    }

    /// Finds the environment, creating one in `cwd` when there is none.
    pub fn resolve_environment(&self) -> Result<EnvironmentHandle, ProvisioningError> {
        let root = match self.locate() {
            Some(found) => {
                log::debug!("Using environment under '{}'", found.root_directory.display());
                found.root_directory
            }
            None => self.cwd.clone(),
        };
        self.provision(&root)
    }

    /// Provisions `root/<environment_name>` unconditionally.
    pub fn provision(&self, root: &Path) -> Result<EnvironmentHandle, ProvisioningError> {
        provisioner::ensure(
            root,
            self.environment_name(),
            ProvisionOptions {
                backend: &self.backend,
                layout: &self.layout,
                system_python: &self.system_python,
                gitignore_enabled: self.config.gitignore_enabled,
            },
            &self.runner(),
        )
    }

    /// The backend's package manager for `handle`.
    pub fn package_manager(&self, handle: &EnvironmentHandle) -> Box<dyn PackageManager> {
        self.backend.package_manager(handle)
    }

    /// pip of the system interpreter, for global mode.
    pub fn global_package_manager(&self) -> Pip {
        Pip::for_interpreter(&self.system_python)
    }

    /// The manifest belonging to an environment root.
    pub fn manifest_path(root: &Path) -> PathBuf {
        root.join(MANIFEST_FILENAME)
    }

    /// Persists `self.config`.
    pub fn save_config(&self) -> Result<(), config_store::ConfigError> {
        config_store::save(&self.config_path, &self.config)
    }
}

fn default_system_python() -> &'static str {
    if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    }
}
