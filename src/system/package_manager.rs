// src/system/package_manager.rs

use crate::constants::BACKEND_ENV;
use crate::models::EnvironmentHandle;
use crate::system::executor::{ExecutionError, ProcessRunner};
use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// What crowbar needs from a package manager.
pub trait PackageManager: fmt::Debug {
    /// Installs `packages`; operands are passed through verbatim.
    fn install(&self, runner: &ProcessRunner, packages: &[String]) -> Result<(), ExecutionError>;
    /// Installs everything listed in `manifest`.
    fn install_from_manifest(
        &self,
        runner: &ProcessRunner,
        manifest: &Path,
    ) -> Result<(), ExecutionError>;
    /// Removes `packages` without asking for confirmation.
    fn uninstall(&self, runner: &ProcessRunner, packages: &[String]) -> Result<(), ExecutionError>;
    /// Installed packages in requirements format.
    fn freeze(&self, runner: &ProcessRunner) -> Result<String, ExecutionError>;
}

/// `pip`, either an environment's own executable or `python -m pip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pip {
    program: PathBuf,
    leading_args: Vec<String>,
}

impl Pip {
    /// The `pip` executable of an environment.
    pub fn for_environment(handle: &EnvironmentHandle) -> Self {
        Self {
            program: handle.package_manager_path.clone(),
            leading_args: Vec::new(),
        }
    }

    /// `<python> -m pip`, used in global mode so pip matches the interpreter.
    pub fn for_interpreter(python: impl Into<PathBuf>) -> Self {
        Self {
            program: python.into(),
            leading_args: vec!["-m".to_string(), "pip".to_string()],
        }
    }

    fn args<'a>(&'a self, rest: &[&'a str], packages: &'a [String]) -> Vec<&'a str> {
        self.leading_args
            .iter()
            .map(String::as_str)
            .chain(rest.iter().copied())
            .chain(packages.iter().map(String::as_str))
            .collect()
    }
}

impl PackageManager for Pip {
    fn install(&self, runner: &ProcessRunner, packages: &[String]) -> Result<(), ExecutionError> {
        runner.run(&self.program, self.args(&["install"], packages))
    }

    fn install_from_manifest(
        &self,
        runner: &ProcessRunner,
        manifest: &Path,
    ) -> Result<(), ExecutionError> {
        let mut args: Vec<&OsStr> = self
            .leading_args
            .iter()
            .map(OsStr::new)
            .collect();
        args.push(OsStr::new("install"));
        args.push(OsStr::new("-r"));
        args.push(manifest.as_os_str());
        runner.run(&self.program, args)
    }

    fn uninstall(&self, runner: &ProcessRunner, packages: &[String]) -> Result<(), ExecutionError> {
        runner.run(&self.program, self.args(&["uninstall", "-y"], packages))
    }

    fn freeze(&self, runner: &ProcessRunner) -> Result<String, ExecutionError> {
        runner.capture(&self.program, self.args(&["freeze"], &[]))
    }
}

/// A conda environment addressed by its prefix directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conda {
    executable: PathBuf,
    prefix: PathBuf,
}

impl Conda {
    /// conda driven through `executable`, acting on the environment at `prefix`.
    pub fn new(executable: impl Into<PathBuf>, prefix: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            prefix: prefix.into(),
        }
    }

    fn run_with_prefix(
        &self,
        runner: &ProcessRunner,
        verb: &str,
        rest: &[&OsStr],
    ) -> Result<(), ExecutionError> {
        let mut args: Vec<&OsStr> =
            vec![OsStr::new(verb), OsStr::new("--prefix"), self.prefix.as_os_str()];
        args.extend_from_slice(rest);
        args.push(OsStr::new("--yes"));
        runner.run(&self.executable, args)
    }
}

impl PackageManager for Conda {
    fn install(&self, runner: &ProcessRunner, packages: &[String]) -> Result<(), ExecutionError> {
        let rest: Vec<&OsStr> = packages.iter().map(OsStr::new).collect();
        self.run_with_prefix(runner, "install", &rest)
    }

    fn install_from_manifest(
        &self,
        runner: &ProcessRunner,
        manifest: &Path,
    ) -> Result<(), ExecutionError> {
        self.run_with_prefix(runner, "install", &[OsStr::new("--file"), manifest.as_os_str()])
    }

    fn uninstall(&self, runner: &ProcessRunner, packages: &[String]) -> Result<(), ExecutionError> {
        let rest: Vec<&OsStr> = packages.iter().map(OsStr::new).collect();
        self.run_with_prefix(runner, "remove", &rest)
    }

    fn freeze(&self, runner: &ProcessRunner) -> Result<String, ExecutionError> {
        runner.capture(
            &self.executable,
            [
                OsStr::new("list"),
                OsStr::new("--prefix"),
                self.prefix.as_os_str(),
                OsStr::new("--export"),
            ],
        )
    }
}

/// Which tool creates and manages project environments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// `python -m venv` + the environment's own pip.
    Venv,
    /// Local conda prefixes.
    Conda {
        /// The `conda` program to call.
        executable: PathBuf,
    },
}

impl BackendKind {
    /// Picks the backend from `CROWBAR_BACKEND`, then from an active conda shell.
    pub fn detect() -> Self {
        match env::var(BACKEND_ENV).ok().as_deref().map(str::trim) {
            Some("venv") => return Self::Venv,
            Some("conda") => {
                return Self::Conda {
                    executable: conda_executable(),
                };
            }
            Some(other) if !other.is_empty() => {
                log::warn!(
                    "Unknown {} value '{}'; expected 'venv' or 'conda'.",
                    BACKEND_ENV,
                    other
                );
            }
            _ => {}
        }

        if env::var_os("CONDA_DEFAULT_ENV").is_some() || env::var_os("CONDA_PREFIX").is_some() {
            log::debug!("Active conda environment detected.");
            Self::Conda {
                executable: conda_executable(),
            }
        } else {
            Self::Venv
        }
    }

    /// Short name for messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Venv => "venv",
            Self::Conda { .. } => "conda",
        }
    }

    /// Creates a new environment at `env_dir`, with its package manager bootstrapped.
    pub fn create_environment(
        &self,
        system_python: &str,
        env_dir: &Path,
        runner: &ProcessRunner,
    ) -> Result<(), ExecutionError> {
        match self {
            Self::Venv => runner.run(
                system_python,
                [OsStr::new("-m"), OsStr::new("venv"), env_dir.as_os_str()],
            ),
            Self::Conda { executable } => runner.run(
                executable,
                [
                    OsStr::new("create"),
                    OsStr::new("--prefix"),
                    env_dir.as_os_str(),
                    OsStr::new("--yes"),
                    OsStr::new("python"),
                    OsStr::new("pip"),
                ],
            ),
        }
    }

    /// The package manager that operates on `handle`.
    pub fn package_manager(&self, handle: &EnvironmentHandle) -> Box<dyn PackageManager> {
        match self {
            Self::Venv => Box::new(Pip::for_environment(handle)),
            Self::Conda { executable } => {
                Box::new(Conda::new(executable, &handle.environment_dir))
            }
        }
    }
}

/// `CONDA_EXE`, else `$CONDA_PREFIX/condabin/conda`, else `conda` from PATH.
fn conda_executable() -> PathBuf {
    if let Some(exe) = env::var_os("CONDA_EXE") {
        return PathBuf::from(exe);
    }
    if let Some(prefix) = env::var_os("CONDA_PREFIX") {
        return PathBuf::from(prefix).join("condabin").join("conda");
    }
    PathBuf::from("conda")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use tempfile::tempdir;

    /// A fake tool that appends its arguments to `calls.log` and prints `freeze` output.
    fn recording_tool(dir: &Path) -> PathBuf {
        let path = dir.join("tool");
        fs::write(
            &path,
            "#!/bin/sh\necho \"$@\" >> \"$(dirname \"$0\")/calls.log\"\necho 'six==1.16.0'\n",
        )
        .unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn calls(dir: &Path) -> Vec<String> {
        fs::read_to_string(dir.join("calls.log"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn runner(dir: &Path) -> ProcessRunner {
        ProcessRunner::new(dir, Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn test_pip_command_lines() {
        let dir = tempdir().unwrap();
        let tool = recording_tool(dir.path());
        let pip = Pip {
            program: tool,
            leading_args: Vec::new(),
        };
        let runner = runner(dir.path());
        let packages = vec!["requests".to_string(), "rich==13.0".to_string()];

        pip.install(&runner, &packages).unwrap();
        pip.uninstall(&runner, &packages).unwrap();
        pip.install_from_manifest(&runner, Path::new("requirements.txt"))
            .unwrap();
        assert_eq!(pip.freeze(&runner).unwrap(), "six==1.16.0\n");

        assert_eq!(
            calls(dir.path()),
            vec![
                "install requests rich==13.0",
                "uninstall -y requests rich==13.0",
                "install -r requirements.txt",
                "freeze",
            ]
        );
    }

    #[test]
    fn test_global_pip_goes_through_interpreter() {
        let dir = tempdir().unwrap();
        let pip = Pip::for_interpreter(recording_tool(dir.path()));
        pip.install(&runner(dir.path()), &["black".to_string()])
            .unwrap();
        assert_eq!(calls(dir.path()), vec!["-m pip install black"]);
    }

    #[test]
    fn test_conda_command_lines() {
        let dir = tempdir().unwrap();
        let conda = Conda::new(recording_tool(dir.path()), "/proj/venv");
        let runner = runner(dir.path());

        conda.install(&runner, &["numpy".to_string()]).unwrap();
        conda.uninstall(&runner, &["numpy".to_string()]).unwrap();
        conda.freeze(&runner).unwrap();

        assert_eq!(
            calls(dir.path()),
            vec![
                "install --prefix /proj/venv numpy --yes",
                "remove --prefix /proj/venv numpy --yes",
                "list --prefix /proj/venv --export",
            ]
        );
    }

    #[test]
    fn test_venv_creation_uses_system_python() {
        let dir = tempdir().unwrap();
        let python = recording_tool(dir.path());
        BackendKind::Venv
            .create_environment(
                python.to_str().unwrap(),
                Path::new("/proj/venv"),
                &runner(dir.path()),
            )
            .unwrap();
        assert_eq!(calls(dir.path()), vec!["-m venv /proj/venv"]);
    }
}
