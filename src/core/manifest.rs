// src/core/manifest.rs

use crate::models::{Manifest, ManifestEntry};
use crate::system::executor::{ExecutionError, ProcessRunner};
use crate::system::package_manager::PackageManager;
use lazy_static::lazy_static;
use regex::Regex;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

lazy_static! {
    /// `name` followed by whatever version specifier or URL comes after it.
    static ref REQUIREMENT_LINE: Regex =
        Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(.*)$")
            .unwrap_or_else(|e| unreachable!("invalid requirement regex: {}", e));
    static ref NAME_SEPARATORS: Regex =
        Regex::new(r"[-_.]+").unwrap_or_else(|e| unreachable!("invalid separator regex: {}", e));
}

/// Why the manifest could not be regenerated.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The `freeze` query failed or was interrupted.
    #[error("Could not list installed packages: {0}")]
    Freeze(#[from] ExecutionError),
    /// The query succeeded but printed nothing.
    #[error("The package manager reported no installed packages.")]
    EmptyOutput,
    /// The temporary file next to the manifest could not be written.
    #[error("Could not write '{path}': {source}")]
    Write {
        /// Manifest being replaced.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The temporary file could not be moved over the manifest.
    #[error("Could not replace '{path}': {source}")]
    Persist {
        /// Manifest being replaced.
        path: String,
        /// Underlying persist error.
        #[source]
        source: tempfile::PersistError,
    },
}

impl SyncError {
    /// True when the `freeze` query was stopped by Ctrl+C.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Freeze(ExecutionError::Interrupted(_)))
    }
}

/// Lower-cases a distribution name and folds runs of `-`, `_` and `.` into `-`.
pub fn normalize_name(name: &str) -> String {
    NAME_SEPARATORS.replace_all(name, "-").to_lowercase()
}

impl ManifestEntry {
    /// Parses one requirements line. Blank lines, comments and option lines
    /// (`-r`, `-e`, `--index-url`) yield `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.split(" #").next().unwrap_or(line).trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            return None;
        }
        let captures = REQUIREMENT_LINE.captures(line)?;
        Some(Self {
            package_name: captures.get(1)?.as_str().to_string(),
            version_spec: captures.get(2).map_or("", |m| m.as_str()).trim().to_string(),
        })
    }
}

impl Manifest {
    /// Parses requirements text, keeping only package lines.
    pub fn parse(content: &str) -> Self {
        Self {
            entries: content.lines().filter_map(ManifestEntry::parse_line).collect(),
        }
    }

    /// Whether a package is listed, comparing normalized names.
    pub fn contains(&self, package_name: &str) -> bool {
        let wanted = normalize_name(package_name);
        self.entries
            .iter()
            .any(|entry| normalize_name(&entry.package_name) == wanted)
    }
}

/// Regenerates the manifest at `manifest_path` from the package manager's
/// `freeze` output.
///
/// The file is replaced only after the whole output has been captured; on any
/// failure the previous manifest is left as it was.
pub fn sync(
    package_manager: &dyn PackageManager,
    runner: &ProcessRunner,
    manifest_path: &Path,
) -> Result<Manifest, SyncError> {
    let frozen = package_manager.freeze(runner)?;
    if frozen.trim().is_empty() {
        return Err(SyncError::EmptyOutput);
    }

    let dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let write_error = |source| SyncError::Write {
        path: manifest_path.display().to_string(),
        source,
    };
    let mut temp_file = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp_file.write_all(frozen.as_bytes()).map_err(write_error)?;
    temp_file.flush().map_err(write_error)?;
    temp_file
        .persist(manifest_path)
        .map_err(|source| SyncError::Persist {
            path: manifest_path.display().to_string(),
            source,
        })?;

    let manifest = Manifest::parse(&frozen);
    log::debug!(
        "Wrote {} entries to '{}'",
        manifest.entries.len(),
        manifest_path.display()
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_freeze_output() {
        let manifest = Manifest::parse(
            "# generated\nrequests==2.32.3\n\n-e git+https://example.com/x.git#egg=x\nmy_pkg @ file:///tmp/my_pkg\nnumpy=1.26.4=py312_0\n",
        );
        assert_eq!(
            manifest.entries,
            vec![
                ManifestEntry {
                    package_name: "requests".to_string(),
                    version_spec: "==2.32.3".to_string()
                },
                ManifestEntry {
                    package_name: "my_pkg".to_string(),
                    version_spec: "@ file:///tmp/my_pkg".to_string()
                },
                ManifestEntry {
                    package_name: "numpy".to_string(),
                    version_spec: "=1.26.4=py312_0".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_contains_uses_normalized_names() {
        let manifest = Manifest::parse("Typing_Extensions==4.12.0\nzope.interface==6.0\n");
        assert!(manifest.contains("typing-extensions"));
        assert!(manifest.contains("zope-interface"));
        assert!(!manifest.contains("typing"));
    }

    #[test]
    fn test_parse_line_with_specifier_operand() {
        let entry = ManifestEntry::parse_line("rich>=13  # pretty output").unwrap();
        assert_eq!(entry.package_name, "rich");
        assert_eq!(entry.version_spec, ">=13");
        assert!(ManifestEntry::parse_line("--upgrade").is_none());
    }

    #[cfg(unix)]
    mod writes {
        use super::*;
        use std::fs;
        use std::sync::Arc;
        use std::sync::atomic::AtomicBool;
        use tempfile::tempdir;

        #[derive(Debug)]
        struct CannedFreeze(Result<&'static str, ()>);

        impl PackageManager for CannedFreeze {
            fn install(&self, _: &ProcessRunner, _: &[String]) -> Result<(), ExecutionError> {
                Ok(())
            }
            fn install_from_manifest(&self, _: &ProcessRunner, _: &Path) -> Result<(), ExecutionError> {
                Ok(())
            }
            fn uninstall(&self, _: &ProcessRunner, _: &[String]) -> Result<(), ExecutionError> {
                Ok(())
            }
            fn freeze(&self, _: &ProcessRunner) -> Result<String, ExecutionError> {
                self.0.map(str::to_string).map_err(|_| ExecutionError::NonZeroExitStatus {
                    command: "pip freeze".to_string(),
                    status: "exit status: 1".to_string(),
                })
            }
        }

        fn runner(dir: &Path) -> ProcessRunner {
            ProcessRunner::new(dir, Arc::new(AtomicBool::new(false)))
        }

        #[test]
        fn test_sync_overwrites_manifest() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("requirements.txt");
            fs::write(&path, "old==0.1\nstale==9.9\n").unwrap();

            let manifest = sync(&CannedFreeze(Ok("six==1.16.0\n")), &runner(dir.path()), &path).unwrap();
            assert_eq!(fs::read_to_string(&path).unwrap(), "six==1.16.0\n");
            assert!(manifest.contains("six"));
            assert!(!manifest.contains("stale"));
        }

        #[test]
        fn test_failed_freeze_keeps_previous_manifest() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("requirements.txt");
            fs::write(&path, "keep==1.0\n").unwrap();

            let err = sync(&CannedFreeze(Err(())), &runner(dir.path()), &path).unwrap_err();
            assert!(matches!(err, SyncError::Freeze(_)));
            assert_eq!(fs::read_to_string(&path).unwrap(), "keep==1.0\n");
        }

        #[test]
        fn test_empty_freeze_keeps_previous_manifest() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("requirements.txt");
            fs::write(&path, "keep==1.0\n").unwrap();

            let err = sync(&CannedFreeze(Ok("\n")), &runner(dir.path()), &path).unwrap_err();
            assert!(matches!(err, SyncError::EmptyOutput));
            assert_eq!(fs::read_to_string(&path).unwrap(), "keep==1.0\n");
        }
    }
}
