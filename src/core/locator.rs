// src/core/locator.rs

use crate::models::EnvironmentRef;
use std::path::Path;

/// Finds the closest directory, starting at `start_directory` and walking up to
/// the filesystem root, that contains a subdirectory named `environment_name`.
///
/// The walk is done over path values only; the process working directory is
/// never touched.
pub fn locate(start_directory: &Path, environment_name: &str) -> Option<EnvironmentRef> {
    // Canonical form so `..` segments and symlinked starts walk the real tree.
    let start = dunce::canonicalize(start_directory).unwrap_or_else(|e| {
        log::debug!(
            "Could not canonicalize '{}' ({}), searching it as given.",
            start_directory.display(),
            e
        );
        start_directory.to_path_buf()
    });

    for candidate in start.ancestors() {
        log::debug!(
            "Looking for '{}' in '{}'",
            environment_name,
            candidate.display()
        );
        if has_environment(candidate, environment_name) {
            return Some(EnvironmentRef::new(candidate, environment_name));
        }
    }

    log::debug!(
        "No '{}' environment above '{}'.",
        environment_name,
        start.display()
    );
    None
}

/// True when `directory/environment_name` is an existing directory.
pub fn has_environment(directory: &Path, environment_name: &str) -> bool {
    directory.join(environment_name).is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};
    use tempfile::tempdir;

    #[test]
    fn test_locate_finds_environment_in_ancestor() {
        let tmp = tempdir().unwrap();
        let proj = dunce::canonicalize(tmp.path()).unwrap().join("proj");
        fs::create_dir_all(proj.join("venv")).unwrap();
        fs::create_dir_all(proj.join("sub").join("deeper")).unwrap();

        let cwd_before = env::current_dir().unwrap();
        let found = locate(&proj.join("sub").join("deeper"), "venv").unwrap();

        assert_eq!(found.root_directory, proj);
        assert_eq!(found.environment_name, "venv");
        assert_eq!(env::current_dir().unwrap(), cwd_before);
    }

    #[test]
    fn test_locate_prefers_closest_environment() {
        let tmp = tempdir().unwrap();
        let proj = dunce::canonicalize(tmp.path()).unwrap().join("proj");
        fs::create_dir_all(proj.join("venv")).unwrap();
        fs::create_dir_all(proj.join("sub").join("venv")).unwrap();

        let found = locate(&proj.join("sub"), "venv").unwrap();
        assert_eq!(found.root_directory, proj.join("sub"));
    }

    #[test]
    fn test_locate_returns_none_when_missing() {
        let tmp = tempdir().unwrap();
        let start = tmp.path().join("a").join("b");
        fs::create_dir_all(&start).unwrap();

        let cwd_before = env::current_dir().unwrap();
        assert!(locate(&start, "crowbar-test-env-that-does-not-exist").is_none());
        assert_eq!(env::current_dir().unwrap(), cwd_before);
    }

    #[test]
    fn test_locate_ignores_plain_file_with_environment_name() {
        let tmp = tempdir().unwrap();
        let root = dunce::canonicalize(tmp.path()).unwrap();
        fs::write(root.join("crowbar-file-env"), "not a directory").unwrap();

        assert!(locate(&root, "crowbar-file-env").is_none());
    }
}
