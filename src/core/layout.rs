// src/core/layout.rs

use std::path::{Path, PathBuf};

/// The two executable layouts a virtual environment can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// `bin/python`
    Posix,
    /// `Scripts\python.exe`
    Windows,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Posix
        }
    }
}

/// Where an environment keeps its executables and how they are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryLayout {
    /// `bin` or `Scripts`.
    pub bin_subdir: &'static str,
    /// Empty, or `.exe`.
    pub executable_suffix: &'static str,
}

impl BinaryLayout {
    /// Full path of the executable `stem` inside `dir`, with the platform suffix.
    pub fn executable(&self, dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{}{}", stem, self.executable_suffix))
    }
}

/// Single lookup for the platform-specific environment layout.
pub fn layout_for(platform: Platform) -> BinaryLayout {
    match platform {
        Platform::Posix => BinaryLayout {
            bin_subdir: "bin",
            executable_suffix: "",
        },
        Platform::Windows => BinaryLayout {
            bin_subdir: "Scripts",
            executable_suffix: ".exe",
        },
    }
}
