//! # Package Location
//!
//! A package keeps its entry file at its root, named after the root directory:
//!
//! ```text
//! acme-forms/
//!   acme-forms.rs   <- entry file
//!   src/
//!     lib.rs        <- component source
//! ```
//!
//! [`PackageLocation`] walks two levels up from a component's source file to
//! find it. When the source path is too shallow to do so, the source file
//! itself is used.
//!
//! Turning a path into a host directory or public URL is the host's business;
//! it is delegated to a [`PathResolver`]. Without one, the relative path is
//! returned unchanged.

use std::path::{Path, PathBuf};

/// Host-side resolution of package paths.
pub trait PathResolver: Send + Sync {
    /// The directory containing `entry_file`, as the host sees it.
    fn dir_path(&self, entry_file: &Path) -> PathBuf;

    /// The public URL of the directory containing `entry_file`.
    fn dir_url(&self, entry_file: &Path) -> String;
}

/// Locates the package a component source file belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLocation {
    source: PathBuf,
}

impl PackageLocation {
    /// Locate from a component source path, usually `file!()`.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The component source path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The package root, two levels above the source file.
    pub fn package_dir(&self) -> Option<&Path> {
        let dir = self.source.parent()?.parent()?;
        dir.file_name().map(|_| dir)
    }

    /// The package entry file, or the source file when the package root
    /// cannot be determined.
    pub fn entry_file(&self) -> PathBuf {
        match self.package_dir() {
            Some(dir) => {
                // package_dir guarantees a file name.
                let mut name = dir.file_name().unwrap_or_default().to_os_string();
                name.push(".rs");
                dir.join(name)
            }
            None => {
                tracing::debug!(source = %self.source.display(), "no package root; using source file");
                self.source.clone()
            }
        }
    }

    /// `path` inside the package directory.
    pub fn dir(&self, path: &str, resolver: Option<&dyn PathResolver>) -> PathBuf {
        match resolver {
            Some(resolver) => resolver.dir_path(&self.entry_file()).join(path),
            None => PathBuf::from(path),
        }
    }

    /// The public URL of `path` inside the package directory.
    pub fn url(&self, path: &str, resolver: Option<&dyn PathResolver>) -> String {
        let Some(resolver) = resolver else {
            return path.to_owned();
        };
        let mut url = resolver.dir_url(&self.entry_file());
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(path);
        url
    }
}
