//! Directory handle used to locate and open list files
//!
//! Owned by whoever opens the list and dropped with it; there is no
//! process-wide directory object.

use std::fs::File;
use std::path::{Path, PathBuf};

use super::errors::{SpotListError, SpotListResult};

/// Root against which relative list paths are resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDir {
    root: Option<PathBuf>,
}

impl InputDir {
    /// The process working directory
    pub fn native() -> Self {
        Self { root: None }
    }

    /// A fixed directory
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    /// Resolves `path` against the root. Absolute paths are kept.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Returns true if something exists at `path`
    pub fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    /// Opens `path` for reading
    pub fn open_read(&self, path: &Path) -> SpotListResult<File> {
        let resolved = self.resolve(path);
        if !resolved.exists() {
            return Err(SpotListError::not_found(path.display().to_string()));
        }
        File::open(&resolved).map_err(|e| {
            SpotListError::io(format!("while opening file '{}'", path.display()), e)
                .with_path(path.display().to_string())
        })
    }
}

impl Default for InputDir {
    fn default() -> Self {
        Self::native()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotlist::SpotListErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_at_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("ids.txt"), "1\n").unwrap();

        let input = InputDir::at(dir.path());
        assert!(input.exists(Path::new("ids.txt")));
        assert!(input.open_read(Path::new("ids.txt")).is_ok());
    }

    #[test]
    fn test_absolute_path_ignores_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("ids.txt");
        std::fs::write(&file, "1\n").unwrap();

        let input = InputDir::at("/nonexistent-root");
        assert!(input.exists(&file));
    }

    #[test]
    fn test_open_missing() {
        let dir = TempDir::new().unwrap();
        let err = InputDir::at(dir.path()).open_read(Path::new("nope.txt")).unwrap_err();
        assert_eq!(err.code(), SpotListErrorCode::RfrListNotFound);
    }
}
