//! Locate admin-tool executables on a configured search path.

use crate::error::KadminError;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ExecutableResolver {
    search_paths: Vec<PathBuf>,
}

impl ExecutableResolver {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// First search-path entry holding an executable file named `name` wins.
    /// Absolute names are accepted as-is when executable.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, KadminError> {
        let direct = Path::new(name);
        if direct.is_absolute() {
            if is_executable_file(direct) {
                return Ok(direct.to_path_buf());
            }
            return Err(KadminError::Setup(format!(
                "{} is not an executable file",
                direct.display()
            )));
        }

        self.search_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable_file(candidate))
            .ok_or_else(|| {
                let searched: Vec<String> = self
                    .search_paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                KadminError::Setup(format!(
                    "{} not found in search paths [{}]",
                    name,
                    searched.join(", ")
                ))
            })
    }
}

pub fn is_executable_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = fs::metadata(path) {
            return (meta.permissions().mode() & 0o111) != 0;
        }
    }
    #[cfg(not(unix))]
    {
        // best-effort on non-unix
        return true;
    }
    false
}
