use crate::core::models::environment::Environment;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolves a program name to the executable that would run, like `which`.
pub trait ExecutableLocator {
    fn which(&self, name: &str) -> Option<PathBuf>;
}

/// Searches the directories of a `PATH`-style list in order.
#[derive(Debug, Clone, Default)]
pub struct PathLocator {
    search_path: Option<OsString>,
}

impl PathLocator {
    pub fn new(search_path: Option<OsString>) -> Self {
        Self { search_path }
    }

    pub fn from_environment(env: &Environment) -> Self {
        Self::new(env.search_path().cloned())
    }
}

impl ExecutableLocator for PathLocator {
    fn which(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        let direct = Path::new(name);
        if direct.components().count() > 1 {
            return is_executable(direct).then(|| direct.to_path_buf());
        }

        let search_path = self.search_path.as_ref()?;
        std::env::split_paths(search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| candidates(&dir, name))
            .find(|candidate| is_executable(candidate))
    }
}

#[cfg(windows)]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name), dir.join(format!("{}.exe", name))]
}

#[cfg(not(windows))]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Fixed name-to-path table for tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct StaticLocator {
    entries: std::collections::HashMap<String, PathBuf>,
}

#[cfg(test)]
impl StaticLocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, name: &str, path: &str) -> Self {
        self.entries.insert(name.to_string(), PathBuf::from(path));
        self
    }

    pub(crate) fn mpi() -> Self {
        Self::new()
            .with("mpicc", "/usr/bin/mpicc")
            .with("mpicxx", "/usr/bin/mpicxx")
            .with("srun", "/usr/bin/srun")
    }
}

#[cfg(test)]
impl ExecutableLocator for StaticLocator {
    fn which(&self, name: &str) -> Option<PathBuf> {
        self.entries.get(name).cloned()
    }
}
