use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;

pub const HOME_VAR: &str = "HOME";
pub const HOST_VAR: &str = "HOST";
pub const SNIC_SITE_VAR: &str = "SNIC_SITE";
pub const PATH_VAR: &str = "PATH";

/// Snapshot of the process environment, taken once at the program boundary.
///
/// The resolver never calls `std::env` itself; everything it needs is read from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    platform: String,
    search_path: Option<OsString>,
}

impl Environment {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            vars: BTreeMap::new(),
            platform: platform.into(),
            search_path: None,
        }
    }

    /// Captures the current process environment. Variables that are not valid
    /// Unicode are skipped, except `PATH`, which is kept as an `OsString`.
    pub fn capture() -> Self {
        let mut env = Self::new(platform_identifier());
        env.vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        env.search_path = std::env::var_os(PATH_VAR);
        env
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == PATH_VAR {
            self.search_path = Some(OsString::from(&value));
        }
        self.vars.insert(key, value);
        self
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn home(&self) -> Option<&Path> {
        self.var(HOME_VAR).filter(|h| !h.is_empty()).map(Path::new)
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn search_path(&self) -> Option<&OsString> {
        self.search_path.as_ref()
    }

    /// `HOST`, else `SNIC_SITE`, else the platform identifier.
    pub fn host_identifier(&self) -> &str {
        self.var(HOST_VAR)
            .or_else(|| self.var(SNIC_SITE_VAR))
            .unwrap_or(&self.platform)
    }
}

/// Platform name in the spelling the host table expects (`darwin` for macOS,
/// `win32` for Windows).
pub fn platform_identifier() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn host_identifier_prefers_host_over_snic_site() {
        let env = Environment::new("linux")
            .with_var(HOST_VAR, "tetralith1.nsc.liu.se")
            .with_var(SNIC_SITE_VAR, "hpc2n");
        assert_eq!(env.host_identifier(), "tetralith1.nsc.liu.se");
    }

    #[test]
    fn host_identifier_falls_back_to_snic_site_then_platform() {
        let env = Environment::new("linux").with_var(SNIC_SITE_VAR, "hpc2n");
        assert_eq!(env.host_identifier(), "hpc2n");

        let env = Environment::new("darwin");
        assert_eq!(env.host_identifier(), "darwin");
    }

    #[test]
    fn empty_home_is_treated_as_missing() {
        let env = Environment::new("linux").with_var(HOME_VAR, "");
        assert!(env.home().is_none());

        let env = Environment::new("linux").with_var(HOME_VAR, "/home/alice");
        assert_eq!(env.home(), Some(Path::new("/home/alice")));
    }

    #[test]
    fn with_var_path_sets_search_path() {
        let env = Environment::new("linux").with_var(PATH_VAR, "/usr/bin:/bin");
        assert_eq!(env.search_path(), Some(&OsString::from("/usr/bin:/bin")));
    }

    #[test]
    #[serial]
    fn capture_reads_process_environment() {
        temp_env::with_vars(
            [
                (HOST_VAR, Some("csb-node7")),
                (SNIC_SITE_VAR, None),
                ("OPENBLAS", Some("/opt/openblas")),
            ],
            || {
                let env = Environment::capture();
                assert_eq!(env.host_identifier(), "csb-node7");
                assert_eq!(env.var("OPENBLAS"), Some("/opt/openblas"));
                assert_eq!(env.platform(), platform_identifier());
            },
        );
    }

    #[test]
    fn platform_identifier_uses_legacy_names() {
        let id = platform_identifier();
        assert_ne!(id, "macos");
        assert_ne!(id, "windows");
    }
}
