use crate::error::{CliError, Result};
use actbuild::core::models::host::{
    HostEntry, HostMatcher, HostProfile, LibraryPath, PrefixRoot,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_HOST_LAUNCHER: &str = "mpirun";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub defaults: Option<FileDefaults>,
    #[serde(default)]
    pub hosts: Vec<FileHost>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDefaults {
    pub branch: Option<String>,
    pub ncores: Option<usize>,
    pub build_type: Option<String>,
    pub flags: Option<String>,
    pub user: Option<String>,
    pub single: Option<bool>,
    pub cln: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileMatchKind {
    Exact,
    #[default]
    Contains,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileHost {
    pub name: String,
    #[serde(rename = "match", default)]
    pub match_kind: FileMatchKind,
    pub pattern: String,
    pub blas: Option<PathBuf>,
    pub lapack: Option<PathBuf>,
    pub mpi_launcher: Option<String>,
    pub prefix_root: Option<PathBuf>,
    #[serde(default)]
    pub extra_dir_vars: Vec<String>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

impl FileHost {
    /// Relative library and prefix paths are taken to be under `HOME`.
    pub fn into_entry(self) -> Result<HostEntry> {
        if self.pattern.is_empty() {
            return Err(CliError::Config(format!(
                "host '{}' has an empty `pattern`",
                self.name
            )));
        }
        if self.blas.is_some() != self.lapack.is_some() {
            return Err(CliError::Config(format!(
                "host '{}' must set both `blas` and `lapack`, or neither",
                self.name
            )));
        }

        let matcher = match self.match_kind {
            FileMatchKind::Exact => HostMatcher::Exact(self.pattern),
            FileMatchKind::Contains => HostMatcher::Contains(self.pattern),
        };
        let prefix_root = match self.prefix_root {
            None => PrefixRoot::Home,
            Some(p) if p.is_absolute() => PrefixRoot::Absolute(p),
            Some(p) => PrefixRoot::UnderHome(p),
        };

        Ok(HostEntry {
            matcher,
            profile: HostProfile {
                name: self.name,
                blas: self.blas.map(library_path),
                lapack: self.lapack.map(library_path),
                mpi_launcher: self
                    .mpi_launcher
                    .unwrap_or_else(|| DEFAULT_HOST_LAUNCHER.to_string()),
                prefix_root,
                extra_dir_vars: self.extra_dir_vars,
            },
        })
    }
}

fn library_path(path: PathBuf) -> LibraryPath {
    if path.is_absolute() {
        LibraryPath::Absolute(path)
    } else {
        LibraryPath::UnderHome(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn full_file_parses_with_kebab_case_keys() {
        let toml = r#"
            [defaults]
            branch = "release-2024"
            ncores = 16
            build-type = "Debug"
            flags = "-DGMX_SIMD=AVX2_256"
            user = "alice"
            single = true
            cln = true

            [[hosts]]
            name = "lab-workstation"
            match = "exact"
            pattern = "lab-ws"
            blas = "/opt/openblas/lib/libopenblas.so"
            lapack = "/opt/lapack/lib/liblapack.so"
            mpi-launcher = "mpiexec"
            prefix-root = "/scratch/alice"
            extra-dir-vars = ["LIBXML2"]
        "#;

        let config: FileConfig = toml::from_str(toml).unwrap();

        let defaults = config.defaults.unwrap();
        assert_eq!(defaults.branch.as_deref(), Some("release-2024"));
        assert_eq!(defaults.ncores, Some(16));
        assert_eq!(defaults.build_type.as_deref(), Some("Debug"));
        assert_eq!(defaults.single, Some(true));
        assert_eq!(config.hosts.len(), 1);
        assert_eq!(config.hosts[0].match_kind, FileMatchKind::Exact);
        assert_eq!(config.hosts[0].mpi_launcher.as_deref(), Some("mpiexec"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: std::result::Result<FileConfig, _> =
            toml::from_str("[defaults]\nthreads = 4\n");
        assert!(result.is_err());

        let result: std::result::Result<FileConfig, _> =
            toml::from_str("[[hosts]]\nname = \"x\"\npattern = \"x\"\nqueue = \"gpu\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn host_defaults_to_contains_matcher_and_home_prefix() {
        let config: FileConfig =
            toml::from_str("[[hosts]]\nname = \"lab\"\npattern = \"lab\"\n").unwrap();

        let entry = config.hosts[0].clone().into_entry().unwrap();

        assert_eq!(entry.matcher, HostMatcher::Contains("lab".to_string()));
        assert_eq!(entry.profile.prefix_root, PrefixRoot::Home);
        assert_eq!(entry.profile.mpi_launcher, "mpirun");
        assert!(entry.profile.blas.is_none());
    }

    #[test]
    fn relative_paths_resolve_under_home() {
        let config: FileConfig = toml::from_str(
            r#"
            [[hosts]]
            name = "laptop"
            pattern = "laptop"
            blas = "conda/lib/libblas.so"
            lapack = "/usr/lib/liblapack.so"
            prefix-root = "work"
            "#,
        )
        .unwrap();

        let entry = config.hosts[0].clone().into_entry().unwrap();

        assert_eq!(
            entry.profile.blas,
            Some(LibraryPath::UnderHome("conda/lib/libblas.so".into()))
        );
        assert_eq!(
            entry.profile.lapack,
            Some(LibraryPath::Absolute("/usr/lib/liblapack.so".into()))
        );
        assert_eq!(entry.profile.prefix_root, PrefixRoot::UnderHome("work".into()));
    }

    #[test]
    fn blas_without_lapack_is_a_config_error() {
        let config: FileConfig = toml::from_str(
            "[[hosts]]\nname = \"half\"\npattern = \"half\"\nblas = \"/opt/libblas.so\"\n",
        )
        .unwrap();

        let err = config.hosts[0].clone().into_entry().unwrap_err();

        assert!(matches!(err, CliError::Config(msg) if msg.contains("half")));
    }

    #[test]
    fn from_file_reports_path_on_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[defaults\nncores = 4").unwrap();

        let err = FileConfig::from_file(&path).unwrap_err();

        match err {
            CliError::FileParsing { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let dir = tempdir().unwrap();
        let err = FileConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
