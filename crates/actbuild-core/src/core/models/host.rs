use super::environment::Environment;
use std::fmt;
use std::path::{Path, PathBuf};

const NSC_OPENBLAS: &str =
    "/software/sse/easybuild/prefix/software/OpenBLAS/0.2.20-GCC-6.4.0-2.28/lib/libopenblas.so.0";
const NSC_SCALAPACK: &str = "/software/sse/easybuild/prefix/software/ScaLAPACK/2.0.2-gompi-2018a-OpenBLAS-0.2.20/lib/libscalapack.a";
const HPC2N_OPENBLAS: &str = "/hpc2n/eb/software/OpenBLAS/0.3.12-GCC-10.2.0/lib/libopenblas.so";
const HPC2N_SCALAPACK: &str = "/hpc2n/eb/software/ScaLAPACK/2.1.0-gompi-2020b-bf/lib/libscalapack.so";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMatcher {
    Exact(String),
    Contains(String),
}

impl HostMatcher {
    /// Case-sensitive, like the host names the clusters export.
    pub fn matches(&self, host: &str) -> bool {
        match self {
            HostMatcher::Exact(p) => host == p,
            HostMatcher::Contains(p) => host.contains(p.as_str()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            HostMatcher::Exact(_) => "exact",
            HostMatcher::Contains(_) => "contains",
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            HostMatcher::Exact(p) | HostMatcher::Contains(p) => p,
        }
    }
}

impl fmt::Display for HostMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.pattern())
    }
}

/// A library location, either absolute or relative to the user's home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryPath {
    Absolute(PathBuf),
    UnderHome(PathBuf),
}

impl LibraryPath {
    pub fn resolve(&self, home: &Path) -> PathBuf {
        match self {
            LibraryPath::Absolute(p) => p.clone(),
            LibraryPath::UnderHome(rel) => home.join(rel),
        }
    }
}

/// Root under which the OpenBabel (Alexandria fork) installation is expected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PrefixRoot {
    #[default]
    Home,
    UnderHome(PathBuf),
    Absolute(PathBuf),
}

impl PrefixRoot {
    pub fn resolve(&self, home: &Path) -> PathBuf {
        match self {
            PrefixRoot::Home => home.to_path_buf(),
            PrefixRoot::UnderHome(rel) => home.join(rel),
            PrefixRoot::Absolute(p) => p.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProfile {
    pub name: String,
    pub blas: Option<LibraryPath>,
    pub lapack: Option<LibraryPath>,
    pub mpi_launcher: String, // Program name looked up on PATH (e.g. "srun")
    pub prefix_root: PrefixRoot,
    pub extra_dir_vars: Vec<String>, // Env vars whose values become extra CMake prefix dirs
}

impl HostProfile {
    pub fn darwin() -> Self {
        let conda = PathBuf::from("opt/miniconda3/lib");
        Self {
            name: "darwin".to_string(),
            blas: Some(LibraryPath::UnderHome(conda.join("libblas.dylib"))),
            lapack: Some(LibraryPath::UnderHome(conda.join("liblapack.dylib"))),
            mpi_launcher: "mpirun".to_string(),
            prefix_root: PrefixRoot::Home,
            extra_dir_vars: Vec::new(),
        }
    }

    pub fn nsc() -> Self {
        Self {
            name: "nsc".to_string(),
            blas: Some(LibraryPath::Absolute(NSC_OPENBLAS.into())),
            lapack: Some(LibraryPath::Absolute(NSC_SCALAPACK.into())),
            mpi_launcher: "srun".to_string(),
            prefix_root: PrefixRoot::UnderHome("wd".into()),
            extra_dir_vars: Vec::new(),
        }
    }

    pub fn hpc2n() -> Self {
        Self {
            name: "hpc2n".to_string(),
            blas: Some(LibraryPath::Absolute(HPC2N_OPENBLAS.into())),
            lapack: Some(LibraryPath::Absolute(HPC2N_SCALAPACK.into())),
            mpi_launcher: "srun".to_string(),
            prefix_root: PrefixRoot::UnderHome("wd".into()),
            extra_dir_vars: Vec::new(),
        }
    }

    pub fn csb() -> Self {
        Self {
            name: "csb".to_string(),
            blas: None,
            lapack: None,
            mpi_launcher: "srun".to_string(),
            prefix_root: PrefixRoot::Home,
            extra_dir_vars: vec!["LIBXML2".to_string(), "OPENBLAS".to_string()],
        }
    }

    /// Turns the profile into concrete paths for this environment.
    pub fn materialize(&self, identifier: &str, home: &Path, env: &Environment) -> ResolvedHost {
        ResolvedHost {
            profile: self.name.clone(),
            identifier: identifier.to_string(),
            blas: self.blas.as_ref().map(|p| p.resolve(home)),
            lapack: self.lapack.as_ref().map(|p| p.resolve(home)),
            mpi_launcher: self.mpi_launcher.clone(),
            prefix_root: self.prefix_root.resolve(home),
            extra_dirs: self
                .extra_dir_vars
                .iter()
                .filter_map(|var| env.var(var))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub matcher: HostMatcher,
    pub profile: HostProfile,
}

/// Ordered list of host profiles. The first matching entry wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTable {
    entries: Vec<HostEntry>,
}

impl HostTable {
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                HostEntry {
                    matcher: HostMatcher::Exact("darwin".to_string()),
                    profile: HostProfile::darwin(),
                },
                HostEntry {
                    matcher: HostMatcher::Contains("nsc".to_string()),
                    profile: HostProfile::nsc(),
                },
                HostEntry {
                    matcher: HostMatcher::Contains("hpc2n".to_string()),
                    profile: HostProfile::hpc2n(),
                },
                HostEntry {
                    matcher: HostMatcher::Contains("csb".to_string()),
                    profile: HostProfile::csb(),
                },
            ],
        }
    }

    /// Appends an entry after everything already in the table, so it can only match
    /// hosts that no earlier entry claims.
    pub fn push(&mut self, entry: HostEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HostEntry] {
        &self.entries
    }

    pub fn find(&self, host: &str) -> Option<&HostEntry> {
        self.entries.iter().find(|e| e.matcher.matches(host))
    }
}

/// A host profile with every path made concrete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHost {
    pub profile: String,
    pub identifier: String,
    pub blas: Option<PathBuf>,
    pub lapack: Option<PathBuf>,
    pub mpi_launcher: String,
    pub prefix_root: PathBuf,
    pub extra_dirs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        Environment::new("linux").with_var("HOME", "/home/alice")
    }

    #[test]
    fn builtin_table_preserves_priority_order() {
        let table = HostTable::builtin();
        let names: Vec<_> = table
            .entries()
            .iter()
            .map(|e| e.profile.name.as_str())
            .collect();
        assert_eq!(names, ["darwin", "nsc", "hpc2n", "csb"]);
    }

    #[test]
    fn darwin_requires_exact_match() {
        let table = HostTable::builtin();
        assert_eq!(table.find("darwin").unwrap().profile.name, "darwin");
        assert!(table.find("darwin21").is_none());
        assert!(table.find("Darwin").is_none());
    }

    #[test]
    fn substring_matchers_find_cluster_nodes() {
        let table = HostTable::builtin();
        assert_eq!(table.find("tetralith-nsc-7").unwrap().profile.name, "nsc");
        assert_eq!(table.find("b-cn0232.hpc2n.umu.se").unwrap().profile.name, "hpc2n");
        assert_eq!(table.find("csb-gpu01").unwrap().profile.name, "csb");
        assert!(table.find("unknown-cluster").is_none());
    }

    #[test]
    fn earlier_entries_win_when_several_match() {
        let table = HostTable::builtin();
        assert_eq!(table.find("nsc-csb-hpc2n").unwrap().profile.name, "nsc");
        assert_eq!(table.find("hpc2n-csb").unwrap().profile.name, "hpc2n");
    }

    #[test]
    fn pushed_entries_never_shadow_builtins() {
        let mut table = HostTable::builtin();
        table.push(HostEntry {
            matcher: HostMatcher::Contains("nsc".to_string()),
            profile: HostProfile {
                name: "custom".to_string(),
                ..HostProfile::csb()
            },
        });
        assert_eq!(table.find("nsc1").unwrap().profile.name, "nsc");
    }

    #[test]
    fn darwin_paths_are_relative_to_home() {
        let resolved = HostProfile::darwin().materialize("darwin", Path::new("/Users/bob"), &env());
        assert_eq!(
            resolved.blas.unwrap(),
            PathBuf::from("/Users/bob/opt/miniconda3/lib/libblas.dylib")
        );
        assert_eq!(
            resolved.lapack.unwrap(),
            PathBuf::from("/Users/bob/opt/miniconda3/lib/liblapack.dylib")
        );
        assert_eq!(resolved.mpi_launcher, "mpirun");
        assert_eq!(resolved.prefix_root, PathBuf::from("/Users/bob"));
    }

    #[test]
    fn nsc_uses_fixed_libraries_and_wd_prefix_root() {
        let resolved = HostProfile::nsc().materialize("nsc", Path::new("/home/alice"), &env());
        assert_eq!(resolved.blas.unwrap(), PathBuf::from(NSC_OPENBLAS));
        assert_eq!(resolved.lapack.unwrap(), PathBuf::from(NSC_SCALAPACK));
        assert_eq!(resolved.prefix_root, PathBuf::from("/home/alice/wd"));
        assert_eq!(resolved.mpi_launcher, "srun");
    }

    #[test]
    fn csb_collects_extra_dirs_from_set_variables_only() {
        let env = env().with_var("OPENBLAS", "/opt/openblas");
        let resolved = HostProfile::csb().materialize("csb1", Path::new("/home/alice"), &env);
        assert_eq!(resolved.extra_dirs, vec!["/opt/openblas".to_string()]);
        assert!(resolved.blas.is_none());
        assert!(resolved.lapack.is_none());

        let env = env
            .with_var("LIBXML2", "/opt/libxml2")
            .with_var("OPENBLAS", "/opt/openblas");
        let resolved = HostProfile::csb().materialize("csb1", Path::new("/home/alice"), &env);
        assert_eq!(resolved.extra_dirs, ["/opt/libxml2", "/opt/openblas"]);
    }
}
