use crate::core::tools::locate::ExecutableLocator;
use std::path::PathBuf;
use thiserror::Error;

pub const MPI_CC: &str = "mpicc";
pub const MPI_CXX: &str = "mpicxx";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Cannot find the MPI enabled mpicc and mpicxx compilers (missing: {})", missing.join(", "))]
pub struct MissingCompilers {
    pub missing: Vec<&'static str>,
}

/// MPI compiler wrappers used for both the C and C++ sides of the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerPair {
    pub cc: PathBuf,
    pub cxx: PathBuf,
}

impl CompilerPair {
    /// Looks up `mpicc` and `mpicxx`. Both must resolve to a non-empty path.
    pub fn discover(locator: &dyn ExecutableLocator) -> Result<Self, MissingCompilers> {
        let lookup = |name: &str| {
            locator
                .which(name)
                .filter(|p| !p.as_os_str().is_empty())
        };
        let cc = lookup(MPI_CC);
        let cxx = lookup(MPI_CXX);

        match (cc, cxx) {
            (Some(cc), Some(cxx)) => Ok(Self { cc, cxx }),
            (cc, cxx) => {
                let mut missing = Vec::new();
                if cc.is_none() {
                    missing.push(MPI_CC);
                }
                if cxx.is_none() {
                    missing.push(MPI_CXX);
                }
                Err(MissingCompilers { missing })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tools::locate::StaticLocator;

    #[test]
    fn discover_returns_both_compilers() {
        let locator = StaticLocator::new()
            .with(MPI_CC, "/usr/bin/mpicc")
            .with(MPI_CXX, "/usr/bin/mpicxx");
        let pair = CompilerPair::discover(&locator).unwrap();
        assert_eq!(pair.cc, PathBuf::from("/usr/bin/mpicc"));
        assert_eq!(pair.cxx, PathBuf::from("/usr/bin/mpicxx"));
    }

    #[test]
    fn discover_reports_each_missing_compiler() {
        let locator = StaticLocator::new().with(MPI_CC, "/usr/bin/mpicc");
        let err = CompilerPair::discover(&locator).unwrap_err();
        assert_eq!(err.missing, vec![MPI_CXX]);

        let err = CompilerPair::discover(&StaticLocator::new()).unwrap_err();
        assert_eq!(err.missing, vec![MPI_CC, MPI_CXX]);
        assert!(err.to_string().starts_with("Cannot find the MPI enabled"));
    }

    #[test]
    fn empty_lookup_result_counts_as_missing() {
        let locator = StaticLocator::new()
            .with(MPI_CC, "")
            .with(MPI_CXX, "/usr/bin/mpicxx");
        let err = CompilerPair::discover(&locator).unwrap_err();
        assert_eq!(err.missing, vec![MPI_CC]);
    }
}
