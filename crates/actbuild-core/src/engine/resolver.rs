use super::config::BuildRequest;
use super::error::{EngineError, PreconditionFailure};
use crate::core::flags::CmakeFlags;
use crate::core::models::environment::Environment;
use crate::core::models::host::{HostTable, ResolvedHost};
use crate::core::models::target::BuildTarget;
use crate::core::models::toolchain::CompilerPair;
use crate::core::tools::locate::ExecutableLocator;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// OpenBabel (Alexandria fork) install location, relative to the host's prefix root.
pub const OPENBABEL_PREFIX: &str = "GG/openbabel-alexandria/install";

/// CMake list separator used to join prefix-path entries.
const CMAKE_LIST_SEPARATOR: &str = ";";

/// Where the checkout and the build tree live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    pub working_root: PathBuf, // Directory that holds the clone
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
}

impl BuildLayout {
    pub fn new(request: &BuildRequest, workspace: &Path) -> Self {
        let target = request.target();
        let working_root = if target.uses_branch_root() {
            workspace.join(&request.branch)
        } else {
            workspace.to_path_buf()
        };
        let source_dir = working_root.join(target.directory_name());
        let build_dir = source_dir.join(request.precision.build_dir_name(&request.build_type));
        Self {
            working_root,
            source_dir,
            build_dir,
        }
    }
}

/// Everything needed to run the configure and build steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub target: BuildTarget,
    pub branch: String,
    pub layout: BuildLayout,
    pub install_prefix: PathBuf,
    pub host: ResolvedHost,
    pub compilers: CompilerPair,
    pub mpi_launcher: Option<PathBuf>,
    pub prefix_path: String,
    pub flags: CmakeFlags,
    pub ncores: usize,
}

/// Derives the full build configuration for `request` on the host described by `env`.
///
/// Fails, in this order, when `HOME` is unset, when no host profile matches, or when
/// either MPI compiler wrapper cannot be found. Nothing on disk is touched.
pub fn resolve(
    request: &BuildRequest,
    env: &Environment,
    hosts: &HostTable,
    locator: &dyn ExecutableLocator,
    workspace: &Path,
) -> Result<BuildConfiguration, EngineError> {
    let home = env.home().ok_or(PreconditionFailure::MissingHome)?;
    let target = request.target();

    let identifier = env.host_identifier();
    let entry = hosts
        .find(identifier)
        .ok_or_else(|| PreconditionFailure::UnknownHost {
            host: identifier.to_string(),
        })?;
    let host = entry.profile.materialize(identifier, home, env);
    debug!(
        host = %identifier,
        profile = %host.profile,
        "matched host profile ({})",
        entry.matcher
    );

    let prefix_path = prefix_path(&host);

    let compilers = CompilerPair::discover(locator).map_err(PreconditionFailure::from)?;
    debug!(cc = %compilers.cc.display(), cxx = %compilers.cxx.display(), "found MPI compilers");

    let mpi_launcher = locator.which(&host.mpi_launcher);
    if mpi_launcher.is_none() {
        warn!(
            "MPI launcher '{}' not found on PATH; leaving MPIEXEC for CMake to detect.",
            host.mpi_launcher
        );
    }

    let install_prefix = home.join(format!("{}-{}", target.directory_name(), request.branch));

    let flags = compose_flags(
        request,
        &host,
        &compilers,
        mpi_launcher.as_deref(),
        &install_prefix,
        &prefix_path,
    )?;

    Ok(BuildConfiguration {
        target,
        branch: request.branch.clone(),
        layout: BuildLayout::new(request, workspace),
        install_prefix,
        host,
        compilers,
        mpi_launcher,
        prefix_path,
        flags,
        ncores: request.ncores,
    })
}

/// OpenBabel prefix under the host's root, followed by any extra directories.
pub fn prefix_path(host: &ResolvedHost) -> String {
    std::iter::once(host.prefix_root.join(OPENBABEL_PREFIX).display().to_string())
        .chain(host.extra_dirs.iter().cloned())
        .collect::<Vec<_>>()
        .join(CMAKE_LIST_SEPARATOR)
}

/// Builds the CMake argument list: fixed infrastructure switches, derived paths,
/// host BLAS/LAPACK overrides, the user's extra flags, then CLN and precision.
pub fn compose_flags(
    request: &BuildRequest,
    host: &ResolvedHost,
    compilers: &CompilerPair,
    mpi_launcher: Option<&Path>,
    install_prefix: &Path,
    prefix_path: &str,
) -> Result<CmakeFlags, EngineError> {
    let mut flags = CmakeFlags::new();

    if let Some(launcher) = mpi_launcher {
        flags.define("MPIEXEC", launcher.display());
    }
    flags
        .define("MPIEXEC_NUMPROC_FLAG", "-n")
        .switch("GMX_X11", false)
        .switch("GMX_LOAD_PLUGINS", false)
        .switch("BUILD_SHARED_LIBS", false)
        .switch("GMX_OPENMP", false)
        .switch("GMX_MPI", true)
        .switch("GMX_GPU", false)
        .define("CMAKE_INSTALL_PREFIX", install_prefix.display())
        .define("CMAKE_CXX_COMPILER", compilers.cxx.display())
        .define("CMAKE_C_COMPILER", compilers.cc.display())
        .define("CMAKE_BUILD_TYPE", &request.build_type)
        .define("CMAKE_PREFIX_PATH", prefix_path)
        .switch("GMX_BUILD_MANUAL", false)
        .switch("GMX_COMPACT_DOXYGEN", true)
        .switch("REGRESSIONTEST_DOWNLOAD", false)
        .switch("GMX_DEFAULT_SUFFIX", false)
        .switch("GMX_LIBXML2", true)
        .switch("GMX_EXTERNAL_BLAS", true)
        .switch("GMX_EXTERNAL_LAPACK", true);

    if let (Some(blas), Some(lapack)) = (&host.blas, &host.lapack) {
        flags
            .define("GMX_BLAS_USER", blas.display())
            .define("GMX_LAPACK_USER", lapack.display());
    }

    flags.extend_from_str(&request.extra_flags)?;

    if request.use_cln {
        flags.switch("GMX_CLN", true);
    }
    if request.precision.is_double() {
        flags.switch("GMX_DOUBLE", true);
    }

    Ok(flags)
}
