use super::process::Invocation;
use crate::core::flags::CmakeFlags;
use std::path::Path;

pub const CMAKE_LOG: &str = "cmake.log";
pub const MAKE_LOG: &str = "make.log";

/// Targets built after configuration: the installed programs and the test binaries.
pub const BUILD_TARGETS: [&str; 2] = ["install", "tests"];

/// `cmake <flags> ..` inside the build directory, output captured in `cmake.log`.
pub fn configure(flags: &CmakeFlags, build_dir: &Path) -> Invocation {
    Invocation::new("cmake", build_dir)
        .args(flags.to_args())
        .arg("..")
        .log_to(build_dir.join(CMAKE_LOG))
}

/// `make -j <ncores> install tests`, output captured in `make.log`.
pub fn build(ncores: usize, build_dir: &Path) -> Invocation {
    Invocation::new("make", build_dir)
        .arg("-j")
        .arg(ncores.to_string())
        .args(BUILD_TARGETS)
        .log_to(build_dir.join(MAKE_LOG))
}
