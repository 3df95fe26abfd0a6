use crate::core::tools::process::quote;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagsError {
    #[error("Could not split extra flags '{0}': unbalanced quotes or trailing escape")]
    Unsplittable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmakeArg {
    Define { name: String, value: String },
    Raw(String),
}

impl CmakeArg {
    pub fn to_arg(&self) -> String {
        match self {
            CmakeArg::Define { name, value } => format!("-D{}={}", name, value),
            CmakeArg::Raw(arg) => arg.clone(),
        }
    }
}

/// Ordered CMake command-line arguments. Order is preserved because CMake applies
/// repeated `-D` definitions left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmakeFlags {
    args: Vec<CmakeArg>,
}

impl CmakeFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, value: impl fmt::Display) -> &mut Self {
        self.args.push(CmakeArg::Define {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn switch(&mut self, name: &str, on: bool) -> &mut Self {
        self.define(name, if on { "ON" } else { "OFF" })
    }

    pub fn raw(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(CmakeArg::Raw(arg.into()));
        self
    }

    /// Splits a user-supplied flag string with shell rules and appends every word
    /// unchanged.
    pub fn extend_from_str(&mut self, extra: &str) -> Result<&mut Self, FlagsError> {
        let words =
            shlex::split(extra).ok_or_else(|| FlagsError::Unsplittable(extra.to_string()))?;
        for word in words {
            self.raw(word);
        }
        Ok(self)
    }

    /// Value of the last `-D<name>=` definition, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.args.iter().rev().find_map(|a| match a {
            CmakeArg::Define { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn to_args(&self) -> Vec<String> {
        self.args.iter().map(CmakeArg::to_arg).collect()
    }
}

impl fmt::Display for CmakeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.args.iter().map(|a| quote(&a.to_arg())).collect();
        f.write_str(&rendered.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defines_render_as_dash_d_arguments() {
        let mut flags = CmakeFlags::new();
        flags
            .define("CMAKE_BUILD_TYPE", "Release")
            .switch("GMX_MPI", true)
            .switch("GMX_GPU", false);
        assert_eq!(
            flags.to_args(),
            [
                "-DCMAKE_BUILD_TYPE=Release",
                "-DGMX_MPI=ON",
                "-DGMX_GPU=OFF"
            ]
        );
        assert_eq!(
            flags.to_string(),
            "-DCMAKE_BUILD_TYPE=Release -DGMX_MPI=ON -DGMX_GPU=OFF"
        );
    }

    #[test]
    fn display_quotes_only_arguments_with_shell_metacharacters() {
        let mut flags = CmakeFlags::new();
        flags
            .define("MPIEXEC", "/usr/bin/srun")
            .define("CMAKE_CXX_FLAGS", "-O3 -march=native")
            .switch("GMX_DOUBLE", true);

        let rendered = flags.to_string();

        assert!(rendered.starts_with("-DMPIEXEC=/usr/bin/srun "));
        assert!(rendered.ends_with(" -DGMX_DOUBLE=ON"));
        assert_eq!(shlex::split(&rendered).unwrap(), flags.to_args());
    }

    #[test]
    fn get_returns_last_definition() {
        let mut flags = CmakeFlags::new();
        flags.define("GMX_SIMD", "AVX2_256");
        flags.extend_from_str("-DGMX_SIMD=None").unwrap();
        flags.define("GMX_SIMD", "AVX_512");
        assert_eq!(flags.get("GMX_SIMD"), Some("AVX_512"));
        assert!(!flags.contains("GMX_DOUBLE"));
    }

    #[test]
    fn extra_flags_are_shell_split_and_kept_verbatim() {
        let mut flags = CmakeFlags::new();
        flags
            .extend_from_str("-DGMX_SIMD=AVX2_256 \"-DCMAKE_CXX_FLAGS=-O3 -march=native\" -Wno-dev")
            .unwrap();
        assert_eq!(
            flags.to_args(),
            [
                "-DGMX_SIMD=AVX2_256",
                "-DCMAKE_CXX_FLAGS=-O3 -march=native",
                "-Wno-dev"
            ]
        );
        assert_eq!(flags.len(), 3);
    }

    #[test]
    fn empty_extra_flags_add_nothing() {
        let mut flags = CmakeFlags::new();
        flags.extend_from_str("   ").unwrap();
        assert!(flags.is_empty());
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        let mut flags = CmakeFlags::new();
        let err = flags.extend_from_str("-DFOO='bar").unwrap_err();
        assert_eq!(err, FlagsError::Unsplittable("-DFOO='bar".to_string()));
    }
}
