use crate::core::models::target::{BuildTarget, CloneScheme, Precision};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// What to do when git, CMake or make exits with a non-zero status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolFailurePolicy {
    #[default]
    Abort,
    /// Log a warning and carry on; the tool's log file is the only record.
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub branch: String,
    pub extra_flags: String,
    pub clone: bool,
    pub user: Option<String>,
    pub ncores: usize,
    pub build_type: String,
    pub precision: Precision,
    pub use_cln: bool,
    pub tool_failure_policy: ToolFailurePolicy,
}

impl BuildRequest {
    pub fn target(&self) -> BuildTarget {
        BuildTarget::from_branch(&self.branch)
    }

    pub fn clone_scheme(&self) -> CloneScheme {
        CloneScheme::for_user(self.user.as_deref())
    }
}

#[derive(Default)]
pub struct BuildRequestBuilder {
    branch: Option<String>,
    extra_flags: Option<String>,
    clone: bool,
    user: Option<String>,
    ncores: Option<usize>,
    build_type: Option<String>,
    precision: Precision,
    use_cln: bool,
    tool_failure_policy: ToolFailurePolicy,
}

impl BuildRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
    pub fn extra_flags(mut self, flags: impl Into<String>) -> Self {
        self.extra_flags = Some(flags.into());
        self
    }
    pub fn clone_repository(mut self, clone: bool) -> Self {
        self.clone = clone;
        self
    }
    pub fn user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }
    pub fn ncores(mut self, ncores: usize) -> Self {
        self.ncores = Some(ncores);
        self
    }
    pub fn build_type(mut self, build_type: impl Into<String>) -> Self {
        self.build_type = Some(build_type.into());
        self
    }
    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
    pub fn use_cln(mut self, use_cln: bool) -> Self {
        self.use_cln = use_cln;
        self
    }
    pub fn tool_failure_policy(mut self, policy: ToolFailurePolicy) -> Self {
        self.tool_failure_policy = policy;
        self
    }

    pub fn build(self) -> Result<BuildRequest, ConfigError> {
        let branch = self
            .branch
            .ok_or(ConfigError::MissingParameter("branch"))?;
        if branch.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "branch",
                reason: "branch name cannot be empty".to_string(),
            });
        }

        let ncores = self
            .ncores
            .ok_or(ConfigError::MissingParameter("ncores"))?;
        if ncores == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "ncores",
                reason: "must be at least 1".to_string(),
            });
        }

        let build_type = self
            .build_type
            .ok_or(ConfigError::MissingParameter("build_type"))?;
        if build_type.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "build_type",
                reason: "build type cannot be empty".to_string(),
            });
        }

        Ok(BuildRequest {
            branch,
            extra_flags: self.extra_flags.unwrap_or_default(),
            clone: self.clone,
            user: self.user,
            ncores,
            build_type,
            precision: self.precision,
            use_cln: self.use_cln,
            tool_failure_policy: self.tool_failure_policy,
        })
    }
}
