use crate::core::models::environment::Environment;
use crate::core::models::host::HostTable;
use crate::core::tools::locate::ExecutableLocator;
use crate::core::tools::process::{Invocation, ToolRunner};
use crate::core::tools::{cmake, git};
use crate::engine::config::{BuildRequest, ToolFailurePolicy};
use crate::engine::error::{EngineError, PreconditionFailure};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::resolver::{self, BuildConfiguration, BuildLayout};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// The collaborators an install run needs besides the request itself.
pub struct InstallContext<'a> {
    pub env: &'a Environment,
    pub hosts: &'a HostTable,
    pub locator: &'a dyn ExecutableLocator,
    pub runner: &'a dyn ToolRunner,
    pub workspace: &'a Path, // Directory the run starts in
}

#[derive(Debug, Clone)]
pub struct InstallReport {
    pub configuration: BuildConfiguration,
    pub logs: Vec<PathBuf>,
    pub tolerated_failures: Vec<String>, // Commands that failed under `ToolFailurePolicy::Ignore`
}

/// Resolves the build configuration without touching the filesystem or running any tool.
pub fn plan(
    request: &BuildRequest,
    ctx: &InstallContext<'_>,
) -> Result<BuildConfiguration, EngineError> {
    resolver::resolve(request, ctx.env, ctx.hosts, ctx.locator, ctx.workspace)
}

#[instrument(skip_all, name = "install_workflow", fields(branch = %request.branch))]
pub fn run(
    request: &BuildRequest,
    ctx: &InstallContext<'_>,
    reporter: &ProgressReporter,
) -> Result<InstallReport, EngineError> {
    let target = request.target();
    let layout = BuildLayout::new(request, ctx.workspace);
    let mut executor = Executor {
        runner: ctx.runner,
        policy: request.tool_failure_policy,
        logs: Vec::new(),
        tolerated: Vec::new(),
    };
    info!("Building {} from branch '{}'.", target, request.branch);

    if target.uses_branch_root() {
        create_dir(&layout.working_root)?;
    }

    // === Phase 1: Obtain the sources ===
    if request.clone {
        reporter.report(Progress::PhaseStart {
            name: "Cloning repository",
        });
        let url = target.repository_url(request.clone_scheme());
        executor.execute(git::clone(url, &layout.working_root, &layout.working_root))?;
        reporter.report(Progress::PhaseFinish);
    } else {
        reporter.report(Progress::PhaseSkipped {
            name: "Cloning repository",
            reason: "--clone not given".to_string(),
        });
    }

    if !layout.source_dir.is_dir() {
        return Err(PreconditionFailure::MissingSourceDirectory {
            dir: layout.source_dir,
        }
        .into());
    }

    if target.needs_checkout(&request.branch) {
        reporter.report(Progress::PhaseStart {
            name: "Checking out branch",
        });
        executor.execute(git::checkout_tracking(
            &request.branch,
            &layout.source_dir,
            &layout.working_root,
        ))?;
        executor.execute(git::pull(&layout.source_dir, &layout.working_root))?;
        reporter.report(Progress::PhaseFinish);
    }

    // === Phase 2: Resolve host, compilers and flags ===
    reporter.report(Progress::PhaseStart {
        name: "Resolving build configuration",
    });
    let configuration = plan(request, ctx)?;
    info!("FLAGS: {}", configuration.flags);
    reporter.report(Progress::Message(format!(
        "Host '{}' matched profile '{}'",
        configuration.host.identifier, configuration.host.profile
    )));
    reporter.report(Progress::Message(format!("FLAGS: {}", configuration.flags)));
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Configure and build ===
    let build_dir = &configuration.layout.build_dir;
    create_dir(build_dir)?;

    reporter.report(Progress::PhaseStart {
        name: "Configuring with CMake",
    });
    executor.execute(cmake::configure(&configuration.flags, build_dir))?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Building" });
    executor.execute(cmake::build(configuration.ncores, build_dir))?;
    reporter.report(Progress::PhaseFinish);

    info!(
        "Install finished; prefix {}",
        configuration.install_prefix.display()
    );
    Ok(InstallReport {
        configuration,
        logs: executor.logs,
        tolerated_failures: executor.tolerated,
    })
}

struct Executor<'a> {
    runner: &'a dyn ToolRunner,
    policy: ToolFailurePolicy,
    logs: Vec<PathBuf>, // Every log file a tool was asked to write, in run order
    tolerated: Vec<String>,
}

impl Executor<'_> {
    fn execute(&mut self, invocation: Invocation) -> Result<(), EngineError> {
        let command = invocation.command_line();
        info!("Running: {}", command);
        if let Some(log) = &invocation.log_file {
            self.logs.push(log.clone());
        }
        let outcome = self.runner.run(&invocation)?;
        if outcome.is_success() {
            return Ok(());
        }

        match self.policy {
            ToolFailurePolicy::Abort => Err(EngineError::Delegated {
                command,
                code: outcome.code,
                log: invocation.log_file,
            }),
            ToolFailurePolicy::Ignore => {
                warn!(
                    code = ?outcome.code,
                    "'{}' failed; continuing because tool failures are ignored.",
                    command
                );
                self.tolerated.push(command);
                Ok(())
            }
        }
    }
}

fn create_dir(path: &Path) -> Result<(), EngineError> {
    std::fs::create_dir_all(path).map_err(|source| EngineError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
