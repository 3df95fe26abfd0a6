use clap::{Args, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

/// Long options that were historically spelled with a single dash (`-clone`, `-bt`, ...).
const LEGACY_SINGLE_DASH: [&str; 5] = ["clone", "ncores", "bt", "single", "cln"];

/// Options that consume the following argument as their value.
const VALUE_OPTIONS: [&str; 14] = [
    "-b", "--branch", "-f", "--flags", "-u", "--user", "-c", "--config", "-S", "--set",
    "--log-file", "--ncores", "--bt", "--build",
];

#[derive(Parser, Debug)]
#[command(
    author = "ACT Developers",
    version,
    about = "actbuild - Clone, configure and build ACT or GROMACS with host-specific MPI, BLAS and LAPACK settings.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Print the known host profiles in match order and exit
    #[arg(long)]
    pub list_hosts: bool,

    /// Path to a TOML configuration file with defaults and extra host profiles
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Parses the process arguments, accepting the single-dash long spellings.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_legacy_args(std::env::args_os()))
    }
}

/// Arguments describing what to build and how.
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Branch to build. "main" and "david" select ACT, anything else selects GROMACS [default: main]
    #[arg(short, long, value_name = "NAME")]
    pub branch: Option<String>,

    /// Additional CMake flags, appended verbatim after the generated ones
    #[arg(short, long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub flags: Option<String>,

    /// Account name; when given, the repository is cloned over SSH instead of HTTPS
    #[arg(short, long, value_name = "NAME")]
    pub user: Option<String>,

    /// Clone the git repository before building
    #[arg(long)]
    pub clone: bool,

    /// Number of cores for compiling [default: 8]
    #[arg(long, value_name = "N")]
    pub ncores: Option<usize>,

    /// CMake build type. Typically Release or Debug; Profile and ASAN are available too [default: Release]
    #[arg(long = "build", visible_alias = "bt", value_name = "TYPE")]
    pub build_type: Option<String>,

    /// Single precision build (double precision is the default)
    #[arg(long)]
    pub single: bool,

    /// Use the Class Library for Numbers (CLN)
    #[arg(long)]
    pub cln: bool,

    /// Resolve and print the build configuration without cloning, configuring or building
    #[arg(long)]
    pub dry_run: bool,

    /// Keep going when git, cmake or make exit with an error; only their logs record it
    #[arg(long)]
    pub ignore_tool_failures: bool,

    /// Set a configuration value, overriding the config file. Can be used multiple times.
    /// Example: -S defaults.ncores=16
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Rewrites `-clone`, `-ncores`, `-bt`, `-single` and `-cln` (optionally with `=value`)
/// to their double-dash forms. Values of options are left untouched.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Vec::new();
    let mut value_expected = false;

    for arg in args {
        if value_expected {
            value_expected = false;
            normalized.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };

        let rewritten = match text.strip_prefix('-') {
            Some(body) if !body.starts_with('-') => {
                let name = body.split('=').next().unwrap_or(body);
                LEGACY_SINGLE_DASH
                    .contains(&name)
                    .then(|| format!("-{}", text))
            }
            _ => None,
        };
        let text = rewritten.unwrap_or_else(|| text.to_string());

        value_expected = VALUE_OPTIONS.contains(&text.as_str());
        normalized.push(OsString::from(text));
    }

    normalized
}
