use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileHost};
use super::models::AppConfig;
use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use actbuild::core::models::host::HostTable;
use actbuild::core::models::target::Precision;
use actbuild::engine::config::{BuildRequestBuilder, ToolFailurePolicy};
use actbuild::engine::error::EngineError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `<config_dir>/config.toml` for the current user, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "dspoel", "actbuild").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Reads the explicitly given file, which must exist, or else the per-user default
/// file when present. Without either, an empty configuration is returned.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return FileConfig::from_file(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => FileConfig::from_file(&path),
        _ => {
            debug!("No configuration file found; using built-in defaults.");
            Ok(FileConfig::default())
        }
    }
}

pub fn build_config(args: &BuildArgs, file_config: FileConfig) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let file_defaults = file_config.defaults.take().unwrap_or_default();

    let branch = args
        .branch
        .clone()
        .or(file_defaults.branch)
        .unwrap_or(defaults.branch);
    let ncores = args
        .ncores
        .or(file_defaults.ncores)
        .unwrap_or(defaults.ncores);
    let build_type = args
        .build_type
        .clone()
        .or(file_defaults.build_type)
        .unwrap_or(defaults.build_type);
    let extra_flags = args
        .flags
        .clone()
        .or(file_defaults.flags)
        .unwrap_or_default();
    let user = args.user.clone().or(file_defaults.user);
    let single = args.single || file_defaults.single.unwrap_or(false);
    let use_cln = args.cln || file_defaults.cln.unwrap_or(false);
    let policy = if args.ignore_tool_failures {
        ToolFailurePolicy::Ignore
    } else {
        ToolFailurePolicy::Abort
    };

    let request = BuildRequestBuilder::new()
        .branch(branch)
        .extra_flags(extra_flags)
        .clone_repository(args.clone)
        .user(user)
        .ncores(ncores)
        .build_type(build_type)
        .precision(Precision::from_single_flag(single))
        .use_cln(use_cln)
        .tool_failure_policy(policy)
        .build()
        .map_err(EngineError::from)?;

    Ok(AppConfig {
        request,
        hosts: build_host_table(file_config.hosts)?,
        dry_run: args.dry_run,
    })
}

/// Built-in hosts first, then the configured ones in file order.
pub fn build_host_table(hosts: Vec<FileHost>) -> Result<HostTable> {
    let mut table = HostTable::builtin();
    for host in hosts {
        let entry = host.into_entry()?;
        if let Some(existing) = table.find(entry.matcher.pattern()) {
            debug!(
                "Configured host '{}' ({}) comes after '{}', which already matches its pattern.",
                entry.profile.name, entry.matcher, existing.profile.name
            );
        }
        table.push(entry);
    }
    Ok(table)
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;

        let defaults = config.defaults.get_or_insert_with(Default::default);
        match key {
            "defaults.branch" => defaults.branch = Some(value_str.to_string()),
            "defaults.build-type" => defaults.build_type = Some(value_str.to_string()),
            "defaults.flags" => defaults.flags = Some(value_str.to_string()),
            "defaults.user" => defaults.user = Some(value_str.to_string()),
            "defaults.ncores" => {
                defaults.ncores = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            "defaults.single" => defaults.single = Some(parse_bool(key, value_str)?),
            "defaults.cln" => defaults.cln = Some(parse_bool(key, value_str)?),
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid boolean value for {}: {} (expected true or false)",
            key, value
        ))
    })
}
