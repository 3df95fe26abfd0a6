use crate::config::builder;
use crate::error::Result;
use actbuild::core::models::environment::Environment;
use actbuild::core::models::host::{HostTable, LibraryPath};
use std::path::Path;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let file_config = builder::load_file_config(config_path)?;
    let table = builder::build_host_table(file_config.hosts)?;
    let env = Environment::capture();

    print!("{}", render_table(&table, env.host_identifier()));
    Ok(())
}

/// One line per entry in match order; the entry that would be used for `current_host` is starred.
pub fn render_table(table: &HostTable, current_host: &str) -> String {
    let selected = table
        .entries()
        .iter()
        .position(|e| e.matcher.matches(current_host));
    let mut out = format!("Current host: {}\n", current_host);

    for (index, entry) in table.entries().iter().enumerate() {
        let marker = if selected == Some(index) {
            '*'
        } else {
            ' '
        };
        out.push_str(&format!(
            "{} {}. {:<10} {:<8} {:<12} launcher={} blas={}\n",
            marker,
            index + 1,
            entry.profile.name,
            entry.matcher.kind(),
            format!("'{}'", entry.matcher.pattern()),
            entry.profile.mpi_launcher,
            describe(entry.profile.blas.as_ref()),
        ));
    }

    if selected.is_none() {
        out.push_str("  (no profile matches the current host)\n");
    }
    out
}

fn describe(path: Option<&LibraryPath>) -> String {
    match path {
        None => "-".to_string(),
        Some(LibraryPath::Absolute(p)) => p.display().to_string(),
        Some(LibraryPath::UnderHome(p)) => format!("~/{}", p.display()),
    }
}
