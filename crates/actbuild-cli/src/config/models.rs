use actbuild::core::models::host::HostTable;
use actbuild::engine::config::BuildRequest;

pub struct AppConfig {
    pub request: BuildRequest,
    pub hosts: HostTable,
    pub dry_run: bool,
}
