//! PropDesk API server binary
//!
//! Usage:
//!   PROPDESK_DATA_ROOT=/srv/propdesk ./propdesk-server
//!
//! Environment variables:
//!   - PROPDESK_DATA_ROOT: Data directory (default: ~/.propdesk)
//!   - PROPDESK_API_HOST: Bind address (default: 127.0.0.1)
//!   - PROPDESK_API_PORT: Port number (default: 3030)
//!   - PROPDESK_LOG: Log level (default: info)

use std::process::ExitCode;
use std::sync::Arc;

use propdesk_lib::api::{self, AppState};
use propdesk_lib::config::AppConfig;
use propdesk_lib::error::AppResult;
use propdesk_lib::logging;
use propdesk_lib::services::users;
use propdesk_lib::store::Store;
use propdesk_lib::utils::paths;

#[tokio::main]
async fn main() -> ExitCode {
    let data_root = match paths::get_data_root() {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match AppConfig::load(&data_root) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.logging.level) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(config, &data_root).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig, data_root: &std::path::Path) -> AppResult<()> {
    tracing::info!(data_root = %data_root.display(), "Starting PropDesk server");

    let store = Store::open(&paths::records_dir(data_root))?;

    match &config.bootstrap_admin {
        Some(admin) => {
            if !users::bootstrap_admin(&store, admin).await? {
                tracing::debug!("Users exist; bootstrap admin skipped");
            }
        }
        None => {
            if store.users.list().await?.is_empty() {
                tracing::warn!("No users exist and no bootstrap_admin is configured; nobody can sign in");
            }
        }
    }

    let state = Arc::new(AppState::new(store, config));
    api::start_server(state).await
}
