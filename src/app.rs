/*
 * Responsibility
 * - Tracing + panic hook setup
 * - Load Config -> build state -> assemble Router
 * - Apply HTTP middleware, then axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::auth::{CredentialStore, InMemoryCredentialStore};
use crate::state::AppState;

const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

// Prefer RUST_LOG if set and valid; otherwise use a sensible default.
// Ex:
// RUST_LOG=info,apikey_auth=debug,tower_http=debug cargo run
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_tracing() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(log_filter(rust_log.as_deref()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    // .env must be loaded before the subscriber reads RUST_LOG
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::from_env()?;

    // development: crash loudly
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    let store = InMemoryCredentialStore::from_entries(
        config
            .api_keys
            .iter()
            .map(|entry| (entry.name.as_str(), entry.key.as_str())),
    )?;

    tracing::info!(
        backend = store.backend_name(),
        keys = store.len(),
        "credential store ready"
    );

    Ok(AppState::new(Arc::new(store)))
}

fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router)
}
