//! Listing Core - Service entry point
//!
//! Boots the listing lifecycle service:
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌───────────┐    ┌──────────┐
//! │  Config  │───▶│  Store   │───▶│  Service  │───▶│ Gateway  │
//! │  (YAML)  │    │ (Pg/Mem) │    │ (domain)  │    │  (HTTP)  │
//! └──────────┘    └──────────┘    └───────────┘    └──────────┘
//! ```
//!
//! Storage is selected from config: a `postgres_url` enables the
//! PostgreSQL store, otherwise the in-memory store is used.

use std::sync::Arc;

use listing_core::config::AppConfig;
use listing_core::db::Database;
use listing_core::gateway;
use listing_core::gateway::state::AppState;
use listing_core::listings::{
    ListingService, ListingStore, LogSink, MemoryListingStore, PgListingStore,
};
use listing_core::logging::init_logging;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() {
    let env = get_env();
    let app_config = AppConfig::load(&env);
    let _log_guard = init_logging(&app_config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        "Starting Listing Core in {} mode",
        env
    );

    let port = get_port_override().unwrap_or(app_config.gateway.port);

    // Storage selection: PostgreSQL when configured, in-memory otherwise
    let (store, pg_db): (Arc<dyn ListingStore>, Option<Arc<Database>>) =
        match &app_config.postgres_url {
            Some(url) => match Database::connect(url).await {
                Ok(db) => {
                    let db = Arc::new(db);
                    println!("✅ PostgreSQL store connected");
                    (
                        Arc::new(PgListingStore::new(db.pool().clone())),
                        Some(db),
                    )
                }
                Err(e) => {
                    eprintln!("❌ FATAL: Failed to connect to PostgreSQL: {}", e);
                    std::process::exit(1);
                }
            },
            None => {
                println!("⚠️  No postgres_url configured, using in-memory store");
                tracing::warn!("running with in-memory store, data will not persist");
                (Arc::new(MemoryListingStore::new()), None)
            }
        };

    let service = Arc::new(ListingService::new(store, Arc::new(LogSink)));
    let state = Arc::new(AppState::new(service, pg_db));

    println!(
        "Gateway will listen on {}:{}",
        app_config.gateway.host, port
    );

    gateway::run_server(&app_config.gateway.host, port, state).await;
}
