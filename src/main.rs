//! Time clock server binary.
//!
//! Usage: `timeclock [CONFIG_PATH]`. Without an argument the path is read
//! from `TIMECLOCK_CONFIG`, falling back to `./config/timeclock.yaml`.

use std::env;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use timeclock::api::{create_router, AppState};
use timeclock::clock::SystemClock;
use timeclock::config::ConfigLoader;
use timeclock::store::{InMemoryStore, TimeClockStore};
use timeclock::terminal::Terminal;

const DEFAULT_CONFIG_PATH: &str = "./config/timeclock.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // RUST_LOG wins; otherwise info for everything.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("TIMECLOCK_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = ConfigLoader::load(&config_path)?.into_config();
    info!(
        path = %config_path,
        users = config.seed.users.len(),
        stations = config.seed.stations.len(),
        "Configuration loaded"
    );

    let store: Arc<dyn TimeClockStore> = Arc::new(InMemoryStore::with_records(
        config.seed.users,
        config.seed.stations,
    ));
    let terminal = Terminal::new(store.clone(), Arc::new(SystemClock), &config.terminal);
    let state = AppState::new(terminal, store);

    let _revalidation = state.spawn_revalidation(Duration::from_secs(
        config.terminal.revalidation_interval_secs,
    ));

    let listener = TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "Time clock API listening");
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
