//! HTTP server assembly: shared state, router and startup.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod validation;

use crate::auth::AuthService;
use crate::config::Config;
use crate::core::clock::{Clock, GermanyClock, HttpTimeProvider, SystemClock, format_display};
use crate::errors::{AppError, AppResult};
use crate::store::records::RecordStore;
use crate::store::users::UserStore;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Everything the handlers need. Cheap to clone: the stores hold paths and
/// the clocks are shared behind Arcs.
#[derive(Clone)]
pub struct AppState {
    pub records: RecordStore,
    pub users: UserStore,
    pub auth: AuthService,
    pub clock: GermanyClock,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let data_dir = Path::new(&cfg.data_dir);
        let records = RecordStore::new(data_dir);
        let users = UserStore::new(data_dir);

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let provider = HttpTimeProvider::new(&cfg.time_api_url, cfg.time_api_timeout_ms)?;
        let germany = GermanyClock::new(Arc::new(provider), Arc::clone(&clock));
        let auth = AuthService::new(users.clone(), clock, cfg.token_ttl_minutes);

        Ok(Self {
            records,
            users,
            auth,
            clock: germany,
        })
    }
}

/// Bind the configured address and serve until stopped.
pub async fn serve(cfg: Config) -> AppResult<()> {
    init_tracing();

    let state = AppState::from_config(&cfg)?;

    // Touching the stores up front seeds missing documents and surfaces
    // permission problems before the first request arrives.
    state.users.load().await?;
    state.records.load().await?;

    let addr: SocketAddr = cfg
        .bind
        .parse()
        .map_err(|_| AppError::Config(format!("invalid bind address: {}", cfg.bind)))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let started = state.clock.now_iso().await;
    tracing::info!(
        "stempeluhr listening on http://{addr} (Germany time {})",
        format_display(&started)
    );

    axum::serve(listener, routes::router(state)).await?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .ok();
}
