//! Application state wiring the session registry and outbound clients.
//!
//! Sessions live in memory only and are dropped after sitting idle for
//! `server.session_ttl_secs`. The form store and quotation service are
//! pinned to the HTTP implementations from `formcraft-infra`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use formcraft_core::quotation::QuotationService;
use formcraft_core::session::FormSession;
use formcraft_infra::client::build_http_client;
use formcraft_infra::config::{load_global_config, resolve_data_dir, with_api_url};
use formcraft_infra::quotation::HttpQuotationClient;
use formcraft_infra::store::HttpFormStore;
use formcraft_types::config::GlobalConfig;
use formcraft_types::record::SessionId;

pub type ConcreteQuotationService = QuotationService<HttpQuotationClient>;

/// A live session and the last time a request touched it.
#[derive(Debug)]
pub struct SessionSlot {
    pub session: FormSession,
    pub last_seen: Instant,
}

impl SessionSlot {
    pub fn new(session: FormSession) -> Self {
        Self {
            session,
            last_seen: Instant::now(),
        }
    }
}

/// Shared application state used by CLI commands and REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<DashMap<SessionId, SessionSlot>>,
    pub form_store: Arc<HttpFormStore>,
    pub quotation_service: Arc<ConcreteQuotationService>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, load `config.toml` and wire the clients.
    pub async fn init(api_url: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = with_api_url(load_global_config(&data_dir).await, api_url);

        tracing::debug!(
            data_dir = %data_dir.display(),
            api_base_url = %config.api_base_url,
            "Application state initialized"
        );

        Ok(Self::new(config, data_dir))
    }

    pub fn new(config: GlobalConfig, data_dir: PathBuf) -> Self {
        let http = build_http_client(&config);
        let form_store = HttpFormStore::new(http.clone(), config.api_base_url.clone());
        let quotation = HttpQuotationClient::new(http, config.api_base_url.clone());

        Self {
            sessions: Arc::new(DashMap::new()),
            form_store: Arc::new(form_store),
            quotation_service: Arc::new(QuotationService::new(quotation)),
            config: Arc::new(config),
            data_dir,
        }
    }

    /// Drop sessions idle for at least `ttl`. Returns how many were removed.
    pub fn sweep_idle(&self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, slot| slot.last_seen.elapsed() < ttl);
        before.saturating_sub(self.sessions.len())
    }

    /// Periodically sweep idle sessions until the runtime shuts down.
    /// A zero TTL disables expiry.
    pub fn spawn_session_sweeper(&self) {
        let ttl_secs = self.config.server.session_ttl_secs;
        if ttl_secs == 0 {
            return;
        }
        let ttl = Duration::from_secs(ttl_secs);
        let state = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(ttl.min(Duration::from_secs(60)));
            loop {
                ticker.tick().await;
                let removed = state.sweep_idle(ttl);
                if removed > 0 {
                    tracing::info!(removed, remaining = state.sessions.len(), "Expired idle sessions");
                }
            }
        });
    }
}
