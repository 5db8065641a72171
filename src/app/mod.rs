pub mod serve;

// re-export
pub use serve::serve;

use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::{AppConfig, ConfigError, StoreConfig, StoreKind},
    store::{MemoryStore, PostgrestStore, WaitlistStore},
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let store = build_store(&config.store_config)?;
        let app_state = AppState::new(store);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }
}

fn build_store(store_config: &StoreConfig) -> Result<Arc<dyn WaitlistStore>> {
    info!("{:<20} - {:?}", "Initializing store", store_config.kind);

    let store: Arc<dyn WaitlistStore> = match store_config.kind {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Postgrest => {
            let api_key = store_config
                .api_key
                .clone()
                .ok_or(ConfigError::MissingApiKey)?;
            Arc::new(PostgrestStore::new(
                &store_config.url,
                store_config.table.clone(),
                api_key,
                store_config.timeout(),
            )?)
        }
    };

    Ok(store)
}

pub struct InternalState {
    pub store: Arc<dyn WaitlistStore>,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(store: Arc<dyn WaitlistStore>) -> Self {
        AppState(Arc::new(InternalState { store }))
    }
}
