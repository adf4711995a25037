pub mod bot;
pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod registry;
pub mod routes;
pub mod test_util;

pub use bot::{Bot, Command, CompletenessCheck, RandomCompleteness};
pub use chat::{ChatNotifier, Notifier};
pub use config::Config;
pub use error::{BotError, StartupError};
pub use registry::{RegistryError, RowStore, SheetsRowStore, SqliteRowStore, StoreError, UserRegistry};

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::RegistryBackend;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub bot: Bot,
}

impl AppState {
    pub fn new(config: Config, bot: Bot) -> Self {
        Self { config, bot }
    }

    /// Wire the production collaborators described by `config`.
    pub fn from_config(config: Config) -> Result<Self, StartupError> {
        let store: Arc<dyn RowStore> = match config.registry.backend {
            RegistryBackend::Sheets if config.registry.spreadsheet_id.trim().is_empty() => {
                return Err(StartupError::MissingSpreadsheetId);
            }
            RegistryBackend::Sheets => Arc::new(SheetsRowStore::new(
                &config.google.sheets_base_url,
                &config.registry.spreadsheet_id,
                &config.registry.sheet_name,
                &config.google.access_token,
            )),
            RegistryBackend::Sqlite => Arc::new(SqliteRowStore::new(
                &config.registry.sqlite_path,
                registry::header_row(&config.registry.columns),
            )?),
        };
        tracing::info!("User registry backend: {}", store.kind());

        let registry = Arc::new(UserRegistry::new(store, config.registry.columns));
        let notifier = Arc::new(ChatNotifier::new(
            &config.google.chat_base_url,
            &config.google.access_token,
        ));
        let bot = Bot::new(
            registry,
            notifier,
            Arc::new(RandomCompleteness),
            config.commands.clone(),
        );

        Ok(Self::new(config, bot))
    }
}

/// Full HTTP application: health check plus the Google Chat event endpoint.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::events::router(state))
        .layer(axum::middleware::from_fn(logging::request_logger))
        .layer(TraceLayer::new_for_http())
}
