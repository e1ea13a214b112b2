pub mod api;
pub mod cli;
pub mod config;
pub mod guard;
pub mod models;
pub mod session;
pub mod ui;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use tracing::{debug, info};

use api::{ApiClient, ClientError};
use config::Config;
use guard::Destination;
use session::{FileStorage, SessionStorage, SessionStore};

/// Everything a page needs: configuration, the session and the API client.
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: Arc<ApiClient>,
}

impl AppContext {
    /// Build the context with session state persisted under the configured
    /// data directory, rehydrating any session left by a previous run.
    pub fn start(config: Config) -> Result<Self, ClientError> {
        let storage = Arc::new(FileStorage::in_dir(&config.session.data_dir));
        Self::with_storage(config, storage)
    }

    pub fn with_storage(
        config: Config,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<Self, ClientError> {
        let session = Arc::new(SessionStore::new(storage));
        match session.initialize()? {
            Some(identity) => info!(user_id = identity.id, role = %identity.role, "Restored session"),
            None => debug!("No saved session"),
        }

        let api = Arc::new(ApiClient::new(&config.api, session.clone())?);
        Ok(Self {
            config,
            session,
            api,
        })
    }

    /// Where a navigation to `requested` lands for the current session.
    pub fn navigate(&self, requested: Destination) -> Destination {
        ui::navigate(&self.session, requested)
    }
}
