use std::sync::Arc;
use std::time::Duration;

use crate::controllers::user::UserController;
use crate::core::config::Args;
use crate::core::error::ConfigError;
use crate::core::store::{FileStorage, Storage};
use crate::routes::guard::Landing;
use crate::session::manager::SessionManager;
use crate::token::store::TokenStore;

/// Composition root. Built once at startup and handed to whatever needs the session.
#[derive(Clone, Debug)]
pub struct AppState {
    pub session: Arc<SessionManager<UserController>>,
    pub landing: Landing,
}

impl AppState {
    pub fn new(config: &Args) -> Result<Self, ConfigError> {
        let storage = FileStorage::open(config.storage_path()?)?;

        tracing::debug!("Using storage at {}", storage.path().display());

        let landing = Landing {
            home: config.home_route.clone(),
            login: config.login_route.clone(),
        };

        Ok(Self::with_storage(
            Arc::new(storage),
            UserController::new(&config.api_url)?,
            landing,
            config.login_timeout(),
        ))
    }

    /// Restores the session from any stored token, dropping it if already expired.
    pub fn with_storage(
        storage: Arc<dyn Storage>,
        users: UserController,
        landing: Landing,
        login_timeout: Duration,
    ) -> Self {
        let session =
            SessionManager::new(TokenStore::new(storage), users).with_login_timeout(login_timeout);

        session.restore_from_token();
        session.reconcile();

        AppState {
            session: Arc::new(session),
            landing,
        }
    }

    pub fn users(&self) -> &UserController {
        self.session.authenticator()
    }
}
