use parking_lot::Mutex;

use crate::controllers::Authenticator;
use crate::session::manager::SessionManager;
use crate::types::user::SessionState;

/// Imperative navigation. Redirects are fire-and-forget.
pub trait Navigator {
    fn redirect(&self, path: &str);
}

/// Keeps every redirect it was asked to perform, in order.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    redirects: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.redirects.lock().last().cloned()
    }
}

impl Navigator for HistoryNavigator {
    fn redirect(&self, path: &str) {
        tracing::debug!(path, "Redirect");
        self.redirects.lock().push(path.to_owned());
    }
}

/// Landing routes for each side of the login wall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Landing {
    pub home: String,
    pub login: String,
}

impl Default for Landing {
    fn default() -> Self {
        Self {
            home: "/home".to_owned(),
            login: "/login".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Render,
    Redirect(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    /// Content for logged-in users only; anonymous visitors go to the login page.
    Protected,
    /// Login and registration; logged-in users go to the home page.
    AuthOnly,
}

impl Guard {
    pub fn decide(&self, state: &SessionState, landing: &Landing) -> Decision {
        match (self, state.is_authenticated()) {
            (Guard::Protected, false) => Decision::Redirect(landing.login.clone()),
            (Guard::AuthOnly, true) => Decision::Redirect(landing.home.clone()),
            _ => Decision::Render,
        }
    }

    /// Reconciles the session first, so every evaluation sees expiry.
    pub fn evaluate<A: Authenticator>(
        &self,
        session: &SessionManager<A>,
        landing: &Landing,
    ) -> Decision {
        self.decide(&session.reconcile(), landing)
    }

    /// Renders `content` or issues exactly one redirect and renders nothing.
    pub fn render<A, T, F>(
        &self,
        session: &SessionManager<A>,
        landing: &Landing,
        navigator: &dyn Navigator,
        content: F,
    ) -> Option<T>
    where
        A: Authenticator,
        F: FnOnce() -> T,
    {
        match self.evaluate(session, landing) {
            Decision::Render => Some(content()),
            Decision::Redirect(path) => {
                navigator.redirect(&path);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;

    use crate::core::error::AuthError;
    use crate::core::store::{MemoryStorage, Storage};
    use crate::token::codec::mint_token;
    use crate::token::store::{ACCESS_TOKEN_KEY, TokenStore};
    use crate::types::user::{Credentials, Profile};

    struct Offline;

    impl Authenticator for Offline {
        async fn login(&self, _credentials: &Credentials) -> Result<String, AuthError> {
            Err(AuthError::NoResponse("offline".into()))
        }

        async fn profile(&self, _token: &str) -> Result<Profile, AuthError> {
            Err(AuthError::NoResponse("offline".into()))
        }
    }

    fn session(token: Option<String>) -> (Arc<MemoryStorage>, SessionManager<Offline>) {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(token) = token {
            storage.set_item(ACCESS_TOKEN_KEY, &token).unwrap();
        }

        let session = SessionManager::new(TokenStore::new(storage.clone()), Offline);
        session.restore_from_token();
        (storage, session)
    }

    fn live_token() -> String {
        mint_token("alice", Utc::now().timestamp() + 3600, None)
    }

    #[test]
    fn protected_without_token_redirects_once_to_login() {
        let (_, session) = session(None);
        let navigator = HistoryNavigator::new();

        let rendered =
            Guard::Protected.render(&session, &Landing::default(), &navigator, || "rentals");

        assert_eq!(rendered, None);
        assert_eq!(navigator.redirects(), vec!["/login".to_owned()]);
    }

    #[test]
    fn protected_with_live_token_renders() {
        let (_, session) = session(Some(live_token()));
        let navigator = HistoryNavigator::new();

        let rendered =
            Guard::Protected.render(&session, &Landing::default(), &navigator, || "rentals");

        assert_eq!(rendered, Some("rentals"));
        assert!(navigator.redirects().is_empty());
    }

    #[test]
    fn auth_only_with_live_token_redirects_home() {
        let (_, session) = session(Some(live_token()));
        let navigator = HistoryNavigator::new();

        let rendered =
            Guard::AuthOnly.render(&session, &Landing::default(), &navigator, || "login form");

        assert_eq!(rendered, None);
        assert_eq!(navigator.redirects(), vec!["/home".to_owned()]);
    }

    #[test]
    fn auth_only_without_token_renders() {
        let (_, session) = session(None);
        let navigator = HistoryNavigator::new();

        let rendered =
            Guard::AuthOnly.render(&session, &Landing::default(), &navigator, || "login form");

        assert_eq!(rendered, Some("login form"));
        assert!(navigator.redirects().is_empty());
    }

    #[test]
    fn guard_does_not_cache_verdict() {
        let (storage, session) = session(Some(live_token()));
        let landing = Landing::default();

        assert_eq!(Guard::Protected.evaluate(&session, &landing), Decision::Render);

        storage
            .set_item(
                ACCESS_TOKEN_KEY,
                &mint_token("alice", Utc::now().timestamp() - 1, None),
            )
            .unwrap();

        assert_eq!(
            Guard::Protected.evaluate(&session, &landing),
            Decision::Redirect("/login".into())
        );
        assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn custom_landing_routes() {
        let landing = Landing {
            home: "/crm".into(),
            login: "/sign-in".into(),
        };

        assert_eq!(
            Guard::Protected.decide(&SessionState::Anonymous, &landing),
            Decision::Redirect("/sign-in".into())
        );
    }
}
