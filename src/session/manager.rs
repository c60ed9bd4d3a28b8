use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, MutexGuard, RwLock};
use tokio::sync::Notify;
use tracing::instrument;

use crate::controllers::Authenticator;
use crate::core::error::AuthError;
use crate::token::codec::{self, Claims};
use crate::token::store::TokenStore;
use crate::types::user::{Credentials, Identity, LoginResult, Profile, Role, SessionState};

pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Owns "who is logged in" for the lifetime of the process.
///
/// The persisted token is the source of truth; the in-memory identity is a
/// cache of what the token says plus whatever a profile fetch added. Guards
/// call [`SessionManager::reconcile`] before every decision so an expired or
/// corrupt token is noticed on the next navigation.
///
/// `login` and `logout` are intents ordered by a generation counter. A login
/// only commits if no newer login or logout started while it was waiting on
/// the network, and a newer intent wakes the older one so it can give up early.
pub struct SessionManager<A> {
    tokens: TokenStore,
    authenticator: A,
    identity: RwLock<Option<Identity>>,
    generation: Mutex<u64>,
    superseded: Notify,
    login_timeout: Duration,
}

impl<A> std::fmt::Debug for SessionManager<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("identity", &*self.identity.read())
            .field("login_timeout", &self.login_timeout)
            .finish()
    }
}

impl<A: Authenticator> SessionManager<A> {
    pub fn new(tokens: TokenStore, authenticator: A) -> Self {
        Self {
            tokens,
            authenticator,
            identity: RwLock::new(None),
            generation: Mutex::new(0),
            superseded: Notify::new(),
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
        }
    }

    pub fn with_login_timeout(mut self, login_timeout: Duration) -> Self {
        self.login_timeout = login_timeout;
        self
    }

    pub fn authenticator(&self) -> &A {
        &self.authenticator
    }

    /// Current identity without consulting the token.
    pub fn identity(&self) -> Option<Identity> {
        self.identity.read().clone()
    }

    pub fn state(&self) -> SessionState {
        match self.identity() {
            Some(identity) => SessionState::Authenticated(identity),
            None => SessionState::Anonymous,
        }
    }

    /// Boot-time restore. Decodes the stored token without looking at expiry.
    pub fn restore_from_token(&self) -> SessionState {
        let Some(token) = self.tokens.get() else {
            *self.identity.write() = None;
            return SessionState::Anonymous;
        };

        match codec::parse_claims_unverified(&token) {
            Ok(claims) => {
                let identity = Identity::new(claims.sub.clone(), role_from_claims(&claims));
                tracing::debug!(username = %identity.username, "Restored session");
                *self.identity.write() = Some(identity.clone());
                SessionState::Authenticated(identity)
            }
            Err(e) => {
                tracing::warn!("Discarding stored token, {}", e);
                self.drop_session();
                SessionState::Anonymous
            }
        }
    }

    /// Brings the identity in line with the stored token, logging out if the
    /// token is gone, unreadable or expired.
    pub fn reconcile(&self) -> SessionState {
        self.reconcile_at(Utc::now().timestamp_millis())
    }

    pub(crate) fn reconcile_at(&self, now_millis: i64) -> SessionState {
        let Some(token) = self.tokens.get() else {
            *self.identity.write() = None;
            return SessionState::Anonymous;
        };

        let claims = match codec::parse_claims_unverified(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("Discarding stored token, {}", e);
                self.drop_session();
                return SessionState::Anonymous;
            }
        };

        if codec::is_expired(&claims, now_millis) {
            tracing::info!(username = %claims.sub, "Session expired");
            self.drop_session();
            return SessionState::Anonymous;
        }

        let role = role_from_claims(&claims);
        let mut slot = self.identity.write();
        let identity = match slot.take() {
            Some(mut identity) if identity.username == claims.sub => {
                if role.is_some() {
                    identity.role = role;
                }
                identity
            }
            _ => Identity::new(claims.sub, role),
        };
        *slot = Some(identity.clone());

        SessionState::Authenticated(identity)
    }

    /// Reconciles, then reports whether a session survived. Not a pure read.
    pub fn is_authenticated(&self) -> bool {
        self.reconcile().is_authenticated()
    }

    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResult, AuthError> {
        let generation = self.begin_intent();

        let attempt =
            tokio::time::timeout(self.login_timeout, self.authenticator.login(credentials));

        let result = tokio::select! {
            biased;
            _ = self.superseded.notified() => Err(AuthError::Superseded),
            result = attempt => {
                match result {
                    Ok(result) => result,
                    Err(_) => Err(AuthError::NoResponse(format!(
                        "login timed out after {:?}",
                        self.login_timeout
                    ))),
                }
            }
        };

        let token = match result {
            Ok(token) => token,
            Err(e) => {
                log_failure(&e);
                return Err(e);
            }
        };

        let claims = match codec::parse_claims_unverified(&token) {
            Ok(claims) if codec::is_expired(&claims, Utc::now().timestamp_millis()) => {
                let e = AuthError::MalformedResponse(format!(
                    "server issued a token that expired at {}",
                    claims.exp
                ));
                log_failure(&e);
                return Err(e);
            }
            Ok(claims) => claims,
            Err(e) => {
                let e = AuthError::from(e);
                log_failure(&e);
                return Err(e);
            }
        };

        let current = self.generation.lock();
        if *current != generation {
            tracing::info!("Login superseded by a newer intent");
            return Err(AuthError::Superseded);
        }

        if !self.tokens.set(&token) {
            return Err(AuthError::Storage("access token was not saved".into()));
        }

        let identity = Identity::new(claims.sub.clone(), role_from_claims(&claims));
        *self.identity.write() = Some(identity.clone());
        drop(current);

        tracing::info!(username = %identity.username, "Logged in");

        Ok(LoginResult {
            username: identity.username,
            role: identity.role,
        })
    }

    pub fn logout(&self) {
        self.end_session(self.generation.lock());
        tracing::info!("Logged out");
    }

    /// Fills in the role from a profile fetch. Ignored unless the profile
    /// belongs to the current user.
    pub fn apply_profile(&self, profile: &Profile) -> bool {
        let mut slot = self.identity.write();

        match slot.as_mut() {
            Some(identity) if identity.username == profile.username => {
                if profile.role.is_some() {
                    identity.role = profile.role;
                }
                true
            }
            _ => false,
        }
    }

    /// Fetches the profile for the stored token and applies it. A token the
    /// server no longer accepts ends the session.
    #[instrument(skip_all)]
    pub async fn refresh_profile(&self) -> Result<Option<Identity>, AuthError> {
        if !self.is_authenticated() {
            return Ok(None);
        }

        let Some(token) = self.tokens.get() else {
            return Ok(None);
        };
        let generation = *self.generation.lock();

        let profile =
            match tokio::time::timeout(self.login_timeout, self.authenticator.profile(&token))
                .await
            {
                Ok(Ok(profile)) => profile,
                Ok(Err(AuthError::InvalidCredentials(message))) => {
                    let current = self.generation.lock();
                    if *current == generation && self.tokens.get().as_ref() == Some(&token) {
                        tracing::info!("Server rejected stored token, logging out");
                        self.end_session(current);
                    } else {
                        tracing::debug!("Ignoring rejection of a replaced session");
                    }
                    return Err(AuthError::InvalidCredentials(message));
                }
                Ok(Err(e)) => {
                    log_failure(&e);
                    return Err(e);
                }
                Err(_) => {
                    return Err(AuthError::NoResponse(format!(
                        "profile fetch timed out after {:?}",
                        self.login_timeout
                    )));
                }
            };

        if *self.generation.lock() != generation {
            tracing::debug!("Session changed during profile fetch");
        } else if !self.apply_profile(&profile) {
            tracing::warn!("Profile does not match the current session");
        }

        Ok(self.identity())
    }

    fn begin_intent(&self) -> u64 {
        let mut current = self.generation.lock();
        *current += 1;
        let generation = *current;
        drop(current);

        self.superseded.notify_waiters();
        generation
    }

    /// Bumps the generation, forgets the session and wakes pending logins.
    fn end_session(&self, mut current: MutexGuard<'_, u64>) {
        *current += 1;
        self.drop_session();
        drop(current);

        self.superseded.notify_waiters();
    }

    fn drop_session(&self) {
        self.tokens.clear();
        *self.identity.write() = None;
    }
}

fn role_from_claims(claims: &Claims) -> Option<Role> {
    let role = claims.role.as_deref()?;

    match role.parse() {
        Ok(role) => Some(role),
        Err(e) => {
            tracing::warn!("Ignoring role claim, {}", e);
            None
        }
    }
}

fn log_failure(e: &AuthError) {
    match e {
        AuthError::MalformedResponse(_) | AuthError::Server { .. } => {
            tracing::error!("Login failed, {:?}", e)
        }
        _ => tracing::warn!("Login failed, {}", e),
    }
}
