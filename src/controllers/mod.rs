pub mod user;

use crate::core::error::AuthError;
use crate::types::user::{Credentials, Profile};

/// The backend's authentication endpoints, as seen by the session manager.
#[allow(async_fn_in_trait)]
pub trait Authenticator {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, AuthError>;

    async fn profile(&self, token: &str) -> Result<Profile, AuthError>;
}
