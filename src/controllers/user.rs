use regex::Regex;
use reqwest::StatusCode;
use tracing::instrument;

use crate::controllers::Authenticator;
use crate::core::error::{AuthError, ConfigError};
use crate::types::response::{self, ProfileBody};
use crate::types::user::{Credentials, Profile, Registration};

#[derive(Clone)]
pub struct UserController {
    client: reqwest::Client,
    base_url: String,
    email_pattern: Regex,
    username_pattern: Regex,
    phone_pattern: Regex,
}

impl std::fmt::Debug for UserController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserController")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl UserController {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(concat!("warehouse-portal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            email_pattern: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")?,
            username_pattern: Regex::new(r"^[a-zA-Z0-9_-]{3,20}$")?,
            phone_pattern: Regex::new(r"^\+?[0-9 ]{7,15}$")?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn validate_credentials(&self, credentials: &Credentials) -> Result<(), AuthError> {
        if !self.email_pattern.is_match(credentials.email.trim()) {
            return Err(AuthError::InvalidInput("Enter a valid email address".into()));
        }

        if credentials.password.is_empty() {
            return Err(AuthError::InvalidInput("Password is required".into()));
        }

        Ok(())
    }

    pub fn validate_registration(&self, registration: &Registration) -> Result<(), AuthError> {
        if !self.email_pattern.is_match(registration.email.trim()) {
            return Err(AuthError::InvalidInput("Enter a valid email address".into()));
        }

        if registration.password.len() < 8 {
            return Err(AuthError::InvalidInput(
                "Password must be at least 8 characters".into(),
            ));
        }

        if let Some(username) = &registration.username
            && !self.username_pattern.is_match(username)
        {
            return Err(AuthError::InvalidInput(
                "Username must be 3-20 letters, digits, '_' or '-'".into(),
            ));
        }

        if let Some(phone) = &registration.phone
            && !self.phone_pattern.is_match(phone)
        {
            return Err(AuthError::InvalidInput("Enter a valid phone number".into()));
        }

        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        self.validate_credentials(credentials)?;

        let credentials = Credentials::new(credentials.email.trim(), credentials.password.clone());

        let resp = self
            .client
            .post(self.url("/users/login"))
            .json(&credentials)
            .send()
            .await?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        if !status.is_success() {
            return Err(rejection(status, &body));
        }

        tracing::debug!("Login accepted");
        response::extract_token(&body)
    }

    #[instrument(skip_all)]
    pub async fn register(&self, registration: &Registration) -> Result<(), AuthError> {
        self.validate_registration(registration)?;

        let resp = self
            .client
            .post(self.url("/users/register"))
            .json(registration)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();

        Err(AuthError::Server {
            status: status.as_u16(),
            message: response::error_message(&body),
        })
    }

    #[instrument(skip_all)]
    pub async fn profile(&self, token: &str) -> Result<Profile, AuthError> {
        let resp = self
            .client
            .get(self.url("/users/profile"))
            .bearer_auth(token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(rejection(status, &body));
        }

        let body = resp.json::<ProfileBody>().await?;

        Profile::try_from(body)
    }
}

fn rejection(status: StatusCode, body: &str) -> AuthError {
    let message = response::error_message(body);

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AuthError::InvalidCredentials(message)
        }
        _ => AuthError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

impl Authenticator for UserController {
    async fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        UserController::login(self, credentials).await
    }

    async fn profile(&self, token: &str) -> Result<Profile, AuthError> {
        UserController::profile(self, token).await
    }
}
