#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Reqwest error: {0}")]
    HTTPClient(#[from] reqwest::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("No data directory available, set PORTAL_STORAGE_PATH")]
    NoDataDir,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", .0.user_message())]
    Auth(#[from] AuthError),
    #[error("Not logged in")]
    NotLoggedIn,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Raised when a token is not a well-formed three-part JWT with a JSON payload.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed token: expected 3 segments, found {0}")]
    Segments(usize),
    #[error("Malformed token: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Malformed token: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("No response from server: {0}")]
    NoResponse(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("Superseded by a newer login or logout")]
    Superseded,
    #[error("Failed to persist session: {0}")]
    Storage(String),
}

impl AuthError {
    /// Text shown inline on the login or register form.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(message) if !message.is_empty() => message.clone(),
            AuthError::InvalidCredentials(_) => "Invalid email or password".to_owned(),
            AuthError::NoResponse(_) => "Server unreachable, please try again later".to_owned(),
            AuthError::MalformedResponse(_) => "Something went wrong, please try again".to_owned(),
            AuthError::InvalidInput(message) => message.clone(),
            AuthError::Server { message, .. } if !message.is_empty() => message.clone(),
            AuthError::Server { .. } => "Something went wrong, please try again".to_owned(),
            AuthError::Superseded => "Login cancelled".to_owned(),
            AuthError::Storage(_) => "Could not save the session, please try again".to_owned(),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() || err.is_body() {
            AuthError::MalformedResponse(err.to_string())
        } else {
            AuthError::NoResponse(err.to_string())
        }
    }
}

impl From<DecodeError> for AuthError {
    fn from(err: DecodeError) -> Self {
        AuthError::MalformedResponse(err.to_string())
    }
}
