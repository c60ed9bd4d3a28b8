use serde::Deserialize;

use crate::core::error::AuthError;
use crate::types::user::{Profile, Role};

#[derive(Deserialize)]
struct TokenObject {
    #[serde(alias = "accessToken", alias = "access_token")]
    token: Option<String>,
}

/// The login endpoint answers with the bare token, a JSON string, or an object wrapping it.
pub(crate) fn extract_token(body: &str) -> Result<String, AuthError> {
    let body = body.trim();

    let token = match body.chars().next() {
        None => return Err(AuthError::MalformedResponse("empty body".into())),
        Some('"') => serde_json::from_str::<String>(body)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?,
        Some('{') => serde_json::from_str::<TokenObject>(body)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?
            .token
            .unwrap_or_default(),
        Some(_) => body.to_owned(),
    };

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedResponse("no token in response".into()));
    }

    Ok(token.to_owned())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: Option<String>,
}

/// Pulls `{message}` out of an error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
        }) => message,
        Ok(_) => String::new(),
        Err(_) => body.trim().chars().take(200).collect(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileBody {
    username: Option<String>,
    email: Option<String>,
    role: Option<String>,
}

impl TryFrom<ProfileBody> for Profile {
    type Error = AuthError;

    fn try_from(body: ProfileBody) -> Result<Self, Self::Error> {
        let username = body
            .username
            .or(body.email)
            .ok_or_else(|| AuthError::MalformedResponse("profile has no username".into()))?;

        let role = match body.role {
            Some(role) => match role.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!("Ignoring profile role, {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(Profile { username, role })
    }
}
