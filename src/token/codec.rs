//! Reads JWT claims for display and routing.
//!
//! Nothing in here verifies a signature. Tokens come straight from the backend
//! and every authorization decision that matters is enforced there; the client
//! only needs to know who the token names and when it stops being useful.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};

use crate::core::error::DecodeError;

/// RFC 7515 base64url. Some issuers pad their segments, so padding is tolerated.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    /// Seconds since the epoch.
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Decodes the payload of a compact JWT without checking its signature.
///
/// The header only has to be a JSON object. Its `alg` is not inspected, so
/// tokens signed with any algorithm (or none) decode the same way.
pub fn parse_claims_unverified(token: &str) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    let [header, payload, signature] = segments[..] else {
        return Err(DecodeError::Segments(segments.len()));
    };

    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(
        &BASE64URL.decode(header)?,
    )?;
    BASE64URL.decode(signature)?;

    Ok(serde_json::from_slice(&BASE64URL.decode(payload)?)?)
}

/// True once the wall clock has reached `exp`.
pub fn is_expired(claims: &Claims, now_millis: i64) -> bool {
    claims.exp.saturating_mul(1000) <= now_millis
}

#[cfg(test)]
pub(crate) fn mint_token(sub: &str, exp: i64, role: Option<&str>) -> String {
    let claims = Claims {
        sub: sub.to_owned(),
        exp,
        role: role.map(str::to_owned),
        iat: None,
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"server-side-secret"),
    )
    .unwrap()
}
