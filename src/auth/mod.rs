pub mod callback;
pub mod provider;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Session token claims shared with the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: impl Into<String>, name: Option<String>, max_age_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(max_age_hours as i64)).timestamp();

        Self {
            sub: user_id,
            email: email.into(),
            name,
            picture: None,
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Identity resolved from a valid session token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            image: claims.picture,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No session")]
    Missing,

    #[error("Session expired")]
    Expired,

    #[error("Invalid session token")]
    Invalid(String),

    #[error("Session secret not configured")]
    MissingSecret,

    #[error("Session token encoding failed: {0}")]
    Encode(String),
}

pub fn encode_session(claims: &Claims, secret: &str) -> Result<String, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
        .map_err(|e| SessionError::Encode(e.to_string()))
}

pub fn decode_session(token: &str, secret: &str) -> Result<Claims, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::MissingSecret);
    }
    if token.trim().is_empty() {
        return Err(SessionError::Missing);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::Invalid(e.to_string()),
        })
}
