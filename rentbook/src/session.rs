//! Bearer-token sessions.
//!
//! Tokens are self-contained HS256 JWTs: nothing is stored server-side, and a
//! token is valid for as long as its signature checks out (and, when an expiry
//! is configured, until `exp`).

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum SessionError {
    /// Missing, malformed, tampered, expired, or signed with another key.
    Unauthenticated,
    /// The configured lifetime pushes `exp` past what a timestamp can hold.
    ExpiryOutOfRange(u64),
    Encode(jsonwebtoken::errors::Error),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Unauthenticated => write!(f, "Invalid or expired token"),
            SessionError::ExpiryOutOfRange(h) => write!(f, "Token expiry of {h} hours is out of range"),
            SessionError::Encode(e) => write!(f, "Token encoding error: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Issues and checks the bearer tokens that identify a user.
pub trait TokenCodec: Send + Sync {
    fn issue(&self, user_id: i32) -> Result<String, SessionError>;

    /// Return the user id the token was issued for.
    fn verify(&self, token: &str) -> Result<i32, SessionError>;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User id as a decimal string.
    pub sub: String,
    /// Unix timestamp of issue
    pub iat: u64,
    /// Unix timestamp expiry; absent when tokens do not expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

pub fn encode_jwt(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

/// Decode and check a token. `exp` is only required when `require_exp` is set,
/// but is always enforced when present.
pub fn decode_jwt(
    token: &str,
    secret: &str,
    require_exp: bool,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    if !require_exp {
        validation.required_spec_claims.clear();
    }
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;
    Ok(data.claims)
}

/// HMAC-SHA256 JWT codec keyed by a shared secret.
pub struct JwtCodec {
    secret: String,
    expiry_hours: Option<u64>,
}

impl JwtCodec {
    pub fn new(secret: impl Into<String>, expiry_hours: Option<u64>) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours,
        }
    }
}

impl TokenCodec for JwtCodec {
    fn issue(&self, user_id: i32) -> Result<String, SessionError> {
        let now = Utc::now().timestamp() as u64;
        let exp = match self.expiry_hours {
            Some(h) => Some(
                h.checked_mul(3600)
                    .and_then(|secs| now.checked_add(secs))
                    .ok_or(SessionError::ExpiryOutOfRange(h))?,
            ),
            None => None,
        };
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp,
        };
        encode_jwt(&claims, &self.secret).map_err(SessionError::Encode)
    }

    fn verify(&self, token: &str) -> Result<i32, SessionError> {
        let claims = decode_jwt(token, &self.secret, self.expiry_hours.is_some()).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            SessionError::Unauthenticated
        })?;
        claims
            .sub
            .parse()
            .map_err(|_| SessionError::Unauthenticated)
    }
}
