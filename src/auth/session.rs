//! Session management for authentication

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;

use crate::auth::Role;
use crate::error::Result;

/// Claims read from the credential. The signature is not verified client-side.
#[derive(Debug, Clone, Deserialize)]
struct Claims {
    exp: Option<i64>,
    role: Option<String>,
}

fn decode_claims(token: &str) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// An authenticated session, passed explicitly to every client that talks to the API.
///
/// The session lives from login until logout and is never read from ambient storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    token: String,
    role: Option<Role>,
    expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    /// Create a session from a login response.
    ///
    /// Tokens that are not JWTs are accepted and never expire client-side.
    pub fn new(token: impl Into<String>, role: Option<Role>) -> Self {
        let token = token.into();
        let claims = decode_claims(&token).ok();
        let expires_at = claims
            .as_ref()
            .and_then(|c| c.exp)
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single());
        let role = role.or_else(|| claims.and_then(|c| c.role).map(Role::from));

        Self {
            token,
            role,
            expires_at,
        }
    }

    /// Create a session from a JWT, failing if the token cannot be decoded
    pub fn from_jwt(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        decode_claims(&token)?;
        Ok(Self::new(token, None))
    }

    /// The bearer credential
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The role granted at login
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// When the credential expires, if it carries an `exp` claim
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires_at| Utc::now() >= expires_at)
            .unwrap_or(false)
    }
}
