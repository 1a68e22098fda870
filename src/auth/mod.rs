//! Authentication against the Zijag Hub API

mod session;
mod types;

use log::{info, warn};
use reqwest::Method;

use crate::error::{Error, Result};
use crate::fetch::Transport;

pub use session::*;
pub use types::*;

/// Client for the login endpoint
pub struct AuthClient {
    transport: Transport,
}

impl AuthClient {
    /// Create a new AuthClient
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Log in with email and password, returning the session to pass to other clients
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("Email and password are required"));
        }

        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let response = self
            .transport
            .anonymous(Method::POST, "/auth/login")
            .json(&body)
            .execute::<LoginResponse>()
            .await
            .map_err(|err| {
                warn!("Login failed for {}: {}", body.email, err);
                err
            })?;

        info!("Logged in as {}", body.email);
        Ok(AuthSession::new(response.token, response.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AuthClient {
        let transport = Transport::new("http://localhost:1", reqwest::Client::new(), None, "test");
        AuthClient::new(transport)
    }

    #[test]
    fn test_login_requires_credentials() {
        tokio_test::block_on(async {
            let err = client().login("  ", "pw").await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));

            let err = client().login("ada@example.com", "").await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        });
    }
}
