//! Token providers for authenticating requests.
//!
//! Acquiring a token (Keystone password or application-credential flows) is
//! outside this crate. Clients only ask a [`TokenProvider`] for the current
//! token before each request and send it as `X-Auth-Token`.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Header carrying the token on every request.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Source of the token attached to outgoing requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return the token to use for the next request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if no token can be supplied.
    async fn token(&self) -> Result<SecretString>;
}

/// Provider returning a fixed, externally obtained token.
#[derive(Debug)]
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    /// Wrap a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::Authentication("token must not be empty".to_string()));
        }
        Ok(Self {
            token: SecretString::from(token),
        })
    }

    /// Wrap a token that is already held as a secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty.
    pub fn from_secret(token: &SecretString) -> Result<Self> {
        Self::new(token.expose_secret())
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<SecretString> {
        Ok(SecretString::from(self.token.expose_secret().to_owned()))
    }
}
