//! OAuth2 access tokens read from a token endpoint response.

use std::fmt;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::OAuth2Error;
use crate::request::{Authorization, SecureString};

const EXPIRES_IN: &str = "expires_in";
const REFRESH_TOKEN: &str = "refresh_token";

/// An OAuth2 access token with expiration tracking.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct OAuth2Token {
    access_token: String,
    #[zeroize(skip)]
    expires_at: Option<Instant>,
    refresh_token: Option<String>,
}

impl OAuth2Token {
    /// Creates a new OAuth2 token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
            refresh_token: None,
        }
    }

    /// Creates a new OAuth2 token with an expiration time.
    ///
    /// A lifetime too large to be represented is treated as no expiry.
    pub fn with_expiry(access_token: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Instant::now().checked_add(expires_in),
            refresh_token: None,
        }
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Reads a token from a token endpoint's JSON response.
    ///
    /// The access token is looked up under `token_property`, which is `access_token`
    /// for RFC 6749 compliant servers. `expires_in` and `refresh_token` are honoured
    /// when present.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth2Error::InvalidTokenResponse`] if the body is not a JSON object,
    /// or if the token property is missing, empty or not a string.
    pub fn from_response(body: &str, token_property: &str) -> Result<Self, OAuth2Error> {
        let value = serde_json::from_str::<Value>(body).map_err(|e| {
            OAuth2Error::InvalidTokenResponse {
                reason: format!("not a JSON document: {e}"),
            }
        })?;
        let Value::Object(fields) = value else {
            return Err(OAuth2Error::InvalidTokenResponse {
                reason: "expected a JSON object".to_string(),
            });
        };

        let access_token = match fields.get(token_property) {
            Some(Value::String(token)) if !token.is_empty() => token.clone(),
            Some(_) => {
                return Err(OAuth2Error::InvalidTokenResponse {
                    reason: format!("'{token_property}' is not a non-empty string"),
                });
            }
            None => {
                return Err(OAuth2Error::InvalidTokenResponse {
                    reason: format!("missing '{token_property}'"),
                });
            }
        };

        let expires_in = fields.get(EXPIRES_IN).and_then(Value::as_u64);
        let mut token = match expires_in {
            Some(seconds) => Self::with_expiry(access_token, Duration::from_secs(seconds)),
            None => Self::new(access_token),
        };
        if let Some(refresh_token) = fields.get(REFRESH_TOKEN).and_then(Value::as_str) {
            token = token.with_refresh_token(refresh_token);
        }

        debug!(
            ?expires_in,
            has_refresh_token = token.refresh_token.is_some(),
            "read OAuth2 access token"
        );
        Ok(token)
    }

    /// Returns the access token value.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the refresh token if available.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Checks if the token is expired.
    ///
    /// Returns `false` if the token has no expiration time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }

    /// Checks if the token will expire within the given threshold.
    pub fn should_refresh(&self, threshold: Duration) -> bool {
        self.expires_at.is_some_and(|exp| {
            Instant::now()
                .checked_add(threshold)
                .is_none_or(|deadline| deadline >= exp)
        })
    }

    /// Returns the time until expiration, if known.
    pub fn time_until_expiry(&self) -> Option<Duration> {
        self.expires_at
            .and_then(|exp| exp.checked_duration_since(Instant::now()))
            .filter(|remaining| !remaining.is_zero())
    }

    /// Returns the `Authorization: Bearer` value used when delivering records.
    pub fn authorization(&self) -> Authorization {
        Authorization::Bearer(SecureString::new(self.access_token.clone()))
    }
}

impl fmt::Debug for OAuth2Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Token")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
