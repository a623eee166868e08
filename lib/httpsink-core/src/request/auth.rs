use std::fmt;

use base64::Engine;
use http::HeaderValue;
use http::header::{AUTHORIZATION, HeaderName};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors that can occur while rendering an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum AuthorizationError {
    /// Bearer token contains invalid characters for HTTP headers.
    #[display("Bearer token contains invalid characters: {message}")]
    InvalidBearerToken {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// Basic authorization username contains invalid characters.
    #[display("Basic auth username contains invalid characters: {message}")]
    InvalidUsername {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// Basic authorization password contains invalid characters.
    #[display("Basic auth password contains invalid characters: {message}")]
    InvalidPassword {
        /// Description of the invalid characters or format issue.
        message: String,
    },
}

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
///
/// Client secrets, resource owner passwords and access tokens are held in this type
/// so they never show up in `Debug` output and are masked in `Display` output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `SecureString` and returns the inner `String`.
    ///
    /// The caller becomes responsible for the handling of the returned value.
    pub fn into_string(mut self) -> String {
        std::mem::take(&mut self.0)
    }

    /// Checks if the secure string equals the given string slice.
    pub fn equals_str(&self, other: &str) -> bool {
        self.0 == other
    }

    fn mask_sensitive(value: &str) -> String {
        let chars = value.chars().collect::<Vec<_>>();
        match (chars.get(..4), chars.len().checked_sub(4).and_then(|at| chars.get(at..))) {
            (Some(head), Some(tail)) if chars.len() > 8 => {
                let head = head.iter().collect::<String>();
                let tail = tail.iter().collect::<String>();
                format!("{head}...{tail}")
            }
            _ => "***".to_string(),
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl Serialize for SecureString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Value of an `Authorization` header sent by the sink.
///
/// `Basic` carries the OAuth2 client credentials when the token endpoint expects them
/// in a header, `Bearer` carries the access token used for record delivery.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Bearer token authorization (RFC 6750).
    Bearer(SecureString),

    /// HTTP Basic authorization (RFC 7617).
    Basic {
        /// The username, or the OAuth2 client id.
        username: String,
        /// The password, or the OAuth2 client secret.
        password: SecureString,
    },
}

impl Authorization {
    /// Converts the authorization into an HTTP header.
    ///
    /// # Errors
    ///
    /// Returns `AuthorizationError` if the credentials contain characters that cannot be
    /// carried in an HTTP header.
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue), AuthorizationError> {
        match self {
            Self::Bearer(token) => {
                let header_value = format!("Bearer {}", token.as_str());
                let value = HeaderValue::from_str(&header_value).map_err(|e| {
                    AuthorizationError::InvalidBearerToken {
                        message: e.to_string(),
                    }
                })?;
                Ok((AUTHORIZATION, value))
            }

            Self::Basic { username, password } => {
                if username.contains(':') {
                    return Err(AuthorizationError::InvalidUsername {
                        message: "Username cannot contain colon (:) character".to_string(),
                    });
                }

                let credentials = SecureString::new(format!("{username}:{}", password.as_str()));
                let encoded =
                    base64::engine::general_purpose::STANDARD.encode(credentials.as_str());

                let mut value = HeaderValue::from_str(&format!("Basic {encoded}")).map_err(|e| {
                    AuthorizationError::InvalidPassword {
                        message: e.to_string(),
                    }
                })?;
                value.set_sensitive(true);
                Ok((AUTHORIZATION, value))
            }
        }
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(token) => write!(f, "Bearer {token}"),
            Self::Basic { username, .. } => write!(f, "Basic (username: {username})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_bearer_header() {
        let auth = Authorization::Bearer("my-secret-token".into());
        let (header_name, header_value) = auth.to_header().expect("valid header");

        assert_eq!(header_name, AUTHORIZATION);
        assert_eq!(header_value, "Bearer my-secret-token");
    }

    #[test]
    fn should_render_basic_header() {
        let auth = Authorization::Basic {
            username: "user".to_string(),
            password: "pass".into(),
        };
        let (header_name, header_value) = auth.to_header().expect("valid header");

        assert_eq!(header_name, AUTHORIZATION);
        // base64("user:pass")
        assert_eq!(header_value, "Basic dXNlcjpwYXNz");
        assert!(header_value.is_sensitive());
    }

    #[test]
    fn should_reject_username_with_colon() {
        let auth = Authorization::Basic {
            username: "user:invalid".to_string(),
            password: "password".into(),
        };

        let error = auth.to_header().expect_err("colon is not allowed");
        assert!(matches!(error, AuthorizationError::InvalidUsername { .. }));
    }

    #[test]
    fn should_reject_bearer_with_control_characters() {
        let auth = Authorization::Bearer("\0invalid".into());

        let error = auth.to_header().expect_err("null byte is not allowed");
        assert!(matches!(error, AuthorizationError::InvalidBearerToken { .. }));
    }

    #[test]
    fn should_mask_secrets_in_display() {
        let auth = Authorization::Bearer("very-secret-token-12345".into());
        assert_eq!(auth.to_string(), "Bearer very...2345");

        let auth = Authorization::Basic {
            username: "client".to_string(),
            password: "password".into(),
        };
        assert_eq!(auth.to_string(), "Basic (username: client)");
    }

    #[test]
    fn should_redact_debug_output() {
        let auth = Authorization::Basic {
            username: "client".to_string(),
            password: "super-secret".into(),
        };
        let debug_str = format!("{auth:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("super-secret"));
    }

    #[test]
    fn should_mask_short_and_long_values() {
        assert_eq!(SecureString::mask_sensitive("short"), "***");
        assert_eq!(SecureString::mask_sensitive("12345678"), "***");
        assert_eq!(SecureString::mask_sensitive("123456789"), "1234...6789");
        assert_eq!(SecureString::mask_sensitive("ééééééééé"), "éééé...éééé");
    }

    #[test]
    fn should_convert_secure_string() {
        let secure: SecureString = "test".to_string().into();
        assert!(secure.equals_str("test"));

        let secure: SecureString = "test".into();
        assert_eq!(secure.as_str(), "test");
        assert_eq!(secure.into_string(), "test");
    }

    #[test]
    fn should_redact_secure_string_debug() {
        let secure = SecureString::new("secret-password".to_string());
        let debug_str = format!("{secure:?}");
        assert_eq!(debug_str, "SecureString { value: \"[REDACTED]\" }");
    }
}
