//! OAuth2-specific error types.

/// Errors that can occur while preparing an OAuth2 token request or reading its response.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum OAuth2Error {
    /// A field required by the selected grant type is absent.
    #[display("OAuth2 token request is missing the required field '{field}'")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Token endpoint URL is invalid.
    #[display("Invalid token endpoint URL '{url}': {reason}")]
    InvalidTokenEndpoint {
        /// The invalid URL that was provided.
        url: String,
        /// Description of why the URL is invalid.
        reason: String,
    },

    /// Invalid OAuth2 response from the token endpoint.
    #[display("Invalid OAuth2 token response: {reason}")]
    InvalidTokenResponse {
        /// Description of what was invalid.
        reason: String,
    },

    /// Configuration error.
    #[display("OAuth2 configuration error: {reason}")]
    ConfigurationError {
        /// Description of the configuration issue.
        reason: String,
    },
}

impl OAuth2Error {
    pub(crate) fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
