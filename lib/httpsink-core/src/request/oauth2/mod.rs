//! OAuth2 access token requests.
//!
//! The sink authenticates against an OAuth2 token endpoint before delivering
//! records. This module builds the token request and reads the token from the
//! endpoint's response; sending the request is left to the sink's HTTP client.
//!
//! # Supported Flows
//!
//! - **Client Credentials**: client id and secret, sent either as an HTTP Basic
//!   header or as form fields
//! - **Password**: resource owner username and password
//! - any other grant type is forwarded verbatim
//!
//! # Example
//!
//! ```rust
//! use httpsink_core::OAuth2Settings;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = OAuth2Settings::from_properties([
//!     ("oauth2.access.token.url", "https://auth.example.com/token"),
//!     ("oauth2.client.id", "client-id"),
//!     ("oauth2.client.secret", "client-secret"),
//!     ("oauth2.client.scope", "events:write"),
//! ])?;
//!
//! let request = settings.token_request()?;
//! assert_eq!(request.body().as_slice(), b"grant_type=client_credentials&scope=events%3Awrite");
//!
//! // ... send `request`, then read the token from the response body
//! let token = settings.parse_token_response(r#"{"access_token": "abc", "expires_in": 3600}"#)?;
//! let (_name, _value) = token.authorization().to_header()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod form;
mod grant;
mod token;

pub use self::config::{ClientAuthorizationMode, OAuth2Settings};
pub use self::error::OAuth2Error;
pub use self::form::{TokenRequestForm, TokenRequestFormBuilder};
pub use self::grant::{ClientCredentials, Grant, GrantType, ResourceOwner};
pub use self::token::OAuth2Token;
