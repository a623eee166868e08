//! # httpsink core
//!
//! Request building blocks of an HTTP sink connector that delivers records to an
//! HTTP endpoint.
//!
//! - **[`OAuth2Settings`]** - reads the sink's `oauth2.*` properties and prepares
//!   access token requests
//! - **[`TokenRequestForm`]** - validated `application/x-www-form-urlencoded`
//!   token request body for the `client_credentials` and `password` grants
//! - **[`RequestBody`]** - form, text and file upload bodies
//!
//! The crate never performs I/O: requests are returned as [`http::Request`] values
//! for the sink's HTTP client to send.
//!
//! ## Building a token request form
//!
//! ```rust
//! use httpsink_core::TokenRequestForm;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let form = TokenRequestForm::builder()
//!     .with_grant_type_property("grant_type")
//!     .with_grant_type("client_credentials")
//!     .with_scope("read write")
//!     .with_client_id_property("client_id")
//!     .with_client_id("abc")
//!     .with_client_secret_property("client_secret")
//!     .with_client_secret("s3cr3t")
//!     .build()?;
//!
//! assert_eq!(
//!     form.to_body_string(),
//!     "grant_type=client_credentials&scope=read+write&client_id=abc&client_secret=s3cr3t"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Missing fields are reported by `build`:
//!
//! ```rust
//! use httpsink_core::{OAuth2Error, TokenRequestForm};
//!
//! let result = TokenRequestForm::builder()
//!     .with_grant_type_property("grant_type")
//!     .with_grant_type("password")
//!     .with_username("alice")
//!     .build();
//!
//! assert_eq!(result, Err(OAuth2Error::MissingField { field: "password" }));
//! ```

mod request;

pub use self::request::oauth2::{
    ClientAuthorizationMode, ClientCredentials, Grant, GrantType, OAuth2Error, OAuth2Settings,
    OAuth2Token, ResourceOwner, TokenRequestForm, TokenRequestFormBuilder,
};
pub use self::request::{
    Authorization, AuthorizationError, RequestBody, RequestError, SecureString,
};
