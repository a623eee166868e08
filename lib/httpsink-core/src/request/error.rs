use super::AuthorizationError;
use super::oauth2::OAuth2Error;

/// Errors that can occur while preparing a request for the sink's HTTP client.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum RequestError {
    /// The OAuth2 settings or token request form are invalid.
    OAuth2(OAuth2Error),

    /// An `Authorization` header could not be rendered.
    Authorization(AuthorizationError),

    /// HTTP protocol error from the http crate.
    ///
    /// Occurs when the request line or headers cannot be assembled.
    HttpError(http::Error),

    /// A generated content type could not be parsed.
    InvalidContentType(mime::FromStrError),

    /// File name cannot be carried in a `Content-Disposition` header.
    #[display("Invalid file name '{file_name}': quotes and line breaks are not allowed")]
    #[from(skip)]
    InvalidFileName {
        /// The rejected file name.
        file_name: String,
    },
}
