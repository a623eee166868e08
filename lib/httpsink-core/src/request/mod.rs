mod auth;
mod body;
mod error;
pub mod oauth2;

pub use self::auth::{Authorization, AuthorizationError, SecureString};
pub use self::body::RequestBody;
pub use self::error::RequestError;
