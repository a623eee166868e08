//! OAuth2 grant types and the credentials each of them carries.

use std::fmt;

use crate::request::SecureString;

const CLIENT_CREDENTIALS: &str = "client_credentials";
const PASSWORD: &str = "password";

/// OAuth2 grant type, as sent on the wire.
///
/// Only `client_credentials` and `password` have dedicated validation rules,
/// any other value is forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GrantType {
    /// Client Credentials grant (machine-to-machine).
    ClientCredentials,
    /// Resource Owner Password Credentials grant.
    Password,
    /// Any other grant type, sent verbatim.
    Other(String),
}

impl GrantType {
    /// Returns the wire value of this grant type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClientCredentials => CLIENT_CREDENTIALS,
            Self::Password => PASSWORD,
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for GrantType {
    fn from(value: &str) -> Self {
        match value {
            CLIENT_CREDENTIALS => Self::ClientCredentials,
            PASSWORD => Self::Password,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for GrantType {
    fn from(value: String) -> Self {
        match value.as_str() {
            CLIENT_CREDENTIALS => Self::ClientCredentials,
            PASSWORD => Self::Password,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated grant, carrying only the fields its flow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// `client_credentials`; the client credentials themselves live on the form
    /// since every grant may carry them.
    ClientCredentials,
    /// `password`, with the resource owner when one was supplied.
    Password(Option<ResourceOwner>),
    /// Any other grant type.
    Other(String),
}

impl Grant {
    /// Returns the grant type of this grant.
    pub fn grant_type(&self) -> GrantType {
        match self {
            Self::ClientCredentials => GrantType::ClientCredentials,
            Self::Password(_) => GrantType::Password,
            Self::Other(value) => GrantType::Other(value.clone()),
        }
    }

    /// Returns the wire value of the grant type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClientCredentials => CLIENT_CREDENTIALS,
            Self::Password(_) => PASSWORD,
            Self::Other(value) => value,
        }
    }

    /// Returns the resource owner of a password grant.
    pub fn resource_owner(&self) -> Option<&ResourceOwner> {
        match self {
            Self::Password(owner) => owner.as_ref(),
            Self::ClientCredentials | Self::Other(_) => None,
        }
    }
}

/// Client id and secret, together with the wire names the authorization server expects.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub(crate) id_property: String,
    pub(crate) id: String,
    pub(crate) secret_property: String,
    pub(crate) secret: SecureString,
}

impl ClientCredentials {
    /// Wire name of the client id.
    pub fn id_property(&self) -> &str {
        &self.id_property
    }

    /// The client id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wire name of the client secret.
    pub fn secret_property(&self) -> &str {
        &self.secret_property
    }

    /// The client secret.
    pub fn secret(&self) -> &SecureString {
        &self.secret
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("id_property", &self.id_property)
            .field("id", &self.id)
            .field("secret_property", &self.secret_property)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Resource owner credentials of a password grant.
///
/// Sent as the fixed `username` and `password` form fields.
#[derive(Clone, PartialEq, Eq)]
pub struct ResourceOwner {
    pub(crate) username: String,
    pub(crate) password: SecureString,
}

impl ResourceOwner {
    /// The resource owner's username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The resource owner's password.
    pub fn password(&self) -> &SecureString {
        &self.password
    }
}

impl fmt::Debug for ResourceOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceOwner")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
