//! OAuth2 access token request form.
//!
//! The form is assembled with [`TokenRequestFormBuilder`], which enforces the
//! required fields of the selected grant type, and rendered as an
//! `application/x-www-form-urlencoded` body with [`TokenRequestForm::to_body_string`].

use std::fmt;

use tracing::{debug, warn};
use url::form_urlencoded;

use super::error::OAuth2Error;
use super::grant::{ClientCredentials, Grant, GrantType, ResourceOwner};
use crate::request::SecureString;

const SCOPE: &str = "scope";
const USERNAME: &str = "username";
const PASSWORD: &str = "password";

/// A validated OAuth2 access token request.
///
/// Use [`TokenRequestForm::builder`] to create instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequestForm {
    grant_type_property: String,
    grant: Grant,
    scope: Option<String>,
    client: Option<ClientCredentials>,
}

impl TokenRequestForm {
    /// Creates an empty builder.
    pub fn builder() -> TokenRequestFormBuilder {
        TokenRequestFormBuilder::default()
    }

    /// Wire name of the grant type.
    pub fn grant_type_property(&self) -> &str {
        &self.grant_type_property
    }

    /// The grant type.
    pub fn grant_type(&self) -> GrantType {
        self.grant.grant_type()
    }

    /// The grant, with its flow-specific fields.
    pub fn grant(&self) -> &Grant {
        &self.grant
    }

    /// The requested scope.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Client credentials sent as form fields.
    pub fn client_credentials(&self) -> Option<&ClientCredentials> {
        self.client.as_ref()
    }

    /// Renders the form as an `application/x-www-form-urlencoded` body.
    ///
    /// Fields are emitted in a fixed order: grant type, scope, client
    /// credentials, then resource owner credentials.
    ///
    /// ```rust
    /// use httpsink_core::TokenRequestForm;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let form = TokenRequestForm::builder()
    ///     .with_grant_type_property("grant_type")
    ///     .with_grant_type("client_credentials")
    ///     .with_scope("read write")
    ///     .build()?;
    ///
    /// assert_eq!(form.to_body_string(), "grant_type=client_credentials&scope=read+write");
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_body_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair(&self.grant_type_property, self.grant.as_str());

        if let Some(scope) = &self.scope {
            serializer.append_pair(SCOPE, scope);
        }

        if let Some(client) = &self.client {
            serializer
                .append_pair(&client.id_property, &client.id)
                .append_pair(&client.secret_property, client.secret.as_str());
        }

        if let Some(owner) = self.grant.resource_owner() {
            serializer
                .append_pair(USERNAME, &owner.username)
                .append_pair(PASSWORD, owner.password.as_str());
        }

        serializer.finish()
    }
}

/// Builder for [`TokenRequestForm`].
///
/// Setters never validate; all checks happen in [`TokenRequestFormBuilder::build`].
#[derive(Clone, Default)]
pub struct TokenRequestFormBuilder {
    grant_type_property: Option<String>,
    grant_type: Option<String>,
    scope: Option<String>,
    client_id_property: Option<String>,
    client_id: Option<String>,
    client_secret_property: Option<String>,
    client_secret: Option<SecureString>,
    username: Option<String>,
    password: Option<SecureString>,
}

impl TokenRequestFormBuilder {
    /// Sets the wire name of the grant type, usually `grant_type`.
    #[must_use]
    pub fn with_grant_type_property(mut self, grant_type_property: impl Into<String>) -> Self {
        self.grant_type_property = Some(grant_type_property.into());
        self
    }

    /// Sets the grant type, e.g. `client_credentials` or `password`.
    #[must_use]
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }

    /// Sets the requested scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the wire name of the client id.
    #[must_use]
    pub fn with_client_id_property(mut self, client_id_property: impl Into<String>) -> Self {
        self.client_id_property = Some(client_id_property.into());
        self
    }

    /// Sets the client id.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the wire name of the client secret.
    #[must_use]
    pub fn with_client_secret_property(
        mut self,
        client_secret_property: impl Into<String>,
    ) -> Self {
        self.client_secret_property = Some(client_secret_property.into());
        self
    }

    /// Sets the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, client_secret: impl Into<SecureString>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets the resource owner's username, used by the `password` grant.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the resource owner's password, used by the `password` grant.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<SecureString>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Validates the collected fields and builds the form.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth2Error::MissingField`] when:
    /// - the grant type property or the grant type is unset,
    /// - a `client_credentials` grant has only one of the client id/secret
    ///   property names, or only one of the client id/secret values,
    /// - a `password` grant has only one of username/password,
    /// - client id and secret are set but one of their property names is not.
    pub fn build(self) -> Result<TokenRequestForm, OAuth2Error> {
        let grant_type_property = self
            .grant_type_property
            .ok_or(OAuth2Error::missing("grant_type_property"))?;
        let grant_type = GrantType::from(
            self.grant_type
                .ok_or(OAuth2Error::missing("grant_type"))?,
        );
        let has_resource_owner = self.username.is_some() || self.password.is_some();

        if grant_type == GrantType::ClientCredentials {
            both_or_neither(
                (&self.client_id_property, "client_id_property"),
                (&self.client_secret_property, "client_secret_property"),
            )?;
            both_or_neither(
                (&self.client_id, "client_id"),
                (&self.client_secret, "client_secret"),
            )?;
        }

        let client = match (self.client_id, self.client_secret) {
            (Some(id), Some(secret)) => Some(ClientCredentials {
                id_property: self
                    .client_id_property
                    .ok_or(OAuth2Error::missing("client_id_property"))?,
                id,
                secret_property: self
                    .client_secret_property
                    .ok_or(OAuth2Error::missing("client_secret_property"))?,
                secret,
            }),
            (None, None) => None,
            (Some(_), None) | (None, Some(_)) => {
                warn!(%grant_type, "ignoring incomplete client credentials");
                None
            }
        };

        let grant = match grant_type {
            GrantType::ClientCredentials => Grant::ClientCredentials,
            GrantType::Password => {
                both_or_neither((&self.username, USERNAME), (&self.password, PASSWORD))?;
                let owner = self
                    .username
                    .zip(self.password)
                    .map(|(username, password)| ResourceOwner { username, password });
                Grant::Password(owner)
            }
            GrantType::Other(value) => Grant::Other(value),
        };

        if has_resource_owner && !matches!(grant, Grant::Password(_)) {
            warn!(
                grant_type = grant.as_str(),
                "ignoring resource owner credentials outside of a password grant"
            );
        }

        debug!(
            grant_type = grant.as_str(),
            has_scope = self.scope.is_some(),
            has_client_credentials = client.is_some(),
            "built OAuth2 token request form"
        );

        Ok(TokenRequestForm {
            grant_type_property,
            grant,
            scope: self.scope,
            client,
        })
    }
}

fn both_or_neither<A, B>(
    (first, first_name): (&Option<A>, &'static str),
    (second, second_name): (&Option<B>, &'static str),
) -> Result<(), OAuth2Error> {
    match (first.is_some(), second.is_some()) {
        (true, false) => Err(OAuth2Error::missing(second_name)),
        (false, true) => Err(OAuth2Error::missing(first_name)),
        _ => Ok(()),
    }
}

impl fmt::Debug for TokenRequestFormBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequestFormBuilder")
            .field("grant_type_property", &self.grant_type_property)
            .field("grant_type", &self.grant_type)
            .field("scope", &self.scope)
            .field("client_id_property", &self.client_id_property)
            .field("client_id", &self.client_id)
            .field("client_secret_property", &self.client_secret_property)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
