//! OAuth2 settings read from the sink's connector properties.

use std::fmt;

use headers::HeaderMapExt;
use http::{Method, Request};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use super::error::OAuth2Error;
use super::form::TokenRequestForm;
use super::token::OAuth2Token;
use crate::request::{Authorization, RequestBody, RequestError, SecureString};

const TOKEN_URL: &str = "oauth2.access.token.url";

/// Where the client id and secret are sent to the token endpoint.
///
/// Read case-insensitively from `HEADER` or `URL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ClientAuthorizationMode {
    /// HTTP Basic `Authorization` header.
    #[default]
    Header,
    /// Form fields of the request body.
    Url,
}

impl TryFrom<String> for ClientAuthorizationMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("header") {
            Ok(Self::Header)
        } else if value.eq_ignore_ascii_case("url") {
            Ok(Self::Url)
        } else {
            Err(format!(
                "unknown client authorization mode `{value}`, expected `HEADER` or `URL`"
            ))
        }
    }
}

/// OAuth2 settings of the HTTP sink.
///
/// Built from the flat connector properties with [`OAuth2Settings::from_properties`].
#[derive(Clone, Deserialize)]
pub struct OAuth2Settings {
    #[serde(rename = "oauth2.access.token.url")]
    token_url: Url,

    #[serde(rename = "oauth2.client.id")]
    client_id: Option<String>,

    #[serde(rename = "oauth2.client.secret")]
    client_secret: Option<SecureString>,

    #[serde(rename = "oauth2.client.authorization.mode", default)]
    authorization_mode: ClientAuthorizationMode,

    #[serde(rename = "oauth2.client.scope")]
    scope: Option<String>,

    #[serde(
        rename = "oauth2.grant_type.property",
        default = "default_grant_type_property"
    )]
    grant_type_property: String,

    #[serde(rename = "oauth2.grant_type", default = "default_grant_type")]
    grant_type: String,

    #[serde(
        rename = "oauth2.client.id.property",
        default = "default_client_id_property"
    )]
    client_id_property: String,

    #[serde(
        rename = "oauth2.client.secret.property",
        default = "default_client_secret_property"
    )]
    client_secret_property: String,

    #[serde(rename = "oauth2.username")]
    username: Option<String>,

    #[serde(rename = "oauth2.password")]
    password: Option<SecureString>,

    #[serde(
        rename = "oauth2.response.token.property",
        default = "default_response_token_property"
    )]
    response_token_property: String,
}

fn default_grant_type_property() -> String {
    "grant_type".to_string()
}

fn default_grant_type() -> String {
    "client_credentials".to_string()
}

fn default_client_id_property() -> String {
    "client_id".to_string()
}

fn default_client_secret_property() -> String {
    "client_secret".to_string()
}

fn default_response_token_property() -> String {
    "access_token".to_string()
}

impl OAuth2Settings {
    /// Reads the settings from connector properties.
    ///
    /// Keys outside of the `oauth2.*` namespace are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth2Error::InvalidTokenEndpoint`] if the token URL cannot be parsed
    /// or its scheme is not `http`/`https`, and [`OAuth2Error::ConfigurationError`]
    /// for any other malformed or missing property.
    pub fn from_properties<K, V>(
        properties: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, OAuth2Error>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let properties = properties
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .filter(|(key, _)| key.starts_with("oauth2."))
            .map(|(key, value)| (key, Value::String(value)))
            .collect::<Map<_, _>>();

        if let Some(raw_url) = properties.get(TOKEN_URL).and_then(Value::as_str) {
            Url::parse(raw_url).map_err(|e| OAuth2Error::InvalidTokenEndpoint {
                url: raw_url.to_string(),
                reason: e.to_string(),
            })?;
        }

        let settings = serde_json::from_value::<Self>(Value::Object(properties)).map_err(|e| {
            OAuth2Error::ConfigurationError {
                reason: e.to_string(),
            }
        })?;

        if !matches!(settings.token_url.scheme(), "http" | "https") {
            return Err(OAuth2Error::InvalidTokenEndpoint {
                url: settings.token_url.to_string(),
                reason: "the scheme must be http or https".to_string(),
            });
        }

        Ok(settings)
    }

    /// The token endpoint URL.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Where the client credentials are sent.
    pub fn authorization_mode(&self) -> ClientAuthorizationMode {
        self.authorization_mode
    }

    /// Property of the token response holding the access token.
    pub fn response_token_property(&self) -> &str {
        &self.response_token_property
    }

    /// Builds the token request form.
    ///
    /// In [`ClientAuthorizationMode::Url`] the client credentials are part of the form,
    /// in [`ClientAuthorizationMode::Header`] they are left for [`Self::client_authorization`].
    ///
    /// # Errors
    ///
    /// Returns [`OAuth2Error::MissingField`] when the configured grant type is missing
    /// one of its required fields.
    pub fn form(&self) -> Result<TokenRequestForm, OAuth2Error> {
        let mut builder = TokenRequestForm::builder()
            .with_grant_type_property(&self.grant_type_property)
            .with_grant_type(&self.grant_type);

        if let Some(scope) = &self.scope {
            builder = builder.with_scope(scope);
        }
        if self.authorization_mode == ClientAuthorizationMode::Url {
            builder = builder
                .with_client_id_property(&self.client_id_property)
                .with_client_secret_property(&self.client_secret_property);
            if let Some(client_id) = &self.client_id {
                builder = builder.with_client_id(client_id);
            }
            if let Some(client_secret) = &self.client_secret {
                builder = builder.with_client_secret(client_secret.clone());
            }
        }
        if let Some(username) = &self.username {
            builder = builder.with_username(username);
        }
        if let Some(password) = &self.password {
            builder = builder.with_password(password.clone());
        }

        builder.build()
    }

    /// Returns the Basic authorization carrying the client credentials in
    /// [`ClientAuthorizationMode::Header`].
    ///
    /// Returns `None` in [`ClientAuthorizationMode::Url`] or when no client
    /// credentials are configured.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth2Error::MissingField`] when only one of the client id and
    /// secret is configured in [`ClientAuthorizationMode::Header`].
    pub fn client_authorization(&self) -> Result<Option<Authorization>, OAuth2Error> {
        if self.authorization_mode != ClientAuthorizationMode::Header {
            return Ok(None);
        }
        match (&self.client_id, &self.client_secret) {
            (Some(username), Some(password)) => Ok(Some(Authorization::Basic {
                username: username.clone(),
                password: password.clone(),
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(OAuth2Error::missing("client_secret")),
            (None, Some(_)) => Err(OAuth2Error::missing("client_id")),
        }
    }

    /// Builds the complete access token request.
    ///
    /// The request is a `POST` to the token endpoint with a form-urlencoded body;
    /// sending it is left to the caller's HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid, if the client credentials cannot be
    /// rendered as a header, or if the request cannot be assembled.
    pub fn token_request(&self) -> Result<Request<Vec<u8>>, RequestError> {
        let form = self.form()?;
        let client_authorization = self.client_authorization()?;
        let (content_type, data) = RequestBody::form(&form).into_parts();

        let mut request = Request::builder()
            .method(Method::POST)
            .uri(self.token_url.as_str())
            .body(data)?;

        request.headers_mut().typed_insert(content_type);
        if let Some(authorization) = client_authorization {
            let (name, value) = authorization.to_header()?;
            request.headers_mut().insert(name, value);
        }

        debug!(
            token_url = %self.token_url,
            grant_type = %form.grant_type(),
            mode = ?self.authorization_mode,
            "prepared OAuth2 access token request"
        );
        Ok(request)
    }

    /// Reads the access token from the token endpoint's response body.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth2Error::InvalidTokenResponse`] when the body does not carry a token
    /// under the configured response token property.
    pub fn parse_token_response(&self, body: &str) -> Result<OAuth2Token, OAuth2Error> {
        OAuth2Token::from_response(body, &self.response_token_property)
    }
}

impl fmt::Debug for OAuth2Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Settings")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("authorization_mode", &self.authorization_mode)
            .field("scope", &self.scope)
            .field("grant_type_property", &self.grant_type_property)
            .field("grant_type", &self.grant_type)
            .field("client_id_property", &self.client_id_property)
            .field("client_secret_property", &self.client_secret_property)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("response_token_property", &self.response_token_property)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use http::header::{AUTHORIZATION, CONTENT_TYPE};
    use rstest::rstest;

    use super::*;

    const ENDPOINT: &str = "https://auth.example.com/oauth2/token";

    fn settings(extra: &[(&str, &str)]) -> Result<OAuth2Settings, OAuth2Error> {
        let mut properties = vec![("oauth2.access.token.url", ENDPOINT)];
        properties.extend_from_slice(extra);
        OAuth2Settings::from_properties(properties)
    }

    #[test]
    fn should_apply_defaults() {
        let settings = settings(&[]).expect("Should read settings");

        assert_eq!(settings.token_url().as_str(), ENDPOINT);
        assert_eq!(settings.authorization_mode(), ClientAuthorizationMode::Header);
        assert_eq!(settings.response_token_property(), "access_token");
        assert_eq!(settings.grant_type_property, "grant_type");
        assert_eq!(settings.grant_type, "client_credentials");
        assert_eq!(settings.client_id_property, "client_id");
        assert_eq!(settings.client_secret_property, "client_secret");
    }

    #[test]
    fn should_ignore_unrelated_properties() {
        let settings = settings(&[
            ("http.url", "https://sink.example.com/"),
            ("http.authorization.type", "oauth2"),
            ("batching.enabled", "true"),
        ]);

        assert!(settings.is_ok());
    }

    #[rstest]
    #[case::upper("URL", ClientAuthorizationMode::Url)]
    #[case::lower("url", ClientAuthorizationMode::Url)]
    #[case::header_upper("HEADER", ClientAuthorizationMode::Header)]
    #[case::header_lower("header", ClientAuthorizationMode::Header)]
    #[case::header_capitalized("Header", ClientAuthorizationMode::Header)]
    #[case::url_capitalized("Url", ClientAuthorizationMode::Url)]
    #[case::mixed("hEaDeR", ClientAuthorizationMode::Header)]
    fn should_read_authorization_mode(
        #[case] raw: &str,
        #[case] expected: ClientAuthorizationMode,
    ) {
        let settings = settings(&[("oauth2.client.authorization.mode", raw)])
            .expect("Should read settings");

        assert_eq!(settings.authorization_mode(), expected);
    }

    #[test]
    fn should_reject_unknown_authorization_mode() {
        let error = settings(&[("oauth2.client.authorization.mode", "BODY")])
            .expect_err("Should fail");

        match error {
            OAuth2Error::ConfigurationError { reason } => {
                assert!(reason.contains("unknown client authorization mode `BODY`"), "{reason}");
            }
            other => panic!("Expected ConfigurationError, got {other:?}"),
        }
    }

    #[test]
    fn should_require_token_url() {
        let error = OAuth2Settings::from_properties([("oauth2.client.id", "abc")])
            .expect_err("Should fail");

        match error {
            OAuth2Error::ConfigurationError { reason } => {
                assert!(reason.contains("oauth2.access.token.url"), "{reason}");
            }
            other => panic!("Expected ConfigurationError, got {other:?}"),
        }
    }

    #[rstest]
    #[case::relative("not-a-url")]
    #[case::ftp("ftp://auth.example.com/token")]
    fn should_reject_invalid_token_url(#[case] url: &str) {
        let error = OAuth2Settings::from_properties([("oauth2.access.token.url", url)])
            .expect_err("Should fail");

        assert!(
            matches!(error, OAuth2Error::InvalidTokenEndpoint { .. }),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn should_keep_client_credentials_out_of_form_in_header_mode() {
        let settings = settings(&[
            ("oauth2.client.id", "abc"),
            ("oauth2.client.secret", "s3cr3t"),
            ("oauth2.client.scope", "read write"),
        ])
        .expect("Should read settings");

        let form = settings.form().expect("Should build form");
        assert_eq!(
            form.to_body_string(),
            "grant_type=client_credentials&scope=read+write"
        );
        assert_eq!(
            settings.client_authorization(),
            Ok(Some(Authorization::Basic {
                username: "abc".to_string(),
                password: "s3cr3t".into(),
            }))
        );
    }

    #[test]
    fn should_put_client_credentials_in_form_in_url_mode() {
        let settings = settings(&[
            ("oauth2.client.authorization.mode", "URL"),
            ("oauth2.client.id", "abc"),
            ("oauth2.client.secret", "s3cr3t"),
            ("oauth2.client.id.property", "clientId"),
            ("oauth2.client.secret.property", "clientSecret"),
        ])
        .expect("Should read settings");

        let form = settings.form().expect("Should build form");
        assert_eq!(
            form.to_body_string(),
            "grant_type=client_credentials&clientId=abc&clientSecret=s3cr3t"
        );
        assert_eq!(settings.client_authorization(), Ok(None));
    }

    #[test]
    fn should_reject_incomplete_client_credentials_in_url_mode() {
        let settings = settings(&[
            ("oauth2.client.authorization.mode", "URL"),
            ("oauth2.client.id", "abc"),
        ])
        .expect("Should read settings");

        let error = settings.form().expect_err("Should fail");
        assert_eq!(error, OAuth2Error::MissingField { field: "client_secret" });
    }

    #[rstest]
    #[case::id_without_secret("oauth2.client.id", "client_secret")]
    #[case::secret_without_id("oauth2.client.secret", "client_id")]
    fn should_reject_incomplete_client_credentials_in_header_mode(
        #[case] configured: &str,
        #[case] missing: &'static str,
    ) {
        let settings = settings(&[
            ("oauth2.client.authorization.mode", "HEADER"),
            (configured, "value"),
        ])
        .expect("Should read settings");

        let expected = OAuth2Error::MissingField { field: missing };
        assert_eq!(settings.client_authorization(), Err(expected.clone()));

        let error = settings.token_request().expect_err("Should fail");
        assert!(
            matches!(&error, RequestError::OAuth2(inner) if *inner == expected),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn should_send_no_authorization_without_client_credentials() {
        let request = settings(&[])
            .expect("Should read settings")
            .token_request()
            .expect("Should build request");

        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn should_build_password_form() {
        let settings = settings(&[
            ("oauth2.grant_type", "password"),
            ("oauth2.username", "alice"),
            ("oauth2.password", "wonderland"),
        ])
        .expect("Should read settings");

        let form = settings.form().expect("Should build form");
        assert_eq!(
            form.to_body_string(),
            "grant_type=password&username=alice&password=wonderland"
        );
    }

    #[test]
    fn should_build_token_request_with_basic_authorization() {
        let settings = settings(&[
            ("oauth2.client.id", "user"),
            ("oauth2.client.secret", "pass"),
        ])
        .expect("Should read settings");

        let request = settings.token_request().expect("Should build request");

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.uri(), ENDPOINT);
        assert_eq!(
            request.headers().get(CONTENT_TYPE).map(|value| value.as_bytes()),
            Some(&b"application/x-www-form-urlencoded"[..])
        );
        assert_eq!(
            request.headers().get(AUTHORIZATION).map(|value| value.as_bytes()),
            Some(&b"Basic dXNlcjpwYXNz"[..])
        );
        assert_eq!(request.body().as_slice(), b"grant_type=client_credentials");
    }

    #[test]
    fn should_build_token_request_without_authorization_in_url_mode() {
        let settings = settings(&[
            ("oauth2.client.authorization.mode", "URL"),
            ("oauth2.client.id", "user"),
            ("oauth2.client.secret", "pass"),
        ])
        .expect("Should read settings");

        let request = settings.token_request().expect("Should build request");

        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(
            request.body().as_slice(),
            b"grant_type=client_credentials&client_id=user&client_secret=pass"
        );
    }

    #[test]
    fn should_parse_token_response_with_configured_property() {
        let settings = settings(&[("oauth2.response.token.property", "token")])
            .expect("Should read settings");

        let token = settings
            .parse_token_response(r#"{"token": "abc", "expires_in": 60}"#)
            .expect("Should parse token");

        assert_eq!(token.access_token(), "abc");
    }

    #[test]
    fn should_redact_debug_output() {
        let settings = settings(&[
            ("oauth2.client.id", "abc"),
            ("oauth2.client.secret", "super-secret"),
            ("oauth2.password", "wonderland"),
        ])
        .expect("Should read settings");

        let debug_str = format!("{settings:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("super-secret"));
        assert!(!debug_str.contains("wonderland"));
    }
}
