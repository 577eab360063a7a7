//! AWS Secrets Manager client.
//!
//! [`SecretClient`] fetches the `AWSCURRENT` version of a secret and decodes
//! its `SecretString` as a JSON object. Request signing, credentials,
//! retries and transport all come from the AWS SDK; this type only configures
//! the SDK and interprets the payload.

use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_secretsmanager::config::Region;
use aws_smithy_runtime_api::client::http::{HttpClient, SharedHttpClient};
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{Result, SecretsError};
use crate::region::validate_region;
use crate::store::{Secret, SecretStore};

/// Version stage that selects the latest active version of a secret.
pub const CURRENT_VERSION_STAGE: &str = "AWSCURRENT";

/// Reads JSON secrets from AWS Secrets Manager.
///
/// The underlying service client is built on first use and reused for every
/// later call. Each `get_secret*` call still performs its own round-trip;
/// nothing is cached.
#[derive(Debug)]
pub struct SecretClient {
    config: ClientConfig,
    sdk_config: SdkConfig,
    http_client: Option<SharedHttpClient>,
    credentials_provider: Option<SharedCredentialsProvider>,
    endpoint_url: Option<String>,
    service: OnceCell<aws_sdk_secretsmanager::Client>,
}

/// Builder for [`SecretClient`], used to inject a transport or credentials.
#[derive(Debug, Default)]
pub struct SecretClientBuilder {
    id: String,
    region: String,
    http_client: Option<SharedHttpClient>,
    credentials_provider: Option<SharedCredentialsProvider>,
    endpoint_url: Option<String>,
}

impl SecretClientBuilder {
    /// Region to scope the client to. Empty means "let the provider chain decide".
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// HTTP transport used for every request instead of the SDK default.
    pub fn http_client(mut self, http_client: impl HttpClient + 'static) -> Self {
        self.http_client = Some(SharedHttpClient::new(http_client));
        self
    }

    /// Credential source used instead of the default provider chain.
    pub fn credentials_provider(mut self, provider: impl ProvideCredentials + 'static) -> Self {
        self.credentials_provider = Some(SharedCredentialsProvider::new(provider));
        self
    }

    /// Overrides the service endpoint, e.g. to target LocalStack.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Validates the region and loads the SDK configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SecretsError::Config`] if the region is malformed, if no
    /// region was given and the provider chain could not resolve one, or if
    /// the resolved region is malformed.
    pub async fn build(self) -> Result<SecretClient> {
        validate_region(&self.region)?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if !self.region.is_empty() {
            loader = loader.region(Region::new(self.region.clone()));
        }
        if let Some(provider) = &self.credentials_provider {
            loader = loader.credentials_provider(provider.clone());
        }
        if let Some(http_client) = &self.http_client {
            loader = loader.http_client(http_client.clone());
        }
        let sdk_config = loader.load().await;

        let mut client = SecretClient::from_parts(self.id, sdk_config)?;
        client.http_client = self.http_client;
        client.credentials_provider = self.credentials_provider;
        client.endpoint_url = self.endpoint_url;
        Ok(client)
    }
}

impl SecretClient {
    /// Creates a client scoped to `region` using the default AWS provider chain.
    ///
    /// `id` is an opaque label reported back by [`SecretClient::get_config`].
    pub async fn new(id: impl Into<String>, region: impl Into<String>) -> Result<Self> {
        Self::builder(id).region(region).build().await
    }

    /// Starts a [`SecretClientBuilder`] labelled `id`.
    pub fn builder(id: impl Into<String>) -> SecretClientBuilder {
        SecretClientBuilder {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Wraps an SDK configuration the caller has already loaded.
    pub fn from_sdk_config(id: impl Into<String>, sdk_config: &SdkConfig) -> Result<Self> {
        Self::from_parts(id.into(), sdk_config.clone())
    }

    /// Regions resolved by the provider chain pass the same format check as
    /// caller-supplied ones.
    fn from_parts(id: String, sdk_config: SdkConfig) -> Result<Self> {
        let region = sdk_config
            .region()
            .map(|r| r.as_ref().to_string())
            .ok_or_else(|| {
                SecretsError::config("no region resolved from the AWS provider chain")
            })?;
        validate_region(&region)?;

        debug!(id = %id, region = %region, "Secrets Manager client configured");

        Ok(Self {
            config: ClientConfig::new(id, region),
            sdk_config,
            http_client: None,
            credentials_provider: None,
            endpoint_url: None,
            service: OnceCell::new(),
        })
    }

    /// Returns a snapshot of the client's identity.
    ///
    /// `region` is the region the client actually uses: the one passed to the
    /// constructor, or the one the provider chain resolved when that was empty.
    pub fn get_config(&self) -> ClientConfig {
        self.config.clone()
    }

    /// Replaces the HTTP transport.
    ///
    /// Any service client built so far is discarded, so the next call uses
    /// the new transport.
    pub fn set_mock_transport(&mut self, http_client: impl HttpClient + 'static) {
        self.http_client = Some(SharedHttpClient::new(http_client));
        self.service.take();
    }

    /// Replaces the credential source. Same reset rules as [`Self::set_mock_transport`].
    pub fn set_mock_credentials(&mut self, provider: impl ProvideCredentials + 'static) {
        self.credentials_provider = Some(SharedCredentialsProvider::new(provider));
        self.service.take();
    }

    fn service(&self) -> &aws_sdk_secretsmanager::Client {
        self.service.get_or_init(|| {
            trace!(id = %self.config.id, "Building Secrets Manager service client");
            let mut builder = aws_sdk_secretsmanager::config::Builder::from(&self.sdk_config);
            if let Some(http_client) = &self.http_client {
                builder = builder.http_client(http_client.clone());
            }
            if let Some(provider) = &self.credentials_provider {
                builder = builder.credentials_provider(provider.clone());
            }
            if let Some(endpoint) = self.endpoint_url.as_deref() {
                builder = builder.endpoint_url(endpoint);
            }
            aws_sdk_secretsmanager::Client::from_conf(builder.build())
        })
    }

    /// Fetches the current version of the secret at `path` and decodes it.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::Remote`] if the service call fails.
    /// - [`SecretsError::MissingPayload`] if the response has no `SecretString`.
    /// - [`SecretsError::Parse`] if the payload is not a JSON object.
    #[tracing::instrument(skip_all, fields(secret_id = %path))]
    pub async fn get_secret(&self, path: &str) -> Result<Secret> {
        let output = self
            .service()
            .get_secret_value()
            .secret_id(path)
            .version_stage(CURRENT_VERSION_STAGE)
            .send()
            .await?;

        let secret = parse_secret(output.secret_string())?;
        debug!(keys = secret.len(), "Secret fetched");
        Ok(secret)
    }

    /// Fetches the secret at `path` and returns the string stored under `key`.
    ///
    /// # Errors
    ///
    /// Everything [`SecretClient::get_secret`] returns, plus
    /// [`SecretsError::KeyNotFound`] and [`SecretsError::NotAString`].
    #[tracing::instrument(skip_all, fields(secret_id = %path, key = %key))]
    pub async fn get_secret_by_key(&self, path: &str, key: &str) -> Result<String> {
        let secret = self.get_secret(path).await?;
        project_key(secret, path, key)
    }
}

#[async_trait::async_trait]
impl SecretStore for SecretClient {
    async fn get_secret(&self, path: &str) -> Result<Secret> {
        SecretClient::get_secret(self, path).await
    }

    async fn get_secret_by_key(&self, path: &str, key: &str) -> Result<String> {
        SecretClient::get_secret_by_key(self, path, key).await
    }
}

/// Decodes a `SecretString` into a [`Secret`].
///
/// `None` (no `SecretString` in the response) is distinct from `"{}"`,
/// which decodes to an empty secret.
pub fn parse_secret(secret_string: Option<&str>) -> Result<Secret> {
    let payload = secret_string.ok_or(SecretsError::MissingPayload)?;
    Ok(serde_json::from_str(payload)?)
}

/// Takes the string value stored under `key` out of `secret`.
///
/// Non-string values are rejected, never stringified.
pub fn project_key(mut secret: Secret, path: &str, key: &str) -> Result<String> {
    match secret.remove(key) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(SecretsError::NotAString {
            key: key.to_string(),
            path: path.to_string(),
            kind: value_kind(&other),
        }),
        None => Err(SecretsError::KeyNotFound {
            key: key.to_string(),
            path: path.to_string(),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jsmith() -> Secret {
        serde_json::from_value(json!({
            "email": "jsmith@localhost.localdomain",
            "name": "John Smith",
            "username": "jsmith",
            "uid": 1000,
            "admin": false,
            "groups": ["users"],
            "manager": null,
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_secret_object() {
        let secret = parse_secret(Some(r#"{"id":"0","usage":"sign-verify"}"#)).unwrap();
        assert_eq!(secret.len(), 2);
        assert_eq!(secret["id"], json!("0"));
        assert_eq!(secret["usage"], json!("sign-verify"));
    }

    #[test]
    fn test_parse_secret_empty_object() {
        let secret = parse_secret(Some("{}")).unwrap();
        assert!(secret.is_empty());
    }

    #[test]
    fn test_parse_secret_missing_payload() {
        let err = parse_secret(None).unwrap_err();
        assert!(matches!(err, SecretsError::MissingPayload));
    }

    #[test]
    fn test_parse_secret_rejects_non_object() {
        for payload in ["", "not json", "[1,2]", r#""text""#, "null", "42"] {
            let err = parse_secret(Some(payload)).unwrap_err();
            assert!(
                matches!(err, SecretsError::Parse(_)),
                "{payload:?} should fail to parse"
            );
        }
    }

    #[test]
    fn test_project_key_string() {
        let value = project_key(jsmith(), "authcrunch/caddy/jsmith", "name").unwrap();
        assert_eq!(value, "John Smith");
    }

    #[test]
    fn test_project_key_missing() {
        let err = project_key(jsmith(), "authcrunch/caddy/jsmith", "foo").unwrap_err();
        match err {
            SecretsError::KeyNotFound { key, path } => {
                assert_eq!(key, "foo");
                assert_eq!(path, "authcrunch/caddy/jsmith");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_project_key_rejects_non_strings() {
        let cases = [
            ("uid", "a number"),
            ("admin", "a boolean"),
            ("groups", "an array"),
            ("manager", "null"),
        ];
        for (key, expected_kind) in cases {
            let err = project_key(jsmith(), "p", key).unwrap_err();
            match err {
                SecretsError::NotAString { kind, .. } => assert_eq!(kind, expected_kind),
                other => panic!("unexpected error for {key}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_not_a_string_message() {
        let err = project_key(jsmith(), "authcrunch/caddy/jsmith", "uid").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"key "uid" in "authcrunch/caddy/jsmith" secret is a number, expected a string"#
        );
    }

    #[test]
    fn test_from_sdk_config_without_region() {
        let sdk_config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .build();
        let err = SecretClient::from_sdk_config("default", &sdk_config).unwrap_err();
        assert!(matches!(err, SecretsError::Config(_)));
    }

    #[test]
    fn test_from_sdk_config_with_malformed_region() {
        let sdk_config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east"))
            .build();
        let err = SecretClient::from_sdk_config("default", &sdk_config).unwrap_err();
        assert_eq!(err.to_string(), r#"malformed "us-east" region"#);
    }

    #[test]
    fn test_from_sdk_config_reports_config() {
        let sdk_config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("eu-west-1"))
            .build();
        let client = SecretClient::from_sdk_config("primary", &sdk_config).unwrap();
        let config = client.get_config();
        assert_eq!(config.id, "primary");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.provider, "aws_secrets_manager");
    }
}
