//! Error types returned by the secrets client.

use std::fmt;

use aws_sdk_secretsmanager::config::http::HttpResponse;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Everything that can go wrong while building a client or reading a secret.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// Malformed region or a provider chain that resolved no region.
    #[error("{0}")]
    Config(String),

    /// The `GetSecretValue` call failed, either remotely or in transport.
    #[error("{detail}")]
    Remote {
        detail: RemoteDetail,
        #[source]
        source: Box<SdkError<GetSecretValueError, HttpResponse>>,
    },

    /// The call succeeded but carried no `SecretString`.
    #[error("SecretString not found in response")]
    MissingPayload,

    /// The payload was not JSON object text.
    #[error("failed to parse secret payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("key {key:?} not found in {path:?} secret")]
    KeyNotFound { key: String, path: String },

    #[error("key {key:?} in {path:?} secret is {kind}, expected a string")]
    NotAString {
        key: String,
        path: String,
        kind: &'static str,
    },
}

impl SecretsError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// HTTP status code of a remote failure, when a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { detail, .. } => detail.status,
            _ => None,
        }
    }

    /// Remote error type (the `__type` of the response body), if any.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Remote { detail, .. } => detail.code.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` when the remote service reported that the secret does not exist.
    pub fn is_not_found(&self) -> bool {
        self.error_code() == Some("ResourceNotFoundException")
    }
}

/// What the remote side told us about a failed `GetSecretValue` call.
///
/// Rendered the way AWS SDKs commonly report operation errors:
///
/// ```text
/// operation error Secrets Manager: GetSecretValue, https response error StatusCode: 400, RequestID: <id>, ResourceNotFoundException: <message>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDetail {
    pub status: Option<u16>,
    pub request_id: Option<String>,
    pub code: Option<String>,
    pub message: String,
}

impl RemoteDetail {
    fn from_sdk_error(err: &SdkError<GetSecretValueError, HttpResponse>) -> Self {
        let status = err.raw_response().map(|raw| raw.status().as_u16());
        let request_id = err
            .raw_response()
            .and_then(|raw| raw.headers().get("x-amzn-requestid"))
            .map(str::to_string);

        match err {
            SdkError::ServiceError(context) => {
                let service_err = context.err();
                Self {
                    status,
                    request_id,
                    code: service_err.code().map(str::to_string),
                    message: service_err
                        .message()
                        .map(str::to_string)
                        .unwrap_or_else(|| DisplayErrorContext(service_err).to_string()),
                }
            }
            other => Self {
                status,
                request_id,
                code: None,
                message: DisplayErrorContext(other).to_string(),
            },
        }
    }
}

impl fmt::Display for RemoteDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation error Secrets Manager: GetSecretValue, ")?;
        if let Some(status) = self.status {
            write!(f, "https response error StatusCode: {status}, ")?;
            write!(f, "RequestID: {}, ", self.request_id.as_deref().unwrap_or(""))?;
        }
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<SdkError<GetSecretValueError, HttpResponse>> for SecretsError {
    fn from(err: SdkError<GetSecretValueError, HttpResponse>) -> Self {
        Self::Remote {
            detail: RemoteDetail::from_sdk_error(&err),
            source: Box::new(err),
        }
    }
}
