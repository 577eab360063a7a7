use serde::Serialize;

/// Provider tag reported by every [`ClientConfig`].
pub const PROVIDER: &str = "aws_secrets_manager";

/// Identity of a [`SecretClient`](crate::SecretClient).
///
/// Serializes as a plain JSON object, omitting empty fields:
/// ```json
/// {
///   "id": "default",
///   "region": "us-east-1",
///   "provider": "aws_secrets_manager"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    pub provider: &'static str,
}

impl ClientConfig {
    pub(crate) fn new(id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
            provider: PROVIDER,
        }
    }
}
