use std::collections::HashMap;

use crate::error::Result;

/// A secret as stored remotely: a JSON object keyed by field name.
pub type Secret = HashMap<String, serde_json::Value>;

/// Resolves a secret identifier into its key/value bundle.
///
/// [`SecretClient`](crate::SecretClient) implements this against AWS Secrets
/// Manager; callers that only read secrets can depend on the trait instead.
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, path: &str) -> Result<Secret>;

    async fn get_secret_by_key(&self, path: &str, key: &str) -> Result<String>;
}
