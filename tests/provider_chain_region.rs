//! Region resolution through the AWS provider chain.
//!
//! Kept in its own test binary because it mutates `AWS_REGION`.

use aws_credential_types::Credentials;
use aws_secrets::{SecretClient, SecretsError};

fn set_env(key: &str, value: &str) {
    unsafe { std::env::set_var(key, value) };
}

fn clear_env(key: &str) {
    unsafe { std::env::remove_var(key) };
}

async fn build_without_region() -> aws_secrets::Result<SecretClient> {
    SecretClient::builder("chain")
        .region("")
        .credentials_provider(Credentials::new(
            "AKID",
            "SECRET",
            None,
            None,
            "mock credentials",
        ))
        .build()
        .await
}

#[tokio::test]
async fn test_region_from_provider_chain_is_validated() {
    clear_env("AWS_DEFAULT_REGION");
    clear_env("AWS_PROFILE");

    set_env("AWS_REGION", "garbage");
    let err = build_without_region().await.unwrap_err();
    assert!(matches!(err, SecretsError::Config(_)));
    assert_eq!(err.to_string(), r#"malformed "garbage" region"#);

    set_env("AWS_REGION", "eu-central-1");
    let client = build_without_region().await.unwrap();
    assert_eq!(client.get_config().region, "eu-central-1");

    clear_env("AWS_REGION");
}
