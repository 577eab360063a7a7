//! Read JSON key/value secrets from AWS Secrets Manager.
//!
//! ```no_run
//! # async fn run() -> aws_secrets::Result<()> {
//! let client = aws_secrets::SecretClient::new("default", "us-east-1").await?;
//! let password = client.get_secret_by_key("app/db", "password").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod region;
pub mod store;

pub use client::{CURRENT_VERSION_STAGE, SecretClient, SecretClientBuilder};
pub use config::ClientConfig;
pub use error::{Result, SecretsError};
pub use store::{Secret, SecretStore};
