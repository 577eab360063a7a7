//! CLI entry point for reading AWS Secrets Manager secrets.
//!
//! Provides subcommands for printing a whole secret, a single key of a
//! secret, or the resolved client configuration.

use anyhow::{Context, Result};
use aws_secrets::SecretClient;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "aws-secrets")]
#[command(about = "Read JSON secrets from AWS Secrets Manager", long_about = None)]
struct Cli {
    /// AWS region, e.g. "us-east-1". Empty defers to the AWS provider chain
    #[arg(long, global = true, default_value = "")]
    region: String,

    /// Label reported in the client configuration
    #[arg(long, global = true, default_value = "default")]
    id: String,

    /// Optional: custom Secrets Manager endpoint (e.g. LocalStack)
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every key of a secret as JSON
    Get {
        /// Secret name or ARN
        #[arg(value_name = "PATH")]
        path: String,
    },
    /// Print the string value stored under one key of a secret
    GetKey {
        /// Secret name or ARN
        #[arg(value_name = "PATH")]
        path: String,

        /// Key inside the secret's JSON object
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Print the client configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/aws_secrets.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("aws_secrets.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut builder = SecretClient::builder(&cli.id).region(&cli.region);
    if let Some(endpoint_url) = &cli.endpoint_url {
        info!(endpoint_url = %endpoint_url, "Using custom Secrets Manager endpoint");
        builder = builder.endpoint_url(endpoint_url);
    }
    let client = builder
        .build()
        .await
        .context("Failed to configure Secrets Manager client")?;

    match cli.command {
        Commands::Get { path } => {
            let secret = client
                .get_secret(&path)
                .await
                .with_context(|| format!("Failed to read secret '{path}'"))?;
            info!(secret_id = %path, keys = secret.len(), "Secret retrieved");
            println!("{}", serde_json::to_string_pretty(&secret)?);
        }
        Commands::GetKey { path, key } => {
            let value = client
                .get_secret_by_key(&path, &key)
                .await
                .with_context(|| format!("Failed to read key '{key}' of secret '{path}'"))?;
            println!("{value}");
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&client.get_config())?);
        }
    }

    Ok(())
}
