use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SecretsError};

static REGION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2}-[A-Za-z]+-[0-9]$").expect("region pattern is valid"));

/// Checks that `region` looks like an AWS region name such as `us-east-1`.
///
/// An empty region is accepted; the SDK provider chain resolves it later.
///
/// # Errors
///
/// Returns [`SecretsError::Config`] if the region is non-empty and malformed.
pub fn validate_region(region: &str) -> Result<()> {
    if region.is_empty() || REGION_RE.is_match(region) {
        return Ok(());
    }
    Err(SecretsError::config(format!("malformed {region:?} region")))
}
