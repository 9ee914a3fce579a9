//! Credential supply for the provider connection and the key pair
//!
//! Credentials are either given literally or pulled from an external source
//! (environment variables or a JSON secrets file).

use crate::error::{Result, TopologyError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_ACCESS_KEY: &str = "ALICLOUD_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "ALICLOUD_SECRET_KEY";
pub const ENV_ACCOUNT_ID: &str = "ALICLOUD_ACCOUNT_ID";
pub const ENV_PUBLIC_KEY: &str = "TERRALOOM_PUBLIC_KEY";
pub const ENV_KEY_NAME: &str = "TERRALOOM_KEY_NAME";

/// SSH key material for instance login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    /// Public key to register as a new key pair
    PublicKey(String),
    /// Name of a key pair that already exists in the account
    ExistingKeyPair(String),
}

impl KeyMaterial {
    /// Pick the key material from optional parts
    ///
    /// Blank values count as missing. Exactly one part must remain.
    pub fn from_parts(public_key: Option<String>, key_name: Option<String>) -> Result<Self> {
        match (non_empty(public_key), non_empty(key_name)) {
            (Some(key), None) => Ok(KeyMaterial::PublicKey(key)),
            (None, Some(name)) => Ok(KeyMaterial::ExistingKeyPair(name)),
            (Some(_), Some(_)) => Err(TopologyError::Credentials(
                "both a public key and an existing key pair name were given".to_string(),
            )),
            (None, None) => Err(TopologyError::Credentials(
                "either a public key or an existing key pair name is required".to_string(),
            )),
        }
    }
}

/// Resolved account credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_id: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    pub key: KeyMaterial,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("key", &self.key)
            .finish()
    }
}

impl Credentials {
    /// Reject blank access keys, secret keys and key material
    pub fn validate(&self) -> Result<()> {
        if self.access_key.trim().is_empty() {
            return Err(TopologyError::Credentials("access key is empty".to_string()));
        }
        if self.secret_key.trim().is_empty() {
            return Err(TopologyError::Credentials("secret key is empty".to_string()));
        }
        match &self.key {
            KeyMaterial::PublicKey(key) if key.trim().is_empty() => Err(
                TopologyError::Credentials("public key is empty".to_string()),
            ),
            KeyMaterial::ExistingKeyPair(name) if name.trim().is_empty() => Err(
                TopologyError::Credentials("key pair name is empty".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// Where credentials come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Literal(Credentials),
    External(ExternalCredentials),
}

/// External credential supply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalCredentials {
    /// `ALICLOUD_*` and `TERRALOOM_*` environment variables
    Environment,
    /// JSON secrets file
    File(PathBuf),
}

/// Layout of a JSON secrets file
#[derive(Debug, Deserialize)]
struct SecretsFile {
    account_id: Option<String>,
    access_key: String,
    secret_key: String,
    public_key: Option<String>,
    key_name: Option<String>,
}

impl CredentialSource {
    pub fn resolve(&self) -> Result<Credentials> {
        match self {
            CredentialSource::Literal(credentials) => {
                credentials.validate()?;
                Ok(credentials.clone())
            }
            CredentialSource::External(ExternalCredentials::Environment) => from_environment(),
            CredentialSource::External(ExternalCredentials::File(path)) => from_file(path),
        }
    }
}

fn from_environment() -> Result<Credentials> {
    tracing::debug!("Reading credentials from environment");

    Ok(Credentials {
        account_id: env_var(ENV_ACCOUNT_ID),
        access_key: required_env(ENV_ACCESS_KEY)?,
        secret_key: required_env(ENV_SECRET_KEY)?,
        key: KeyMaterial::from_parts(env_var(ENV_PUBLIC_KEY), env_var(ENV_KEY_NAME))?,
    })
}

fn from_file(path: &Path) -> Result<Credentials> {
    tracing::debug!("Reading credentials from {}", path.display());

    let content = std::fs::read_to_string(path)?;
    let secrets: SecretsFile = serde_json::from_str(&content)?;

    let access_key = non_empty(Some(secrets.access_key)).ok_or_else(|| {
        TopologyError::Credentials(format!("access_key is empty in {}", path.display()))
    })?;
    let secret_key = non_empty(Some(secrets.secret_key)).ok_or_else(|| {
        TopologyError::Credentials(format!("secret_key is empty in {}", path.display()))
    })?;

    Ok(Credentials {
        account_id: non_empty(secrets.account_id),
        access_key,
        secret_key,
        key: KeyMaterial::from_parts(secrets.public_key, secrets.key_name)?,
    })
}

fn env_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

fn required_env(name: &str) -> Result<String> {
    env_var(name).ok_or_else(|| TopologyError::Credentials(format!("{} is not set", name)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
