//! Parse the account node

use super::{first_string, required_string, string_at};
use crate::error::{ConfigError, Result};
use kdl::KdlNode;
use std::path::PathBuf;
use terraloom_alicloud::{
    AccountSettings, CredentialSource, Credentials, ExternalCredentials, GroupingMode,
    ImageFilter, ImageOwnership, KeyMaterial,
};

/// Parse the account node into settings
pub fn parse_account(node: &KdlNode) -> Result<AccountSettings> {
    let children = node
        .children()
        .ok_or_else(|| ConfigError::InvalidConfig("account requires a block".to_string()))?;

    let mut region = None;
    let mut resource_group = None;
    let mut assume_role = None;
    let mut credentials = None;
    let mut image = None;
    let mut key_pair_name = None;

    for child in children.nodes() {
        match child.name().value() {
            "region" => region = Some(required_string(child, "region")?),
            "resource-group" | "resource_group" => {
                resource_group = Some(required_string(child, "resource-group")?)
            }
            "assume-role" | "assume_role" => {
                assume_role = Some(required_string(child, "assume-role")?)
            }
            "credentials" => credentials = Some(parse_credentials(child)?),
            "image" => {
                let name_regex = required_string(child, "image")?;
                let owners = match string_at(child, 1) {
                    Some(owners) => owners
                        .parse::<ImageOwnership>()
                        .map_err(ConfigError::InvalidConfig)?,
                    None => ImageOwnership::default(),
                };
                image = Some(ImageFilter::new(name_regex, owners));
            }
            "key-pair" | "key_pair" => key_pair_name = Some(required_string(child, "key-pair")?),
            other => {
                return Err(ConfigError::InvalidConfig(format!(
                    "unknown account setting: {}",
                    other
                )));
            }
        }
    }

    let region = region
        .ok_or_else(|| ConfigError::InvalidConfig("account requires a region".to_string()))?;

    let grouping = match (resource_group, assume_role) {
        (Some(resource_group_id), None) => GroupingMode::ExplicitGroup { resource_group_id },
        (None, Some(role_name)) => GroupingMode::DelegatedRole { role_name },
        (Some(_), Some(_)) => {
            return Err(ConfigError::InvalidConfig(
                "resource-group and assume-role are mutually exclusive".to_string(),
            ));
        }
        (None, None) => {
            return Err(ConfigError::InvalidConfig(
                "account requires either resource-group or assume-role".to_string(),
            ));
        }
    };

    let credentials = credentials
        .ok_or_else(|| ConfigError::InvalidConfig("account requires credentials".to_string()))?;

    let mut settings = AccountSettings::new(region, grouping, credentials);
    if let Some(image) = image {
        settings = settings.with_image(image);
    }
    if let Some(name) = key_pair_name {
        settings = settings.with_key_pair_name(name);
    }
    Ok(settings)
}

/// Parse a credentials node
///
/// `credentials "literal" { ... }`, `credentials "env"` or
/// `credentials "file" "secret.json"`.
fn parse_credentials(node: &KdlNode) -> Result<CredentialSource> {
    let source = first_string(node).unwrap_or_else(|| "literal".to_string());

    match source.as_str() {
        "literal" => parse_literal_credentials(node).map(CredentialSource::Literal),
        "env" | "environment" => Ok(CredentialSource::External(
            ExternalCredentials::Environment,
        )),
        "file" => {
            let path = string_at(node, 1).ok_or_else(|| {
                ConfigError::InvalidConfig("credentials \"file\" requires a path".to_string())
            })?;
            Ok(CredentialSource::External(ExternalCredentials::File(
                PathBuf::from(path),
            )))
        }
        other => Err(ConfigError::InvalidConfig(format!(
            "unknown credential source: {}",
            other
        ))),
    }
}

fn parse_literal_credentials(node: &KdlNode) -> Result<Credentials> {
    let children = node.children().ok_or_else(|| {
        ConfigError::InvalidConfig("literal credentials require a block".to_string())
    })?;

    let mut account_id = None;
    let mut access_key = None;
    let mut secret_key = None;
    let mut public_key = None;
    let mut key_name = None;

    for child in children.nodes() {
        match child.name().value() {
            "account-id" | "account_id" => account_id = first_string(child),
            "access-key" | "access_key" => access_key = first_string(child),
            "secret-key" | "secret_key" => secret_key = first_string(child),
            "public-key" | "public_key" => public_key = first_string(child),
            "key-name" | "key_name" => key_name = first_string(child),
            other => {
                return Err(ConfigError::InvalidConfig(format!(
                    "unknown credential field: {}",
                    other
                )));
            }
        }
    }

    let key = KeyMaterial::from_parts(public_key, key_name).map_err(|_| {
        ConfigError::InvalidConfig(
            "credentials require exactly one non-empty public-key or key-name".to_string(),
        )
    })?;

    let credentials = Credentials {
        account_id: account_id.filter(|id| !id.trim().is_empty()),
        access_key: access_key.ok_or_else(|| {
            ConfigError::InvalidConfig("credentials require access-key".to_string())
        })?,
        secret_key: secret_key.ok_or_else(|| {
            ConfigError::InvalidConfig("credentials require secret-key".to_string())
        })?,
        key,
    };
    credentials
        .validate()
        .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;

    Ok(credentials)
}
