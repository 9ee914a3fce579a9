//! Stack file parser
//!
//! Turns a KDL stack file into a [`StackDefinition`]. Account settings and
//! topology nodes are parsed in their own modules.

mod account;
mod topology;

use crate::error::{ConfigError, Result};
use account::parse_account;
use kdl::{KdlDocument, KdlNode};
use std::fs;
use std::path::Path;
use terraloom_alicloud::{CredentialSource, ExternalCredentials, StackDefinition, StackOperation};
use topology::{parse_instance, parse_network};

/// Parse a stack file
///
/// The stack name defaults to the name of the directory holding the file.
/// A relative secrets file path is resolved against that directory.
pub fn parse_stack_file<P: AsRef<Path>>(path: P) -> Result<StackDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();

    let mut stack = parse_stack_string(&content, name)?;

    if let CredentialSource::External(ExternalCredentials::File(secrets)) =
        &mut stack.account.credentials
        && secrets.is_relative()
        && let Some(dir) = path.parent()
    {
        *secrets = dir.join(&*secrets);
    }

    tracing::debug!(
        "Parsed stack {} from {} ({} operations)",
        stack.name,
        path.display(),
        stack.operations.len()
    );
    Ok(stack)
}

/// Parse stack file content
pub fn parse_stack_string(content: &str, default_name: String) -> Result<StackDefinition> {
    let doc: KdlDocument = content.parse()?;

    let mut name = default_name;
    let mut account = None;
    let mut operations = Vec::new();

    for node in doc.nodes() {
        match node.name().value() {
            "stack" => {
                if let Some(stack_name) = first_string(node) {
                    name = stack_name;
                }
            }
            "account" => {
                if account.is_some() {
                    return Err(ConfigError::InvalidConfig(
                        "only one account node is allowed".to_string(),
                    ));
                }
                account = Some(parse_account(node)?);
            }
            "network" => operations.push(StackOperation::Network(parse_network(node)?)),
            "instance" => operations.push(StackOperation::Instance(parse_instance(node)?)),
            other => {
                tracing::debug!("Skipping unknown node: {}", other);
            }
        }
    }

    let account = account
        .ok_or_else(|| ConfigError::InvalidConfig("an account node is required".to_string()))?;

    terraloom_graph::validate_name(&name).map_err(|_| {
        ConfigError::InvalidConfig(format!(
            "invalid stack name '{}': use letters, digits, '_' or '-' (set it with a stack node)",
            name
        ))
    })?;

    Ok(StackDefinition {
        name,
        account,
        operations,
    })
}

/// First argument of a node as a string
fn first_string(node: &KdlNode) -> Option<String> {
    string_at(node, 0)
}

fn string_at(node: &KdlNode, index: usize) -> Option<String> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .nth(index)
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

/// First argument of a node, failing with a message naming `what`
fn required_string(node: &KdlNode, what: &str) -> Result<String> {
    first_string(node).ok_or_else(|| {
        ConfigError::InvalidConfig(format!("{} requires a string value", what))
    })
}

#[cfg(test)]
mod tests;
