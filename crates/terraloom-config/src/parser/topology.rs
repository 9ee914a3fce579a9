//! Parse network and instance nodes

use super::{first_string, required_string, string_at};
use crate::error::{ConfigError, Result};
use kdl::KdlNode;
use terraloom_alicloud::{InstanceDefinition, NetworkDefinition};

/// Parse a network node
pub fn parse_network(node: &KdlNode) -> Result<NetworkDefinition> {
    let name = first_string(node)
        .ok_or_else(|| ConfigError::InvalidConfig("network requires a name".to_string()))?;

    let mut cidr_block = None;
    let mut vswitches = Vec::new();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "cidr" | "cidr-block" | "cidr_block" => {
                    cidr_block = Some(required_string(child, "cidr")?)
                }
                "vswitch" => {
                    // vswitch "<zone>" "<cidr>"
                    match (string_at(child, 0), string_at(child, 1)) {
                        (Some(zone), Some(cidr)) => vswitches.push((zone, cidr)),
                        _ => {
                            return Err(ConfigError::InvalidConfig(format!(
                                "vswitch in network '{}' requires a zone and a cidr",
                                name
                            )));
                        }
                    }
                }
                other => {
                    return Err(ConfigError::InvalidConfig(format!(
                        "unknown network setting in '{}': {}",
                        name, other
                    )));
                }
            }
        }
    }

    let cidr_block = cidr_block.ok_or_else(|| {
        ConfigError::InvalidConfig(format!("network '{}' requires a cidr", name))
    })?;

    Ok(NetworkDefinition {
        name,
        cidr_block,
        vswitches,
    })
}

/// Parse an instance node
pub fn parse_instance(node: &KdlNode) -> Result<InstanceDefinition> {
    let name = first_string(node)
        .ok_or_else(|| ConfigError::InvalidConfig("instance requires a name".to_string()))?;

    let mut network = None;
    let mut zone = None;
    let mut instance_type = None;

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "network" => network = Some(required_string(child, "network")?),
                "zone" => zone = Some(required_string(child, "zone")?),
                "type" | "instance-type" | "instance_type" => {
                    instance_type = Some(required_string(child, "type")?)
                }
                other => {
                    return Err(ConfigError::InvalidConfig(format!(
                        "unknown instance setting in '{}': {}",
                        name, other
                    )));
                }
            }
        }
    }

    let network = network.ok_or_else(|| {
        ConfigError::InvalidConfig(format!("instance '{}' requires a network", name))
    })?;
    let zone = zone.ok_or_else(|| {
        ConfigError::InvalidConfig(format!("instance '{}' requires a zone", name))
    })?;

    Ok(InstanceDefinition {
        name,
        network,
        zone,
        instance_type,
    })
}
