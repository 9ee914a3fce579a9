//! Data-driven stack definitions replayed through the topology builder

use crate::account::AccountSettings;
use crate::builder::TopologyBuilder;
use crate::error::Result;
use crate::images::{DataSourceImages, ImageLookup};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDefinition {
    pub name: String,
    pub cidr_block: String,
    /// `(zone, cidr_block)` per vswitch
    pub vswitches: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDefinition {
    pub name: String,
    pub network: String,
    pub zone: String,
    pub instance_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackOperation {
    Network(NetworkDefinition),
    Instance(InstanceDefinition),
}

/// A complete stack: account settings plus operations in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackDefinition {
    pub name: String,
    pub account: AccountSettings,
    pub operations: Vec<StackOperation>,
}

impl StackDefinition {
    pub fn networks(&self) -> impl Iterator<Item = &NetworkDefinition> {
        self.operations.iter().filter_map(|op| match op {
            StackOperation::Network(network) => Some(network),
            _ => None,
        })
    }

    pub fn instances(&self) -> impl Iterator<Item = &InstanceDefinition> {
        self.operations.iter().filter_map(|op| match op {
            StackOperation::Instance(instance) => Some(instance),
            _ => None,
        })
    }

    pub fn build(&self) -> Result<TopologyBuilder> {
        self.build_with(&DataSourceImages)
    }

    /// Bootstrap the account and replay every operation in order
    pub fn build_with(&self, images: &dyn ImageLookup) -> Result<TopologyBuilder> {
        let mut builder = TopologyBuilder::with_image_lookup(&self.name, &self.account, images)?;

        for operation in &self.operations {
            match operation {
                StackOperation::Network(network) => {
                    builder.create_network_segment(
                        &network.name,
                        &network.cidr_block,
                        network.vswitches.iter().cloned(),
                    )?;
                }
                StackOperation::Instance(instance) => {
                    builder.create_instance(
                        &instance.name,
                        &instance.network,
                        &instance.zone,
                        instance.instance_type.as_deref(),
                    )?;
                }
            }
        }

        tracing::debug!("Built stack {}: {}", self.name, builder.graph().summary());
        Ok(builder)
    }
}
