//! Alibaba Cloud topology builder for terraloom
//!
//! This crate turns intent-level operations ("create a network segment",
//! "create an instance in a segment") into wired-up `alicloud_*`
//! declarations on a [`terraloom_graph::ResourceGraph`].
//!
//! # Features
//!
//! - Account bootstrap (provider, base image lookup, key pair)
//! - Network segments: VPC, security group with SSH ingress, vswitches per zone
//! - Instances with an EIP and its association
//! - Data-driven stack definitions
//!
//! # Example
//!
//! ```
//! use terraloom_alicloud::{
//!     AccountSettings, CredentialSource, Credentials, GroupingMode, KeyMaterial, TopologyBuilder,
//! };
//! use terraloom_graph::TerraformJson;
//!
//! let settings = AccountSettings::new(
//!     "cn-hangzhou",
//!     GroupingMode::ExplicitGroup { resource_group_id: "rg-123".to_string() },
//!     CredentialSource::Literal(Credentials {
//!         account_id: None,
//!         access_key: "AK".to_string(),
//!         secret_key: "SK".to_string(),
//!         key: KeyMaterial::PublicKey("ssh-rsa AAAA".to_string()),
//!     }),
//! );
//!
//! let mut builder = TopologyBuilder::new("alicloud-demo", &settings).unwrap();
//! builder
//!     .create_network_segment("vpc1", "172.16.0.0/12", [("cn-hangzhou-h", "172.16.0.0/21")])
//!     .unwrap();
//! builder
//!     .create_instance("instance1", "vpc1", "cn-hangzhou-h", None)
//!     .unwrap();
//!
//! let artifact = builder.synthesize(&TerraformJson::new()).unwrap();
//! assert_eq!(
//!     artifact.document["resource"]["alicloud_instance"]["instance-instance1"]["vswitch_id"],
//!     "${alicloud_vswitch.vswitch-vpc1-cn-hangzhou-h.id}"
//! );
//! ```

pub mod account;
pub mod builder;
pub mod credentials;
pub mod definition;
pub mod error;
pub mod images;
pub mod instance;
pub mod kinds;
pub mod network;
pub mod policy;

#[cfg(test)]
mod testing;

pub use account::{AccountContext, AccountSettings, GroupingMode, ProviderAuth};
pub use builder::{BuildContext, SegmentTables, TopologyBuilder};
pub use credentials::{CredentialSource, Credentials, ExternalCredentials, KeyMaterial};
pub use definition::{InstanceDefinition, NetworkDefinition, StackDefinition, StackOperation};
pub use error::{Result, TopologyError};
pub use images::{DataSourceImages, ImageFilter, ImageList, ImageLookup, ImageOwnership, StaticImages};
pub use instance::ComputeInstance;
pub use network::NetworkSegment;
