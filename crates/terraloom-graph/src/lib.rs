//! terraloom resource graph
//!
//! This crate is the resource registry of terraloom: it declares typed,
//! uniquely named resources, wires them together with deferred references
//! and hands the finished graph to a synthesizer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              terraloom-alicloud                  │
//! │        (account bootstrap, topology ops)         │
//! └─────────────────┬───────────────────────────────┘
//!                   │ declare(kind, name, attrs)
//! ┌─────────────────▼───────────────────────────────┐
//! │               terraloom-graph                    │
//! │  ┌──────────────┐  ┌──────────────┐             │
//! │  │ResourceGraph │  │ LookupTable  │             │
//! │  └──────┬───────┘  └──────────────┘             │
//! │         │ Reference { node, attribute }          │
//! │  ┌──────▼───────────────────────────────────┐   │
//! │  │   trait Synthesizer { ... }              │   │
//! │  └──────────────────────────────────────────┘   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           stacks/<name>/cdk.tf.json
//! ```
//!
//! # Example
//!
//! ```
//! use terraloom_graph::{Attributes, ResourceGraph, ResourceKind, Synthesizer, TerraformJson};
//!
//! const NETWORK: ResourceKind = ResourceKind::resource("example_network", &["id"]);
//! const SUBNET: ResourceKind = ResourceKind::resource("example_subnet", &["id"]);
//!
//! let mut graph = ResourceGraph::new("demo");
//! let network = graph
//!     .declare(NETWORK, "net", Attributes::new().with("cidr_block", "10.0.0.0/8"))
//!     .unwrap();
//! graph
//!     .declare(
//!         SUBNET,
//!         "net-a",
//!         Attributes::new().with("network_id", network.output("id").unwrap()),
//!     )
//!     .unwrap();
//!
//! let artifact = TerraformJson::new().synthesize(&graph).unwrap();
//! assert_eq!(
//!     artifact.document["resource"]["example_subnet"]["net-a"]["network_id"],
//!     "${example_network.net.id}"
//! );
//! ```

pub mod error;
pub mod graph;
pub mod kind;
pub mod synth;
pub mod table;
pub mod value;

// Re-exports
pub use error::{GraphError, Result};
pub use graph::{Declaration, GraphSummary, ResourceGraph, ResourceHandle, validate_name};
pub use kind::{Category, ResourceKind};
pub use synth::{ARTIFACT_FILE, Artifact, Synthesizer, TerraformJson};
pub use table::LookupTable;
pub use value::{Attributes, NodeId, Reference, Value};
