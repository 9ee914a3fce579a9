//! Topology builder bound to one account

use crate::account::{AccountContext, AccountSettings};
use crate::error::Result;
use crate::images::{DataSourceImages, ImageLookup};
use crate::instance::{self, ComputeInstance};
use crate::network::{self, NetworkSegment, subnet_key};
use terraloom_graph::{Artifact, LookupTable, ResourceGraph, ResourceHandle, Synthesizer};

/// Lookup tables filled by topology operations
#[derive(Debug, Default)]
pub struct SegmentTables {
    /// Network segments by logical name
    pub networks: LookupTable<NetworkSegment>,
    /// Vswitches by `{network}-{zone}`
    pub subnets: LookupTable<ResourceHandle>,
    /// Instances by logical name
    pub instances: LookupTable<ComputeInstance>,
}

/// Everything a topology operation reads or extends besides the graph
#[derive(Debug)]
pub struct BuildContext {
    pub account: AccountContext,
    pub tables: SegmentTables,
}

impl BuildContext {
    pub fn new(account: AccountContext) -> Self {
        Self {
            account,
            tables: SegmentTables::default(),
        }
    }
}

/// Builds the resource graph of one stack
///
/// Each operation only appends declarations; failed operations leave the graph
/// as it was.
///
/// ```
/// # use terraloom_alicloud::{
/// #     AccountSettings, CredentialSource, Credentials, GroupingMode, KeyMaterial, StaticImages,
/// #     TopologyBuilder, TopologyError,
/// # };
/// # use terraloom_graph::TerraformJson;
/// let settings = AccountSettings::new(
///     "cn-hangzhou",
///     GroupingMode::DelegatedRole { role_name: "deployer".to_string() },
///     CredentialSource::Literal(Credentials {
///         account_id: Some("1234".to_string()),
///         access_key: "AK".to_string(),
///         secret_key: "SK".to_string(),
///         key: KeyMaterial::ExistingKeyPair("ops".to_string()),
///     }),
/// );
/// let images = StaticImages(vec!["m-debian".to_string()]);
///
/// let mut builder = TopologyBuilder::with_image_lookup("alicloud-demo", &settings, &images)?;
/// builder.create_network_segment("vpc1", "172.16.0.0/12", [("cn-hangzhou-h", "172.16.0.0/21")])?;
/// builder.create_instance("instance1", "vpc1", "cn-hangzhou-h", None)?;
///
/// // provider + vpc, security group, rule, vswitch + instance, eip, association
/// assert_eq!(builder.graph().len(), 8);
/// let artifact = builder.synthesize(&TerraformJson::new())?;
/// assert_eq!(artifact.stack, "alicloud-demo");
/// # Ok::<(), TopologyError>(())
/// ```
#[derive(Debug)]
pub struct TopologyBuilder {
    graph: ResourceGraph,
    context: BuildContext,
}

impl TopologyBuilder {
    /// Bootstrap the account, looking the base image up through the provider
    pub fn new(stack: impl Into<String>, settings: &AccountSettings) -> Result<Self> {
        Self::with_image_lookup(stack, settings, &DataSourceImages)
    }

    pub fn with_image_lookup(
        stack: impl Into<String>,
        settings: &AccountSettings,
        images: &dyn ImageLookup,
    ) -> Result<Self> {
        let mut graph = ResourceGraph::new(stack);
        let account = AccountContext::bootstrap(&mut graph, settings, images)?;
        Ok(Self {
            graph,
            context: BuildContext::new(account),
        })
    }

    /// Declare a network, its security group and one vswitch per zone
    pub fn create_network_segment<Z, C>(
        &mut self,
        name: &str,
        cidr_block: &str,
        zones: impl IntoIterator<Item = (Z, C)>,
    ) -> Result<&NetworkSegment>
    where
        Z: Into<String>,
        C: Into<String>,
    {
        network::create_network_segment(
            &mut self.graph,
            &mut self.context,
            name,
            cidr_block,
            zones,
        )
    }

    /// Declare an instance with a public address in an existing zone vswitch
    ///
    /// `instance_type` defaults to [`crate::policy::DEFAULT_INSTANCE_TYPE`].
    pub fn create_instance(
        &mut self,
        name: &str,
        network: &str,
        zone: &str,
        instance_type: Option<&str>,
    ) -> Result<&ComputeInstance> {
        instance::create_instance(
            &mut self.graph,
            &mut self.context,
            name,
            network,
            zone,
            instance_type,
        )
    }

    pub fn network(&self, name: &str) -> Option<&NetworkSegment> {
        self.context.tables.networks.get(name)
    }

    pub fn subnet(&self, network: &str, zone: &str) -> Option<&ResourceHandle> {
        self.context.tables.subnets.get(&subnet_key(network, zone))
    }

    pub fn instance(&self, name: &str) -> Option<&ComputeInstance> {
        self.context.tables.instances.get(name)
    }

    pub fn account(&self) -> &AccountContext {
        &self.context.account
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// Hand the finished graph to a synthesizer
    pub fn synthesize(&self, synthesizer: &dyn Synthesizer) -> Result<Artifact> {
        tracing::info!(
            "Synthesizing {} with {}",
            self.graph.stack(),
            synthesizer.name()
        );
        Ok(synthesizer.synthesize(&self.graph)?)
    }

    pub fn into_graph(self) -> ResourceGraph {
        self.graph
    }
}
