//! Compute instances with a public address

use crate::builder::BuildContext;
use crate::error::{Result, TopologyError};
use crate::kinds;
use crate::network::subnet_key;
use crate::policy::{DEFAULT_INSTANCE_TYPE, EIP_BANDWIDTH_MBPS, EIP_CHARGE_TYPE, SYSTEM_DISK_SIZE_GB};
use terraloom_graph::{Attributes, GraphError, ResourceGraph, ResourceHandle, Value};

/// An instance and its public address
#[derive(Debug, Clone)]
pub struct ComputeInstance {
    pub name: String,
    pub network: String,
    pub zone: String,
    pub instance_type: String,
    pub instance: ResourceHandle,
    pub eip: ResourceHandle,
    pub association: ResourceHandle,
    /// Vswitch the instance was placed in
    pub vswitch: ResourceHandle,
    pub security_group: ResourceHandle,
}

/// Declare an instance in the `zone` vswitch of `network`
///
/// The network segment and the zone's vswitch must already be registered;
/// otherwise this fails with `UnknownSegment` and declares nothing.
pub fn create_instance<'a>(
    graph: &mut ResourceGraph,
    ctx: &'a mut BuildContext,
    name: &str,
    network: &str,
    zone: &str,
    instance_type: Option<&str>,
) -> Result<&'a ComputeInstance> {
    let segment = ctx
        .tables
        .networks
        .get(network)
        .ok_or_else(|| TopologyError::UnknownSegment(network.to_string()))?;
    let key = subnet_key(network, zone);
    let vswitch = ctx
        .tables
        .subnets
        .get(&key)
        .ok_or(TopologyError::UnknownSegment(key))?
        .clone();
    let security_group = segment.security_group.clone();

    if ctx.tables.instances.contains(name) {
        return Err(GraphError::DuplicateDeclaration(name.to_string()).into());
    }

    let instance_type = instance_type.unwrap_or(DEFAULT_INSTANCE_TYPE);
    let account = &ctx.account;

    let created = graph.atomically(|graph| -> Result<ComputeInstance> {
        let instance = graph.declare(
            kinds::INSTANCE,
            format!("instance-{}", name),
            account.grouped(
                Attributes::new()
                    .with("availability_zone", zone)
                    .with(
                        "security_groups",
                        vec![Value::from(security_group.output("id")?)],
                    )
                    .with("instance_type", instance_type)
                    .with("system_disk_size", SYSTEM_DISK_SIZE_GB)
                    .with("image_id", account.image_id().clone())
                    .with("instance_name", name)
                    .with("vswitch_id", vswitch.output("id")?)
                    .with("key_name", account.key_name().clone()),
            ),
        )?;

        let eip = graph.declare(
            kinds::EIP,
            format!("eip-{}", name),
            account.grouped(
                Attributes::new()
                    .with("bandwidth", EIP_BANDWIDTH_MBPS)
                    .with("internet_charge_type", EIP_CHARGE_TYPE),
            ),
        )?;

        let association = graph.declare(
            kinds::EIP_ASSOCIATION,
            format!("eip-association-{}", name),
            Attributes::new()
                .with("allocation_id", eip.output("id")?)
                .with("instance_id", instance.output("id")?),
        )?;

        Ok(ComputeInstance {
            name: name.to_string(),
            network: network.to_string(),
            zone: zone.to_string(),
            instance_type: instance_type.to_string(),
            instance,
            eip,
            association,
            vswitch,
            security_group,
        })
    })?;

    tracing::info!(
        "Created instance {} ({}) in {}/{}",
        name,
        instance_type,
        network,
        zone
    );
    Ok(ctx.tables.instances.insert(name, created)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::static_builder;

    fn builder_with_network() -> crate::builder::TopologyBuilder {
        let mut builder = static_builder();
        builder
            .create_network_segment("vpc1", "172.16.0.0/12", [("zone-a", "172.16.0.0/21")])
            .unwrap();
        builder
    }

    #[test]
    fn test_unknown_network() {
        let mut builder = static_builder();
        let before = builder.graph().len();

        let err = builder.create_instance("i1", "vpc1", "zone-a", None).unwrap_err();
        assert!(matches!(err, TopologyError::UnknownSegment(_)));
        assert_eq!(builder.graph().len(), before);
    }

    #[test]
    fn test_unknown_zone_in_existing_network() {
        let mut builder = builder_with_network();
        let before = builder.graph().len();

        let err = builder.create_instance("i1", "vpc1", "zone-b", None).unwrap_err();
        assert!(matches!(err, TopologyError::UnknownSegment(key) if key == "vpc1-zone-b"));
        assert_eq!(builder.graph().len(), before);
    }

    #[test]
    fn test_instance_adds_three_declarations() {
        let mut builder = builder_with_network();
        let before = builder.graph().len();

        let created = builder
            .create_instance("i1", "vpc1", "zone-a", None)
            .unwrap()
            .clone();
        assert_eq!(builder.graph().len(), before + 3);
        assert_eq!(created.instance.name(), "instance-i1");
        assert_eq!(created.eip.name(), "eip-i1");
        assert_eq!(created.association.name(), "eip-association-i1");
        assert_eq!(created.instance_type, DEFAULT_INSTANCE_TYPE);
    }

    #[test]
    fn test_instance_references_the_zone_subnet() {
        let mut builder = builder_with_network();
        let created = builder
            .create_instance("i1", "vpc1", "zone-a", None)
            .unwrap()
            .clone();

        let subnet = builder.subnet("vpc1", "zone-a").unwrap();
        assert!(created.vswitch.same_declaration(subnet));

        let attrs = builder
            .graph()
            .get(created.instance.id())
            .unwrap()
            .attributes();
        let vswitch_ref = attrs.get("vswitch_id").unwrap().as_reference().unwrap();
        assert_eq!(vswitch_ref.node(), subnet.id());
        assert_eq!(vswitch_ref.expression(), "${alicloud_vswitch.vswitch-vpc1-zone-a.id}");

        let groups = match attrs.get("security_groups") {
            Some(Value::List(groups)) => groups,
            other => panic!("unexpected security_groups: {:?}", other),
        };
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].as_reference().unwrap().node(),
            builder.network("vpc1").unwrap().security_group.id()
        );
    }

    #[test]
    fn test_instance_fixed_sizing_and_shared_account_values() {
        let mut builder = builder_with_network();
        let created = builder
            .create_instance("i1", "vpc1", "zone-a", Some("ecs.g6.large"))
            .unwrap()
            .clone();

        let graph = builder.graph();
        let instance = graph.get(created.instance.id()).unwrap().attributes();
        assert_eq!(instance.get("system_disk_size"), Some(&Value::Number(20)));
        assert_eq!(instance.get("instance_type"), Some(&Value::from("ecs.g6.large")));
        assert_eq!(instance.get("image_id"), Some(&Value::from("m-debian")));
        assert_eq!(instance.get("key_name"), Some(&Value::from("ops")));
        assert_eq!(instance.get("resource_group_id"), Some(&Value::from("rg-test")));

        let eip = graph.get(created.eip.id()).unwrap().attributes();
        assert_eq!(eip.get("bandwidth"), Some(&Value::Number(5)));
        assert_eq!(eip.get("internet_charge_type"), Some(&Value::from("PayByTraffic")));

        let association = graph.get(created.association.id()).unwrap().attributes();
        assert_eq!(
            association.get("allocation_id"),
            Some(&Value::from(created.eip.output("id").unwrap()))
        );
        assert_eq!(
            association.get("instance_id"),
            Some(&Value::from(created.instance.output("id").unwrap()))
        );
    }

    #[test]
    fn test_duplicate_instance() {
        let mut builder = builder_with_network();
        builder.create_instance("i1", "vpc1", "zone-a", None).unwrap();
        let before = builder.graph().len();

        let err = builder.create_instance("i1", "vpc1", "zone-a", None).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::Graph(GraphError::DuplicateDeclaration(_))
        ));
        assert_eq!(builder.graph().len(), before);
    }
}
