//! Network segments: VPC, security group, ingress rule and vswitches

use crate::builder::BuildContext;
use crate::error::Result;
use crate::kinds;
use crate::policy::SSH_INGRESS;
use std::collections::BTreeMap;
use terraloom_graph::{Attributes, GraphError, ResourceGraph, ResourceHandle};

/// A network and everything declared with it
#[derive(Debug, Clone)]
pub struct NetworkSegment {
    pub name: String,
    pub cidr_block: String,
    pub vpc: ResourceHandle,
    pub security_group: ResourceHandle,
    pub ingress_rule: ResourceHandle,
    /// Vswitches keyed by availability zone
    pub subnets: BTreeMap<String, ResourceHandle>,
}

impl NetworkSegment {
    pub fn subnet(&self, zone: &str) -> Option<&ResourceHandle> {
        self.subnets.get(zone)
    }

    /// Number of declarations the segment owns
    pub fn declaration_count(&self) -> usize {
        3 + self.subnets.len()
    }
}

/// Lookup key of the vswitch for `zone` in `network`
pub fn subnet_key(network: &str, zone: &str) -> String {
    format!("{}-{}", network, zone)
}

/// Declare a network segment and register it under `name`
///
/// Declares the VPC, its security group with the SSH ingress rule and one
/// vswitch per `(zone, cidr_block)` entry. A name or vswitch key that is
/// already registered fails with `DuplicateDeclaration` before anything is
/// declared.
pub fn create_network_segment<'a, Z, C>(
    graph: &mut ResourceGraph,
    ctx: &'a mut BuildContext,
    name: &str,
    cidr_block: &str,
    zones: impl IntoIterator<Item = (Z, C)>,
) -> Result<&'a NetworkSegment>
where
    Z: Into<String>,
    C: Into<String>,
{
    if ctx.tables.networks.contains(name) {
        return Err(GraphError::DuplicateDeclaration(name.to_string()).into());
    }

    let zones: Vec<(String, String)> = zones
        .into_iter()
        .map(|(zone, cidr)| (zone.into(), cidr.into()))
        .collect();
    for (zone, _) in &zones {
        let key = subnet_key(name, zone);
        if ctx.tables.subnets.contains(&key) {
            return Err(GraphError::DuplicateDeclaration(key).into());
        }
    }

    let account = &ctx.account;
    let segment = graph.atomically(|graph| -> Result<NetworkSegment> {
        let vpc = graph.declare(
            kinds::VPC,
            format!("vpc-{}", name),
            account.grouped(
                Attributes::new()
                    .with("name", name)
                    .with("cidr_block", cidr_block),
            ),
        )?;

        let security_group = graph.declare(
            kinds::SECURITY_GROUP,
            format!("security-group-{}", name),
            account.grouped(
                Attributes::new()
                    .with("name", name)
                    .with("vpc_id", vpc.output("id")?),
            ),
        )?;

        let ingress_rule = graph.declare(
            kinds::SECURITY_GROUP_RULE,
            format!("security-group-rule-{}", name),
            Attributes::new()
                .with("type", "ingress")
                .with("ip_protocol", SSH_INGRESS.protocol)
                .with("port_range", SSH_INGRESS.port_range())
                .with("cidr_ip", SSH_INGRESS.source)
                .with("security_group_id", security_group.output("id")?),
        )?;

        let mut subnets = BTreeMap::new();
        for (zone, subnet_cidr) in &zones {
            let vswitch = graph.declare(
                kinds::VSWITCH,
                format!("vswitch-{}-{}", name, zone),
                Attributes::new()
                    .with("vpc_id", vpc.output("id")?)
                    .with("cidr_block", subnet_cidr)
                    .with("availability_zone", zone),
            )?;
            subnets.insert(zone.clone(), vswitch);
        }

        Ok(NetworkSegment {
            name: name.to_string(),
            cidr_block: cidr_block.to_string(),
            vpc,
            security_group,
            ingress_rule,
            subnets,
        })
    })?;

    for (zone, vswitch) in &segment.subnets {
        ctx.tables
            .subnets
            .insert(subnet_key(name, zone), vswitch.clone())?;
    }

    tracing::info!(
        "Created network segment {} ({}, {} zones)",
        name,
        cidr_block,
        segment.subnets.len()
    );
    Ok(ctx.tables.networks.insert(name, segment)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TopologyBuilder;
    use crate::error::TopologyError;
    use crate::testing::static_builder;
    use terraloom_graph::Value;

    fn zones(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(z, c)| (z.to_string(), c.to_string()))
            .collect()
    }

    fn graph_len(builder: &TopologyBuilder) -> usize {
        builder.graph().len()
    }

    #[test]
    fn test_declaration_count() {
        for zone_count in 0..4 {
            let mut builder = static_builder();
            let before = graph_len(&builder);

            let entries: Vec<(String, String)> = (0..zone_count)
                .map(|i| (format!("zone-{}", i), format!("172.16.{}.0/21", i * 8)))
                .collect();
            let segment = builder
                .create_network_segment("vpc1", "172.16.0.0/12", entries)
                .unwrap();
            assert_eq!(segment.declaration_count(), 3 + zone_count);

            assert_eq!(graph_len(&builder) - before, 3 + zone_count);
            assert_eq!(
                builder.graph().summary().count("alicloud_security_group_rule"),
                1
            );
        }
    }

    #[test]
    fn test_ingress_rule_attributes() {
        let mut builder = static_builder();
        let rule = builder
            .create_network_segment("vpc1", "172.16.0.0/12", zones(&[]))
            .unwrap()
            .ingress_rule
            .clone();

        let attrs = builder.graph().get(rule.id()).unwrap().attributes().clone();
        assert_eq!(attrs.get("type"), Some(&Value::from("ingress")));
        assert_eq!(attrs.get("ip_protocol"), Some(&Value::from("tcp")));
        assert_eq!(attrs.get("port_range"), Some(&Value::from("22/22")));
        assert_eq!(attrs.get("cidr_ip"), Some(&Value::from("0.0.0.0/0")));
    }

    #[test]
    fn test_subnet_names_are_deterministic() {
        let mut builder = static_builder();
        builder
            .create_network_segment(
                "vpc1",
                "172.16.0.0/12",
                zones(&[("zone-b", "172.16.8.0/21"), ("zone-a", "172.16.0.0/21")]),
            )
            .unwrap();

        let subnet = builder.subnet("vpc1", "zone-a").unwrap();
        assert_eq!(subnet.name(), "vswitch-vpc1-zone-a");
        assert!(builder.graph().lookup("vswitch-vpc1-zone-b").is_some());

        let declaration = builder.graph().get(subnet.id()).unwrap();
        let vpc = &builder.network("vpc1").unwrap().vpc;
        assert_eq!(
            declaration.attributes().get("vpc_id"),
            Some(&Value::from(vpc.output("id").unwrap()))
        );
        assert_eq!(
            declaration.attributes().get("availability_zone"),
            Some(&Value::from("zone-a"))
        );
    }

    #[test]
    fn test_duplicate_network_leaves_graph_unchanged() {
        let mut builder = static_builder();
        builder
            .create_network_segment("vpc1", "172.16.0.0/12", zones(&[("zone-a", "172.16.0.0/21")]))
            .unwrap();
        let before = graph_len(&builder);

        let err = builder
            .create_network_segment("vpc1", "10.0.0.0/8", zones(&[("zone-b", "10.0.0.0/21")]))
            .unwrap_err();
        assert!(matches!(
            err,
            TopologyError::Graph(GraphError::DuplicateDeclaration(_))
        ));
        assert_eq!(graph_len(&builder), before);
        assert!(builder.subnet("vpc1", "zone-b").is_none());
    }

    #[test]
    fn test_subnet_key_collision_is_rejected() {
        let mut builder = static_builder();
        builder
            .create_network_segment("a", "10.0.0.0/8", zones(&[("b-c", "10.0.0.0/21")]))
            .unwrap();
        let before = graph_len(&builder);

        // "a-b" + "c" maps to the same lookup key as "a" + "b-c"
        let err = builder
            .create_network_segment("a-b", "10.0.0.0/8", zones(&[("c", "10.0.8.0/21")]))
            .unwrap_err();
        assert!(matches!(
            err,
            TopologyError::Graph(GraphError::DuplicateDeclaration(key)) if key == "a-b-c"
        ));
        assert_eq!(graph_len(&builder), before);
        assert!(builder.network("a-b").is_none());
    }

    #[test]
    fn test_repeated_zone_rolls_back() {
        let mut builder = static_builder();
        let before = graph_len(&builder);

        let err = builder
            .create_network_segment(
                "vpc1",
                "172.16.0.0/12",
                zones(&[("zone-a", "172.16.0.0/21"), ("zone-a", "172.16.8.0/21")]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            TopologyError::Graph(GraphError::DuplicateDeclaration(_))
        ));
        assert_eq!(graph_len(&builder), before);
        assert!(builder.network("vpc1").is_none());

        // The name is still free after the rollback
        assert!(
            builder
                .create_network_segment("vpc1", "172.16.0.0/12", zones(&[]))
                .is_ok()
        );
    }

    #[test]
    fn test_resource_group_is_applied() {
        let mut builder = static_builder();
        let segment = builder
            .create_network_segment("vpc1", "172.16.0.0/12", zones(&[]))
            .unwrap()
            .clone();

        for handle in [&segment.vpc, &segment.security_group] {
            let attrs = builder.graph().get(handle.id()).unwrap().attributes();
            assert_eq!(
                attrs.get("resource_group_id"),
                Some(&Value::from("rg-test"))
            );
        }
    }
}
