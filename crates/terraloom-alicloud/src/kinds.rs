//! Alibaba Cloud resource kinds and the outputs each one advertises

use terraloom_graph::ResourceKind;

pub const PROVIDER: ResourceKind = ResourceKind::provider("alicloud", "aliyun/alicloud");

pub const IMAGES: ResourceKind = ResourceKind::data("alicloud_images", &["ids", "images"]);

pub const KEY_PAIR: ResourceKind =
    ResourceKind::resource("alicloud_key_pair", &["id", "key_name", "finger_print"]);

pub const VPC: ResourceKind = ResourceKind::resource(
    "alicloud_vpc",
    &["id", "router_id", "route_table_id", "ipv6_cidr_block", "status"],
);

pub const SECURITY_GROUP: ResourceKind = ResourceKind::resource("alicloud_security_group", &["id"]);

pub const SECURITY_GROUP_RULE: ResourceKind =
    ResourceKind::resource("alicloud_security_group_rule", &["id"]);

pub const VSWITCH: ResourceKind = ResourceKind::resource("alicloud_vswitch", &["id", "status"]);

pub const INSTANCE: ResourceKind = ResourceKind::resource(
    "alicloud_instance",
    &["id", "status", "public_ip", "private_ip"],
);

pub const EIP: ResourceKind = ResourceKind::resource("alicloud_eip", &["id", "ip_address", "status"]);

pub const EIP_ASSOCIATION: ResourceKind =
    ResourceKind::resource("alicloud_eip_association", &["id"]);
