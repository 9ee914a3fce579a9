//! Fixed sizing and access policy applied to every topology

/// Instance type used when none is given
pub const DEFAULT_INSTANCE_TYPE: &str = "ecs.t5-lc2m1.nano";

/// System disk size of every instance, in GB
pub const SYSTEM_DISK_SIZE_GB: i64 = 20;

/// Public address bandwidth, in Mbps
pub const EIP_BANDWIDTH_MBPS: i64 = 5;

pub const EIP_CHARGE_TYPE: &str = "PayByTraffic";

/// The single ingress rule attached to every security group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngressRule {
    pub protocol: &'static str,
    pub port: u16,
    pub source: &'static str,
}

impl IngressRule {
    /// Port range in "from/to" notation
    pub fn port_range(&self) -> String {
        format!("{}/{}", self.port, self.port)
    }
}

pub const SSH_INGRESS: IngressRule = IngressRule {
    protocol: "tcp",
    port: 22,
    source: "0.0.0.0/0",
};
