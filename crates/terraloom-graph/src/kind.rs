//! Resource kind descriptors

use serde::Serialize;

/// Which top-level block a declaration is synthesized into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Provider configuration (`provider` block)
    Provider,
    /// Read-only lookup (`data` block)
    Data,
    /// Managed resource (`resource` block)
    Resource,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Provider => write!(f, "provider"),
            Category::Data => write!(f, "data"),
            Category::Resource => write!(f, "resource"),
        }
    }
}

/// Static description of a declarable kind
///
/// A kind advertises the output attributes that other declarations may
/// reference. Referencing anything else is rejected at declaration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceKind {
    /// Provider type name (e.g. "alicloud_vpc")
    pub type_name: &'static str,

    /// Block the declaration belongs to
    pub category: Category,

    /// Attributes resolvable after apply
    pub outputs: &'static [&'static str],

    /// Registry source, only meaningful for providers (e.g. "aliyun/alicloud")
    pub source: Option<&'static str>,
}

impl ResourceKind {
    pub const fn resource(type_name: &'static str, outputs: &'static [&'static str]) -> Self {
        Self {
            type_name,
            category: Category::Resource,
            outputs,
            source: None,
        }
    }

    pub const fn data(type_name: &'static str, outputs: &'static [&'static str]) -> Self {
        Self {
            type_name,
            category: Category::Data,
            outputs,
            source: None,
        }
    }

    pub const fn provider(type_name: &'static str, source: &'static str) -> Self {
        Self {
            type_name,
            category: Category::Provider,
            outputs: &[],
            source: Some(source),
        }
    }

    /// Whether `attribute` is one of this kind's outputs
    pub fn advertises(&self, attribute: &str) -> bool {
        self.outputs.contains(&attribute)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.category, self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VPC: ResourceKind = ResourceKind::resource("test_vpc", &["id", "router_id"]);

    #[test]
    fn test_advertises() {
        assert!(VPC.advertises("id"));
        assert!(VPC.advertises("router_id"));
        assert!(!VPC.advertises("cidr_block"));
    }

    #[test]
    fn test_provider_has_no_outputs() {
        let provider = ResourceKind::provider("test", "example/test");
        assert_eq!(provider.category, Category::Provider);
        assert!(!provider.advertises("id"));
        assert_eq!(provider.source, Some("example/test"));
    }

    #[test]
    fn test_display() {
        assert_eq!(VPC.to_string(), "resource test_vpc");
    }
}
