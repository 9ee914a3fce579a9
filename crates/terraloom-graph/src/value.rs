//! Attribute values and deferred references

use serde::Serialize;
use std::collections::BTreeMap;

/// Identity of a declaration inside a specific graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId {
    pub(crate) graph: u64,
    pub(crate) index: usize,
}

impl NodeId {
    /// Position of the declaration in its graph
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Placeholder for an attribute of another declaration, resolved at apply time
///
/// The value is never materialized while the graph is being built; the
/// synthesizer renders it as an interpolation expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    pub(crate) node: NodeId,
    pub(crate) address: String,
    pub(crate) attribute: String,
    pub(crate) path: Vec<String>,
}

impl Reference {
    /// Declaration that produces the value
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Address of the producer (e.g. "alicloud_vpc.vpc-main")
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Output attribute on the producer
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Select an element of a list-valued output
    pub fn index(mut self, index: usize) -> Self {
        self.path.push(index.to_string());
        self
    }

    /// Select a field of an object-valued output
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.path.push(name.into());
        self
    }

    /// Interpolation expression understood by the apply engine
    pub fn expression(&self) -> String {
        let mut expr = format!("${{{}.{}", self.address, self.attribute);
        for segment in &self.path {
            expr.push('.');
            expr.push_str(segment);
        }
        expr.push('}');
        expr
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.expression())
    }
}

/// Input attribute value: a literal or a reference
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(i64),
    String(String),
    List(Vec<Value>),
    Block(BTreeMap<String, Value>),
    Ref(Reference),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// All references nested in this value, depth first
    pub fn references(&self) -> Vec<&Reference> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references<'a>(&'a self, found: &mut Vec<&'a Reference>) {
        match self {
            Value::Ref(r) => found.push(r),
            Value::List(items) => items.iter().for_each(|v| v.collect_references(found)),
            Value::Block(fields) => fields.values().for_each(|v| v.collect_references(found)),
            _ => {}
        }
    }

    /// Render as JSON, turning references into interpolation strings
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::json!(b),
            Value::Number(n) => serde_json::json!(n),
            Value::String(s) => serde_json::json!(s),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Block(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Ref(r) => serde_json::json!(r.expression()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Reference> for Value {
    fn from(r: Reference) -> Self {
        Value::Ref(r)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Attributes> for Value {
    fn from(attrs: Attributes) -> Self {
        Value::Block(attrs.0)
    }
}

/// Ordered attribute map of a declaration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set only when `value` is present
    pub fn with_opt(self, key: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn references(&self) -> Vec<&Reference> {
        self.0.values().flat_map(Value::references).collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}
