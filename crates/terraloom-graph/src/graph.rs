//! Resource graph: named declarations and the handles that point at them

use crate::error::{GraphError, Result};
use crate::kind::{Category, ResourceKind};
use crate::value::{Attributes, NodeId, Reference};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a declaration in a graph
///
/// Handles compare by identity: two handles are equal only when they point at
/// the same declaration, regardless of attributes.
#[derive(Debug, Clone)]
pub struct ResourceHandle {
    id: NodeId,
    kind: ResourceKind,
    name: String,
}

impl ResourceHandle {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Logical name, unique within the graph
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address used in interpolation expressions
    pub fn address(&self) -> String {
        match self.kind.category {
            Category::Data => format!("data.{}.{}", self.kind.type_name, self.name),
            Category::Resource => format!("{}.{}", self.kind.type_name, self.name),
            Category::Provider => self.kind.type_name.to_string(),
        }
    }

    /// Reference to an output attribute
    pub fn output(&self, attribute: &str) -> Result<Reference> {
        if !self.kind.advertises(attribute) {
            return Err(GraphError::UnknownAttribute {
                kind: self.kind.to_string(),
                attribute: attribute.to_string(),
            });
        }
        Ok(self.reference(attribute))
    }

    /// References for every output advertised by the kind
    pub fn outputs(&self) -> Vec<Reference> {
        self.kind
            .outputs
            .iter()
            .map(|attribute| self.reference(attribute))
            .collect()
    }

    /// Whether both handles refer to the same declaration
    pub fn same_declaration(&self, other: &ResourceHandle) -> bool {
        self.id == other.id
    }

    fn reference(&self, attribute: &str) -> Reference {
        Reference {
            node: self.id,
            address: self.address(),
            attribute: attribute.to_string(),
            path: Vec::new(),
        }
    }
}

impl PartialEq for ResourceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_declaration(other)
    }
}

impl Eq for ResourceHandle {}

impl std::hash::Hash for ResourceHandle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A declaration as stored in the graph
#[derive(Debug, Clone)]
pub struct Declaration {
    handle: ResourceHandle,
    attributes: Attributes,
}

impl Declaration {
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn kind(&self) -> ResourceKind {
        self.handle.kind()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Append-only graph of declarations for one stack
#[derive(Debug)]
pub struct ResourceGraph {
    id: u64,
    stack: String,
    nodes: Vec<Declaration>,
    names: HashMap<String, NodeId>,
}

impl ResourceGraph {
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            stack: stack.into(),
            nodes: Vec::new(),
            names: HashMap::new(),
        }
    }

    /// Name of the stack this graph is synthesized as
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// Declare a typed resource under a unique logical name
    ///
    /// Every reference in `attributes` must point at a declaration of this
    /// graph and name an attribute its kind advertises. Nothing is inserted
    /// when validation fails.
    pub fn declare(
        &mut self,
        kind: ResourceKind,
        name: impl Into<String>,
        attributes: Attributes,
    ) -> Result<ResourceHandle> {
        let name = name.into();
        validate_name(&name)?;

        if self.names.contains_key(&name) {
            return Err(GraphError::DuplicateDeclaration(name));
        }

        for reference in attributes.references() {
            self.check_reference(reference)?;
        }

        let id = NodeId {
            graph: self.id,
            index: self.nodes.len(),
        };
        let handle = ResourceHandle {
            id,
            kind,
            name: name.clone(),
        };

        tracing::debug!("Declared {} {}", kind.type_name, name);
        self.nodes.push(Declaration {
            handle: handle.clone(),
            attributes,
        });
        self.names.insert(name, id);

        Ok(handle)
    }

    fn check_reference(&self, reference: &Reference) -> Result<()> {
        let producer = (reference.node.graph == self.id)
            .then(|| self.nodes.get(reference.node.index))
            .flatten()
            .ok_or_else(|| GraphError::ForeignReference(reference.expression()))?;

        if !producer.kind().advertises(&reference.attribute) {
            return Err(GraphError::UnknownAttribute {
                kind: producer.kind().to_string(),
                attribute: reference.attribute.clone(),
            });
        }
        Ok(())
    }

    /// Run a group of declarations as a unit
    ///
    /// If `f` fails, every declaration it made is removed again and the graph
    /// is back at the state it had before the call.
    pub fn atomically<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let checkpoint = self.nodes.len();
        let result = f(self);
        if result.is_err() {
            self.rollback(checkpoint);
        }
        result
    }

    fn rollback(&mut self, checkpoint: usize) {
        let discarded = self.nodes.len().saturating_sub(checkpoint);
        for declaration in self.nodes.drain(checkpoint..) {
            self.names.remove(declaration.name());
        }
        if discarded > 0 {
            tracing::debug!("Rolled back {} declarations", discarded);
        }
    }

    /// Handle of the declaration registered under `name`
    pub fn lookup(&self, name: &str) -> Option<&ResourceHandle> {
        self.names
            .get(name)
            .and_then(|id| self.nodes.get(id.index))
            .map(Declaration::handle)
    }

    pub fn get(&self, id: NodeId) -> Option<&Declaration> {
        if id.graph != self.id {
            return None;
        }
        self.nodes.get(id.index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Declarations in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.nodes.iter()
    }

    pub fn by_type(&self, type_name: &str) -> Vec<&Declaration> {
        self.nodes
            .iter()
            .filter(|d| d.kind().type_name == type_name)
            .collect()
    }

    pub fn summary(&self) -> GraphSummary {
        let mut by_type = BTreeMap::new();
        for declaration in &self.nodes {
            *by_type
                .entry(declaration.kind().type_name.to_string())
                .or_insert(0) += 1;
        }
        GraphSummary {
            total: self.nodes.len(),
            by_type,
        }
    }
}

/// Logical names end up in interpolation addresses, so they are restricted
/// to identifier characters. Stack names follow the same rule since they
/// become a directory under the output root.
pub fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(GraphError::InvalidName(name.to_string()))
    }
}

/// Declaration counts of a graph
#[derive(Debug, Clone)]
pub struct GraphSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
}

impl GraphSummary {
    pub fn count(&self, type_name: &str) -> usize {
        self.by_type.get(type_name).copied().unwrap_or(0)
    }
}

impl std::fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} declarations", self.total)?;
        if !self.by_type.is_empty() {
            let parts: Vec<String> = self
                .by_type
                .iter()
                .map(|(type_name, count)| format!("{} {}", count, type_name))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}
