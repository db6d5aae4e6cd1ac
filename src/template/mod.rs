//! Reusable node-graph templates
//!
//! A [`Template`] is a named, categorized graph fragment: an ordered set of
//! named [`ContextNodeInfo`] nodes, each carrying parameter overrides and
//! block instances, plus an ordered list of directed [`Connection`]s between
//! those nodes. Templates are built either programmatically, from a canvas
//! selection ([`crate::selection`]), or by the document reader, and are owned
//! by a [`TemplateLibrary`].

mod library;
mod node;

pub use library::{AddOutcome, LibraryError, TemplateLibrary};
pub use node::{ContextNodeInfo, NodeBlockInfo, NodeId};

use std::collections::HashMap;

use indexmap::IndexMap;
use thiserror::Error;

use crate::value::ParamValue;

/// Errors from template construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// No node with the given name in this template
    #[error("node not found: {name}")]
    NodeNotFound { name: String },

    /// No block with the given instance name on the node
    #[error("block '{instance}' not found on node '{node}'")]
    BlockNotFound { node: String, instance: String },

    /// A node with the given name already exists
    #[error("duplicate node name: {name}")]
    DuplicateNode { name: String },

    /// The instance name is already used on the node
    #[error("duplicate block instance '{instance}' on node '{node}'")]
    DuplicateBlock { node: String, instance: String },
}

/// A directed edge between two nodes of the same template.
///
/// Endpoints are stable [`NodeId`] handles, valid only within the owning
/// template; [`Template::node_name`] recovers the node names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub previous: NodeId,
    pub next: NodeId,
}

/// A named, categorized graph fragment
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    category: String,
    name: String,
    nodes: IndexMap<String, ContextNodeInfo>,
    names: HashMap<NodeId, String>,
    connections: Vec<Connection>,
    next_id: u32,
}

impl Template {
    /// Create an empty template under `category`/`name`
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            nodes: IndexMap::new(),
            names: HashMap::new(),
            connections: Vec::new(),
            next_id: 0,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The library-unique identifier, `category + "/" + name`
    pub fn path(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }

    /// Insert a new node with the given context type.
    ///
    /// Returns the node's stable handle; fails if the name is taken.
    pub fn add_context_node(
        &mut self,
        name: impl Into<String>,
        context_type: impl Into<String>,
    ) -> Result<NodeId, TemplateError> {
        let name = name.into();
        if self.nodes.contains_key(&name) {
            return Err(TemplateError::DuplicateNode { name });
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.names.insert(id, name.clone());
        self.nodes.insert(name, ContextNodeInfo::new(id, context_type));
        Ok(id)
    }

    /// Insert or replace a parameter override on a node
    pub fn set_parameter(
        &mut self,
        node: &str,
        param: impl Into<String>,
        value: ParamValue,
    ) -> Result<(), TemplateError> {
        self.node_mut(node)?.set_parameter(param, value);
        Ok(())
    }

    /// Append a new block instance to a node.
    ///
    /// Fails if the node is absent or the instance name is already used on it.
    pub fn add_block(
        &mut self,
        node: &str,
        instance: impl Into<String>,
        block_type: impl Into<String>,
    ) -> Result<(), TemplateError> {
        let instance = instance.into();
        let info = self.node_mut(node)?;
        if info.has_block(&instance) {
            return Err(TemplateError::DuplicateBlock {
                node: node.to_string(),
                instance,
            });
        }
        info.insert_block(instance, block_type);
        Ok(())
    }

    /// Insert or replace a parameter override on a block instance
    pub fn set_block_parameter(
        &mut self,
        node: &str,
        instance: &str,
        param: impl Into<String>,
        value: ParamValue,
    ) -> Result<(), TemplateError> {
        let info = self.node_mut(node)?;
        let block = info
            .block_mut(instance)
            .ok_or_else(|| TemplateError::BlockNotFound {
                node: node.to_string(),
                instance: instance.to_string(),
            })?;
        block.set_parameter(param, value);
        Ok(())
    }

    /// Append a directed connection between two existing nodes
    pub fn add_connection(&mut self, previous: &str, next: &str) -> Result<(), TemplateError> {
        let previous = self
            .node(previous)
            .ok_or_else(|| TemplateError::NodeNotFound {
                name: previous.to_string(),
            })?
            .id();
        let next = self
            .node(next)
            .ok_or_else(|| TemplateError::NodeNotFound {
                name: next.to_string(),
            })?
            .id();
        self.connections.push(Connection { previous, next });
        Ok(())
    }

    /// Look up a node by name
    pub fn node(&self, name: &str) -> Option<&ContextNodeInfo> {
        self.nodes.get(name)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &ContextNodeInfo)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The connections in append order
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// The name a node handle was created under
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.names.get(&id).map(|s| s.as_str())
    }

    fn node_mut(&mut self, name: &str) -> Result<&mut ContextNodeInfo, TemplateError> {
        self.nodes
            .get_mut(name)
            .ok_or_else(|| TemplateError::NodeNotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ParamValue, Vector3};

    #[test]
    fn test_path_joins_category_and_name() {
        let t = Template::new("Spawn", "Basic");
        assert_eq!(t.path(), "Spawn/Basic");
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut t = Template::new("Spawn", "Basic");
        t.add_context_node("N1", "InitializeParticle")
            .expect("First insert should succeed");
        let err = t
            .add_context_node("N1", "UpdateParticle")
            .expect_err("Second insert should conflict");
        assert_eq!(
            err,
            TemplateError::DuplicateNode {
                name: "N1".to_string()
            }
        );
    }

    #[test]
    fn test_set_parameter_requires_node() {
        let mut t = Template::new("Spawn", "Basic");
        let err = t
            .set_parameter("missing", "Lifetime", ParamValue::Float(1.0))
            .expect_err("Should not find node");
        assert!(matches!(err, TemplateError::NodeNotFound { .. }));
    }

    #[test]
    fn test_duplicate_block_rejected() {
        let mut t = Template::new("Spawn", "Basic");
        t.add_context_node("N1", "InitializeParticle")
            .expect("Should add node");
        t.add_block("N1", "B1", "SetColor").expect("Should add block");
        let err = t
            .add_block("N1", "B1", "SetVelocity")
            .expect_err("Instance name should conflict");
        assert!(matches!(err, TemplateError::DuplicateBlock { .. }));
    }

    #[test]
    fn test_block_parameter_requires_block() {
        let mut t = Template::new("Spawn", "Basic");
        t.add_context_node("N1", "InitializeParticle")
            .expect("Should add node");
        let err = t
            .set_block_parameter("N1", "B1", "Color", ParamValue::Float3(Vector3::new(1.0, 0.0, 0.0)))
            .expect_err("Should not find block");
        assert!(matches!(err, TemplateError::BlockNotFound { .. }));
    }

    #[test]
    fn test_connection_requires_both_endpoints() {
        let mut t = Template::new("Spawn", "Basic");
        t.add_context_node("N1", "InitializeParticle")
            .expect("Should add node");
        let err = t
            .add_connection("N1", "N2")
            .expect_err("Missing endpoint should fail");
        assert_eq!(
            err,
            TemplateError::NodeNotFound {
                name: "N2".to_string()
            }
        );
        assert!(t.connections().is_empty());
    }

    #[test]
    fn test_connection_endpoints_resolve_to_unique_names() {
        let mut t = Template::new("Flow", "Chain");
        t.add_context_node("A", "InitializeParticle")
            .expect("Should add node");
        t.add_context_node("B", "UpdateParticle")
            .expect("Should add node");
        t.add_context_node("C", "QuadOutput").expect("Should add node");
        t.add_connection("A", "B").expect("Should connect");
        t.add_connection("B", "C").expect("Should connect");

        for c in t.connections() {
            let prev = t.node_name(c.previous).expect("Previous should resolve");
            let next = t.node_name(c.next).expect("Next should resolve");
            assert_eq!(t.node(prev).expect("Should exist").id(), c.previous);
            assert_eq!(t.node(next).expect("Should exist").id(), c.next);
        }
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let mut t = Template::new("Flow", "Chain");
        t.add_context_node("Z", "InitializeParticle")
            .expect("Should add node");
        t.add_context_node("A", "UpdateParticle")
            .expect("Should add node");
        let names: Vec<&str> = t.nodes().map(|(n, _)| n).collect();
        assert_eq!(names, ["Z", "A"]);
    }
}
