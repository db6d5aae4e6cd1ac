//! Graph nodes and their parameter-carrying blocks

use indexmap::IndexMap;

use crate::value::ParamValue;

/// Stable handle for a node within its owning template.
///
/// Assigned once at node creation and carried by every connection that
/// references the node, so edges never depend on reference identity and
/// serialization recovers node names without scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// A named sub-block attached to a node.
///
/// Holds the block-type identifier and a sparse map of parameter overrides;
/// parameters left at their defaults are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBlockInfo {
    block_type: String,
    overrides: IndexMap<String, ParamValue>,
}

impl NodeBlockInfo {
    pub(crate) fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            overrides: IndexMap::new(),
        }
    }

    /// The block kind this instance was created from
    pub fn block_type(&self) -> &str {
        &self.block_type
    }

    /// Look up one override
    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.overrides.get(name)
    }

    /// All overrides in insertion order
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn set_parameter(&mut self, name: impl Into<String>, value: ParamValue) {
        self.overrides.insert(name.into(), value);
    }
}

/// A graph node: one context stage plus its blocks and parameter overrides
#[derive(Debug, Clone, PartialEq)]
pub struct ContextNodeInfo {
    id: NodeId,
    context_type: String,
    blocks: IndexMap<String, NodeBlockInfo>,
    overrides: IndexMap<String, ParamValue>,
}

impl ContextNodeInfo {
    pub(crate) fn new(id: NodeId, context_type: impl Into<String>) -> Self {
        Self {
            id,
            context_type: context_type.into(),
            blocks: IndexMap::new(),
            overrides: IndexMap::new(),
        }
    }

    /// The node's stable handle within its template
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The context-type identifier
    pub fn context_type(&self) -> &str {
        &self.context_type
    }

    /// Look up one of the node's own overrides
    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.overrides.get(name)
    }

    /// The node's own overrides in insertion order
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up a block by instance name
    pub fn block(&self, instance: &str) -> Option<&NodeBlockInfo> {
        self.blocks.get(instance)
    }

    /// All blocks in insertion order
    pub fn blocks(&self) -> impl Iterator<Item = (&str, &NodeBlockInfo)> {
        self.blocks.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn has_block(&self, instance: &str) -> bool {
        self.blocks.contains_key(instance)
    }

    pub(crate) fn insert_block(&mut self, instance: impl Into<String>, block_type: impl Into<String>) {
        self.blocks.insert(instance.into(), NodeBlockInfo::new(block_type));
    }

    pub(crate) fn block_mut(&mut self, instance: &str) -> Option<&mut NodeBlockInfo> {
        self.blocks.get_mut(instance)
    }

    pub(crate) fn set_parameter(&mut self, name: impl Into<String>, value: ParamValue) {
        self.overrides.insert(name.into(), value);
    }
}
