//! Building a template from a canvas selection
//!
//! The interactive graph editor hands the core an ordered [`Selection`] of
//! node-like objects and edges; the core needs nothing from them beyond a
//! stable unique name, a context-type identifier, and the current parameter
//! values. Edges whose endpoints are not both part of the selection are
//! silently left out of the template.

use crate::confirm::{Choice, ConfirmProvider};
use crate::template::{Template, TemplateError};
use crate::value::ParamValue;

/// One selected node-like object
#[derive(Debug, Clone)]
pub struct SelectedNode {
    pub name: String,
    pub context_type: String,
    /// Current parameter values, in display order
    pub parameters: Vec<(String, ParamValue)>,
    pub blocks: Vec<SelectedBlock>,
}

/// One block instance carried by a selected node
#[derive(Debug, Clone)]
pub struct SelectedBlock {
    pub instance: String,
    pub block_type: String,
    pub parameters: Vec<(String, ParamValue)>,
}

/// One selected edge, naming two selected nodes
#[derive(Debug, Clone)]
pub struct SelectedEdge {
    pub previous: String,
    pub next: String,
}

/// Everything the authoring layer selected
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub nodes: Vec<SelectedNode>,
    pub edges: Vec<SelectedEdge>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Build a template from a selection.
///
/// An empty selection asks the confirmation capability whether to abandon
/// (`None`) or deliberately produce an empty template. Parameter values are
/// cloned, so the template shares no state with the live graph.
pub fn template_from_selection(
    category: impl Into<String>,
    name: impl Into<String>,
    selection: &Selection,
    confirm: &dyn ConfirmProvider,
) -> Result<Option<Template>, TemplateError> {
    if selection.is_empty() {
        let choice = confirm.confirm(
            "Warning",
            "Selection is empty. Are you sure you want to continue?",
            "Break",
            "Continue",
        );
        if choice == Choice::Primary {
            return Ok(None);
        }
    }

    let mut template = Template::new(category, name);
    for node in &selection.nodes {
        template.add_context_node(node.name.as_str(), node.context_type.as_str())?;
        for (param, value) in &node.parameters {
            template.set_parameter(&node.name, param.as_str(), value.clone())?;
        }
        for block in &node.blocks {
            template.add_block(&node.name, block.instance.as_str(), block.block_type.as_str())?;
            for (param, value) in &block.parameters {
                template.set_block_parameter(
                    &node.name,
                    &block.instance,
                    param.as_str(),
                    value.clone(),
                )?;
            }
        }
    }
    for edge in &selection.edges {
        if template.node(&edge.previous).is_some() && template.node(&edge.next).is_some() {
            template.add_connection(&edge.previous, &edge.next)?;
        }
    }
    Ok(Some(template))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AlwaysAlternative, AlwaysPrimary};
    use crate::value::{ParamValue, Vector3};

    fn sample_selection() -> Selection {
        Selection {
            nodes: vec![
                SelectedNode {
                    name: "Init".to_string(),
                    context_type: "InitializeParticle".to_string(),
                    parameters: vec![("Lifetime".to_string(), ParamValue::Float(2.5))],
                    blocks: vec![SelectedBlock {
                        instance: "Color".to_string(),
                        block_type: "SetColor".to_string(),
                        parameters: vec![(
                            "Color".to_string(),
                            ParamValue::Float3(Vector3::new(1.0, 0.0, 0.0)),
                        )],
                    }],
                },
                SelectedNode {
                    name: "Update".to_string(),
                    context_type: "UpdateParticle".to_string(),
                    parameters: vec![],
                    blocks: vec![],
                },
            ],
            edges: vec![
                SelectedEdge {
                    previous: "Init".to_string(),
                    next: "Update".to_string(),
                },
                SelectedEdge {
                    previous: "Update".to_string(),
                    next: "Outside".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_builds_nodes_blocks_and_connections() {
        let template =
            template_from_selection("Spawn", "FromCanvas", &sample_selection(), &AlwaysPrimary)
                .expect("Should build")
                .expect("Should not be abandoned");
        assert_eq!(template.node_count(), 2);
        let init = template.node("Init").expect("Should have node");
        assert!(init.parameter("Lifetime").is_some());
        assert!(init.block("Color").is_some());
        // the edge leaving the selection is dropped
        assert_eq!(template.connections().len(), 1);
    }

    #[test]
    fn test_empty_selection_can_be_abandoned() {
        let result =
            template_from_selection("Spawn", "Empty", &Selection::default(), &AlwaysPrimary)
                .expect("Should not error");
        assert!(result.is_none());
    }

    #[test]
    fn test_empty_selection_can_continue() {
        let template =
            template_from_selection("Spawn", "Empty", &Selection::default(), &AlwaysAlternative)
                .expect("Should not error")
                .expect("Should produce a template");
        assert_eq!(template.node_count(), 0);
    }
}
