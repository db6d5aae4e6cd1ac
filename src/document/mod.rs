//! The library document format
//!
//! Templates persist as a hierarchical XML document:
//!
//! ```text
//! <Library>
//!   <Template Category="..." Name="...">
//!     <Nodes>
//!       <Node Name="..." Context="...">
//!         <Context>
//!           <VFXParamValue Name="..." Type="..." Value="..."/>
//!         </Context>
//!         <NodeBlock Name="..." BlockName="...">
//!           <VFXParamValue Name="..." Type="..." Value="..."/>
//!         </NodeBlock>
//!       </Node>
//!     </Nodes>
//!     <Connections>
//!       <FlowConnection Previous="..." Next="..."/>
//!     </Connections>
//!   </Template>
//! </Library>
//! ```
//!
//! Element and attribute names are contractual. Reading tolerates two kinds
//! of per-item damage without aborting, reported as [`LoadWarning`]s: a
//! parameter with an unrecognized `Type` tag, and a connection naming a node
//! the template does not contain. Everything else that deviates from the
//! shape above is fatal ([`DocumentError`](crate::error::DocumentError)).

mod reader;
mod writer;

pub use reader::{parse_document, ParsedDocument};
pub use writer::write_document;

use std::fmt;

/// Contractual element and attribute names
pub(crate) mod name {
    pub const LIBRARY: &str = "Library";
    pub const TEMPLATE: &str = "Template";
    pub const NODES: &str = "Nodes";
    pub const NODE: &str = "Node";
    // both the per-node parameter container element and the Node attribute
    pub const CONTEXT: &str = "Context";
    pub const NODE_BLOCK: &str = "NodeBlock";
    pub const PARAM_VALUE: &str = "VFXParamValue";
    pub const CONNECTIONS: &str = "Connections";
    pub const FLOW_CONNECTION: &str = "FlowConnection";
    pub const CATEGORY: &str = "Category";
    pub const NAME: &str = "Name";
    pub const TYPE: &str = "Type";
    pub const VALUE: &str = "Value";
    pub const BLOCK_NAME: &str = "BlockName";
    pub const PREVIOUS: &str = "Previous";
    pub const NEXT: &str = "Next";
}

/// A recoverable per-item problem found while reading a document.
///
/// Warnings never abort a load; the offending item is skipped and everything
/// around it is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A parameter whose `Type` attribute names no known kind
    UnknownParamKind {
        template: String,
        node: String,
        param: String,
        kind: String,
    },

    /// A texture parameter whose asset path did not resolve
    UnresolvedAsset {
        template: String,
        node: String,
        param: String,
        path: String,
    },

    /// A connection naming a node absent from the template
    UnknownConnectionEndpoint {
        template: String,
        previous: String,
        next: String,
    },

    /// A template whose path collides with an earlier one in the document
    DuplicateTemplatePath { path: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::UnknownParamKind {
                template,
                node,
                param,
                kind,
            } => write!(
                f,
                "skipping parameter '{param}' on node '{node}' of template '{template}': unknown type '{kind}'"
            ),
            LoadWarning::UnresolvedAsset {
                template,
                node,
                param,
                path,
            } => write!(
                f,
                "skipping parameter '{param}' on node '{node}' of template '{template}': asset '{path}' did not resolve"
            ),
            LoadWarning::UnknownConnectionEndpoint {
                template,
                previous,
                next,
            } => write!(
                f,
                "skipping connection {previous} -> {next} in template '{template}': unknown endpoint"
            ),
            LoadWarning::DuplicateTemplatePath { path } => {
                write!(f, "skipping template with duplicate path '{path}'")
            }
        }
    }
}
