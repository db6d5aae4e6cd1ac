//! VFX Templates - reusable node-graph fragments with XML persistence
//!
//! This library models parameterized graph templates (nodes, per-node blocks,
//! typed parameter overrides, directed connections) and persists a collection
//! of them to a structured XML document with full round-trip fidelity.
//!
//! # Example
//!
//! ```rust
//! use vfx_templates::{parse_document, write_document, InMemoryAssets, ParamValue, Template, Vector3};
//!
//! let assets = InMemoryAssets::new();
//!
//! let mut template = Template::new("Spawn", "Basic");
//! template.add_context_node("N1", "InitializeParticle").unwrap();
//! template.set_parameter("N1", "Lifetime", ParamValue::Float(2.5)).unwrap();
//! template.add_block("N1", "B1", "SetColor").unwrap();
//! template
//!     .set_block_parameter("N1", "B1", "Color", ParamValue::Float3(Vector3::new(1.0, 0.0, 0.0)))
//!     .unwrap();
//!
//! let xml = write_document(&[template.clone()], &assets).unwrap();
//! let parsed = parse_document(&xml, &assets).unwrap();
//! assert!(parsed.warnings.is_empty());
//! assert_eq!(parsed.templates, vec![template]);
//! ```
//!
//! Editor-facing collaborators (the canvas, the asset database, confirmation
//! dialogs) stay outside the crate and are injected through the narrow
//! interfaces in [`asset`], [`confirm`], and [`selection`], so everything
//! here runs headlessly.

pub mod asset;
pub mod confirm;
pub mod document;
pub mod error;
pub mod selection;
pub mod template;
pub mod value;

pub use asset::{AssetError, AssetResolver, InMemoryAssets, TextureRef};
pub use confirm::{AlwaysAlternative, AlwaysPrimary, Choice, ConfirmProvider};
pub use document::{parse_document, write_document, LoadWarning, ParsedDocument};
pub use error::DocumentError;
pub use selection::{
    template_from_selection, SelectedBlock, SelectedEdge, SelectedNode, Selection,
};
pub use template::{
    AddOutcome, Connection, ContextNodeInfo, LibraryError, NodeBlockInfo, NodeId, Template,
    TemplateError, TemplateLibrary,
};
pub use value::{ParamKind, ParamValue, ValueError, Vector2, Vector3, Vector4};
