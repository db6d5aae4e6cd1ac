//! Fatal document errors and their source-context formatting

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::asset::AssetError;

/// Byte range in the document text
pub type Span = std::ops::Range<usize>;

/// A document-level failure that aborts a load or save.
///
/// Distinct from the per-item [`LoadWarning`](crate::document::LoadWarning)s,
/// which never abort anything: a `DocumentError` means no library state was
/// produced at all.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document is not well-formed XML
    #[error("malformed document: {message}")]
    Syntax { span: Span, message: String },

    /// Well-formed XML that violates the library document shape
    #[error("invalid document structure: {message}")]
    Structure { span: Span, message: String },

    /// The document could not be built for writing
    #[error("failed to build document: {message}")]
    Build { message: String },

    /// Asset resolution failed while formatting a texture parameter
    #[error(transparent)]
    Asset(#[from] AssetError),
}

impl DocumentError {
    /// Create a well-formedness error at the given byte span
    pub fn syntax(span: Span, message: impl Into<String>) -> Self {
        Self::Syntax {
            span,
            message: message.into(),
        }
    }

    /// Create a document-shape error at the given byte span
    pub fn structure(span: Span, message: impl Into<String>) -> Self {
        Self::Structure {
            span,
            message: message.into(),
        }
    }

    /// Create a write-side error
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::Syntax { span, .. } => Some(span),
            Self::Structure { span, .. } => Some(span),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            Self::Syntax { span, message } | Self::Structure { span, message } => {
                let mut buf = Vec::new();
                Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(message)
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf)
                    .unwrap();
                String::from_utf8(buf).unwrap()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_includes_message_and_context() {
        let source = "<Library><Bogus/></Library>";
        let err = DocumentError::structure(10..17, "unexpected element in Library");
        let report = err.format(source, "TemplateLibrary.txt");
        assert!(report.contains("unexpected element in Library"));
        assert!(report.contains("TemplateLibrary.txt"));
    }

    #[test]
    fn test_span_only_on_parse_errors() {
        assert!(DocumentError::syntax(0..1, "x").span().is_some());
        assert!(DocumentError::build("x").span().is_none());
    }
}
