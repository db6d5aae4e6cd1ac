//! Reading a library document back into templates

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::asset::AssetResolver;
use crate::error::{DocumentError, Span};
use crate::template::Template;
use crate::value::{ParamKind, ParamValue, ValueError};

use super::name;
use super::LoadWarning;

/// The result of a successful document read
#[derive(Debug)]
pub struct ParsedDocument {
    pub templates: Vec<Template>,
    pub warnings: Vec<LoadWarning>,
}

/// Parse a library document.
///
/// Fails fatally on anything that is not per-item recoverable; skipped items
/// are reported in [`ParsedDocument::warnings`].
pub fn parse_document(
    source: &str,
    assets: &dyn AssetResolver,
) -> Result<ParsedDocument, DocumentError> {
    let mut reader = Reader::from_str(source);
    reader.trim_text(true);
    let mut doc = DocReader {
        reader,
        assets,
        warnings: Vec::new(),
    };
    let templates = doc.read_library()?;
    Ok(ParsedDocument {
        templates,
        warnings: doc.warnings,
    })
}

struct DocReader<'a> {
    reader: Reader<&'a [u8]>,
    assets: &'a dyn AssetResolver,
    warnings: Vec<LoadWarning>,
}

impl<'a> DocReader<'a> {
    fn read_library(&mut self) -> Result<Vec<Template>, DocumentError> {
        match self.next()? {
            Event::Start(e) if is(&e, name::LIBRARY) => {}
            Event::Empty(e) if is(&e, name::LIBRARY) => {
                self.expect_eof()?;
                return Ok(Vec::new());
            }
            _ => {
                return Err(DocumentError::structure(
                    self.span(),
                    format!("expected root element <{}>", name::LIBRARY),
                ))
            }
        }

        let mut templates: Vec<Template> = Vec::new();
        loop {
            match self.next()? {
                Event::Start(e) if is(&e, name::TEMPLATE) => {
                    let template = self.read_template(&e, true)?;
                    self.collect(&mut templates, template);
                }
                Event::Empty(e) if is(&e, name::TEMPLATE) => {
                    let template = self.read_template(&e, false)?;
                    self.collect(&mut templates, template);
                }
                Event::End(_) => break,
                other => return Err(self.unexpected(&other, name::LIBRARY)),
            }
        }
        self.expect_eof()?;
        Ok(templates)
    }

    fn collect(&mut self, templates: &mut Vec<Template>, template: Template) {
        let path = template.path();
        if templates.iter().any(|t| t.path() == path) {
            self.warnings.push(LoadWarning::DuplicateTemplatePath { path });
        } else {
            templates.push(template);
        }
    }

    fn read_template(
        &mut self,
        start: &BytesStart<'_>,
        has_content: bool,
    ) -> Result<Template, DocumentError> {
        let category = self.require_attr(start, name::CATEGORY)?;
        let tname = self.require_attr(start, name::NAME)?;
        let mut template = Template::new(category, tname);
        if !has_content {
            return Ok(template);
        }
        loop {
            match self.next()? {
                Event::Start(e) if is(&e, name::NODES) => self.read_nodes(&mut template)?,
                Event::Empty(e) if is(&e, name::NODES) => {}
                Event::Start(e) if is(&e, name::CONNECTIONS) => {
                    self.read_connections(&mut template)?
                }
                Event::Empty(e) if is(&e, name::CONNECTIONS) => {}
                Event::End(_) => break,
                other => return Err(self.unexpected(&other, name::TEMPLATE)),
            }
        }
        Ok(template)
    }

    fn read_nodes(&mut self, template: &mut Template) -> Result<(), DocumentError> {
        loop {
            match self.next()? {
                Event::Start(e) if is(&e, name::NODE) => self.read_node(&e, template, true)?,
                Event::Empty(e) if is(&e, name::NODE) => self.read_node(&e, template, false)?,
                Event::End(_) => return Ok(()),
                other => return Err(self.unexpected(&other, name::NODES)),
            }
        }
    }

    fn read_node(
        &mut self,
        start: &BytesStart<'_>,
        template: &mut Template,
        has_content: bool,
    ) -> Result<(), DocumentError> {
        let node = self.require_attr(start, name::NAME)?;
        let context = self.require_attr(start, name::CONTEXT)?;
        template
            .add_context_node(node.as_str(), context)
            .map_err(|e| DocumentError::structure(self.span(), e.to_string()))?;
        if !has_content {
            return Ok(());
        }
        loop {
            match self.next()? {
                Event::Start(e) if is(&e, name::CONTEXT) => {
                    self.read_context_params(template, &node)?
                }
                Event::Empty(e) if is(&e, name::CONTEXT) => {}
                Event::Start(e) if is(&e, name::NODE_BLOCK) => {
                    self.read_node_block(&e, template, &node, true)?
                }
                Event::Empty(e) if is(&e, name::NODE_BLOCK) => {
                    self.read_node_block(&e, template, &node, false)?
                }
                Event::End(_) => return Ok(()),
                other => return Err(self.unexpected(&other, name::NODE)),
            }
        }
    }

    fn read_context_params(
        &mut self,
        template: &mut Template,
        node: &str,
    ) -> Result<(), DocumentError> {
        loop {
            match self.param_event(name::CONTEXT)? {
                Some(e) => {
                    if let Some((param, value)) = self.read_param(&e, template, node)? {
                        template
                            .set_parameter(node, param, value)
                            .map_err(|err| DocumentError::structure(self.span(), err.to_string()))?;
                    }
                }
                None => return Ok(()),
            }
        }
    }

    fn read_node_block(
        &mut self,
        start: &BytesStart<'_>,
        template: &mut Template,
        node: &str,
        has_content: bool,
    ) -> Result<(), DocumentError> {
        let instance = self.require_attr(start, name::NAME)?;
        let block_type = self.require_attr(start, name::BLOCK_NAME)?;
        template
            .add_block(node, instance.as_str(), block_type)
            .map_err(|e| DocumentError::structure(self.span(), e.to_string()))?;
        if !has_content {
            return Ok(());
        }
        loop {
            match self.param_event(name::NODE_BLOCK)? {
                Some(e) => {
                    if let Some((param, value)) = self.read_param(&e, template, node)? {
                        template
                            .set_block_parameter(node, &instance, param, value)
                            .map_err(|err| DocumentError::structure(self.span(), err.to_string()))?;
                    }
                }
                None => return Ok(()),
            }
        }
    }

    /// Next `VFXParamValue` element in a parameter container, or `None` at
    /// the container's end tag
    fn param_event(&mut self, container: &str) -> Result<Option<BytesStart<'a>>, DocumentError> {
        match self.next()? {
            Event::Empty(e) if is(&e, name::PARAM_VALUE) => Ok(Some(e)),
            Event::Start(e) if is(&e, name::PARAM_VALUE) => {
                // tolerate the expanded <VFXParamValue></VFXParamValue> form
                match self.next()? {
                    Event::End(_) => Ok(Some(e)),
                    other => Err(self.unexpected(&other, name::PARAM_VALUE)),
                }
            }
            Event::End(_) => Ok(None),
            other => Err(self.unexpected(&other, container)),
        }
    }

    /// Decode one parameter element; `None` when the parameter is skipped
    /// with a warning
    fn read_param(
        &mut self,
        e: &BytesStart<'_>,
        template: &Template,
        node: &str,
    ) -> Result<Option<(String, ParamValue)>, DocumentError> {
        let param = self.require_attr(e, name::NAME)?;
        let kind_tag = self.require_attr(e, name::TYPE)?;
        let raw = self.require_attr(e, name::VALUE)?;

        let Some(kind) = ParamKind::parse(&kind_tag) else {
            self.warnings.push(LoadWarning::UnknownParamKind {
                template: template.path(),
                node: node.to_string(),
                param,
                kind: kind_tag,
            });
            return Ok(None);
        };
        match ParamValue::parse(kind, &raw, self.assets) {
            Ok(value) => Ok(Some((param, value))),
            Err(ValueError::Asset(_)) => {
                self.warnings.push(LoadWarning::UnresolvedAsset {
                    template: template.path(),
                    node: node.to_string(),
                    param,
                    path: raw,
                });
                Ok(None)
            }
            Err(err) => Err(DocumentError::structure(self.span(), err.to_string())),
        }
    }

    fn read_connections(&mut self, template: &mut Template) -> Result<(), DocumentError> {
        loop {
            let e = match self.next()? {
                Event::Empty(e) if is(&e, name::FLOW_CONNECTION) => e,
                Event::Start(e) if is(&e, name::FLOW_CONNECTION) => {
                    match self.next()? {
                        Event::End(_) => {}
                        other => return Err(self.unexpected(&other, name::FLOW_CONNECTION)),
                    }
                    e
                }
                Event::End(_) => return Ok(()),
                other => return Err(self.unexpected(&other, name::CONNECTIONS)),
            };
            let previous = self.require_attr(&e, name::PREVIOUS)?;
            let next = self.require_attr(&e, name::NEXT)?;
            if template.add_connection(&previous, &next).is_err() {
                self.warnings.push(LoadWarning::UnknownConnectionEndpoint {
                    template: template.path(),
                    previous,
                    next,
                });
            }
        }
    }

    /// Next content event, skipping prolog and comments
    fn next(&mut self) -> Result<Event<'a>, DocumentError> {
        loop {
            match self.reader.read_event() {
                Ok(Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_)) => {
                    continue
                }
                Ok(Event::Text(_) | Event::CData(_)) => {
                    return Err(DocumentError::structure(
                        self.span(),
                        "unexpected text content",
                    ))
                }
                Ok(event) => return Ok(event),
                Err(e) => return Err(DocumentError::syntax(self.span(), e.to_string())),
            }
        }
    }

    fn expect_eof(&mut self) -> Result<(), DocumentError> {
        match self.next()? {
            Event::Eof => Ok(()),
            _ => Err(DocumentError::structure(
                self.span(),
                "content after the root element",
            )),
        }
    }

    fn span(&self) -> Span {
        let pos = self.reader.buffer_position();
        pos.saturating_sub(1)..pos
    }

    fn attr(&self, e: &BytesStart<'_>, key: &str) -> Result<Option<String>, DocumentError> {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| DocumentError::syntax(self.span(), err.to_string()))?;
            if attr.key.as_ref() == key.as_bytes() {
                let value = attr
                    .unescape_value()
                    .map_err(|err| DocumentError::syntax(self.span(), err.to_string()))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn require_attr(&self, e: &BytesStart<'_>, key: &str) -> Result<String, DocumentError> {
        self.attr(e, key)?.ok_or_else(|| {
            DocumentError::structure(
                self.span(),
                format!(
                    "element <{}> is missing attribute '{key}'",
                    String::from_utf8_lossy(e.name().as_ref())
                ),
            )
        })
    }

    fn unexpected(&self, event: &Event<'_>, context: &str) -> DocumentError {
        let what = match event {
            Event::Start(e) | Event::Empty(e) => {
                format!("element <{}>", String::from_utf8_lossy(e.name().as_ref()))
            }
            Event::Eof => "end of document".to_string(),
            other => format!("{other:?}"),
        };
        DocumentError::structure(
            self.span(),
            format!("unexpected {what} in <{context}>"),
        )
    }
}

fn is(e: &BytesStart<'_>, tag: &str) -> bool {
    e.name().as_ref() == tag.as_bytes()
}
