use xmlparser::{ElementEnd, StrSpan, Token, Tokenizer};

use crate::document::{Document, Node};
use crate::encoding::decode;
use crate::entity::parse_entities;
use crate::error::Error;
use crate::namespace::NamespaceId;
use crate::prefix::PrefixId;
use crate::xmlvalue::{Element, Text, Value};

// an element whose start tag is still being read: its namespace can only be
// resolved once all its attributes (and so its declarations) are known
struct PendingElement<'a> {
    prefix: &'a str,
    local: &'a str,
    declarations: Vec<(&'a str, &'a str)>,
    attributes: Vec<(&'a str, &'a str, &'a str)>,
}

struct OpenElement<'a> {
    node: Node,
    prefix: &'a str,
    local: &'a str,
}

struct DocumentBuilder<'a> {
    document: Document,
    current: Node,
    open: Vec<OpenElement<'a>>,
    pending: Option<PendingElement<'a>>,
    // prefix bindings in scope, innermost last
    bindings: Vec<(PrefixId, NamespaceId)>,
    // for each open element, how many bindings it pushed
    binding_counts: Vec<usize>,
    dtd_start: Option<usize>,
    // where the last top-level item ended
    top_level_end: usize,
}

impl<'a> DocumentBuilder<'a> {
    fn new() -> Self {
        let document = Document::empty();
        let bindings = vec![
            (document.empty_prefix_id, document.no_namespace_id),
            (document.xml_prefix_id, document.xml_namespace_id),
        ];
        DocumentBuilder {
            current: document.root(),
            document,
            open: Vec::new(),
            pending: None,
            bindings,
            binding_counts: Vec::new(),
            dtd_start: None,
            top_level_end: 0,
        }
    }

    fn lookup(&self, prefix_id: PrefixId) -> Option<NamespaceId> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| *bound == prefix_id)
            .map(|(_, namespace_id)| *namespace_id)
    }

    fn resolve(&mut self, prefix: &str) -> Result<(PrefixId, NamespaceId), Error> {
        let prefix_id = self.document.add_prefix(prefix);
        let namespace_id = self
            .lookup(prefix_id)
            .ok_or_else(|| Error::UnknownPrefix(prefix.to_string()))?;
        Ok((prefix_id, namespace_id))
    }

    fn at_top_level(&self) -> bool {
        self.open.is_empty()
    }

    // remember the whitespace between the previous top-level item and this one
    fn top_level_start(&mut self, xml: &str, start: usize) {
        let gap = xml.get(self.top_level_end..start).unwrap_or_default();
        self.document.prolog.gaps.push(gap.to_string());
    }

    fn top_level_item(&mut self, xml: &str, span: StrSpan) {
        self.top_level_start(xml, span.start());
        self.top_level_end = span.end();
    }

    fn attach(&mut self, node: Node) -> Result<(), Error> {
        self.current
            .get()
            .checked_append(node.get(), self.document.arena_mut())?;
        Ok(())
    }

    fn element_start(&mut self, prefix: StrSpan<'a>, local: StrSpan<'a>) {
        self.pending = Some(PendingElement {
            prefix: prefix.as_str(),
            local: local.as_str(),
            declarations: Vec::new(),
            attributes: Vec::new(),
        });
    }

    fn attribute(&mut self, prefix: &'a str, local: &'a str, value: &'a str) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        match (prefix, local) {
            ("xmlns", declared) => pending.declarations.push((declared, value)),
            ("", "xmlns") => pending.declarations.push(("", value)),
            _ => pending.attributes.push((prefix, local, value)),
        }
    }

    fn open_element(&mut self) -> Result<Node, Error> {
        let Some(pending) = self.pending.take() else {
            return Err(Error::InvalidOperation(
                "element end without element start".into(),
            ));
        };
        if self.current == self.document.root() && self.document.document_element().is_some() {
            return Err(Error::MultipleDocumentElements);
        }

        let mut element_prefixes = Vec::with_capacity(pending.declarations.len());
        for (prefix, uri) in pending.declarations {
            let uri = parse_entities(uri)?;
            let prefix_id = self.document.add_prefix(prefix);
            let namespace_id = self.document.add_namespace(&uri);
            element_prefixes.push((prefix_id, namespace_id));
        }
        self.bindings.extend(element_prefixes.iter().copied());
        self.binding_counts.push(element_prefixes.len());

        let (prefix_id, namespace_id) = self.resolve(pending.prefix)?;
        let name_id = self.document.add_name_ns(pending.local, namespace_id);
        let mut element = Element::new(name_id, prefix_id);
        for (prefix_id, namespace_id) in element_prefixes {
            element.set_prefix(prefix_id, namespace_id);
        }
        for (prefix, local, value) in pending.attributes {
            // unprefixed attributes are never in the default namespace
            let namespace_id = if prefix.is_empty() {
                self.document.no_namespace_id
            } else {
                self.resolve(prefix)?.1
            };
            let name_id = self.document.add_name_ns(local, namespace_id);
            element.set_attribute(name_id, parse_entities(value)?);
        }

        let node = self.document.new_node(Value::Element(element));
        self.attach(node)?;
        self.open.push(OpenElement {
            node,
            prefix: pending.prefix,
            local: pending.local,
        });
        self.current = node;
        Ok(node)
    }

    fn close_element(&mut self, prefix: &str, local: &str) -> Result<(), Error> {
        let open = self
            .open
            .pop()
            .ok_or_else(|| Error::InvalidOperation("close tag without open element".into()))?;
        if open.prefix != prefix || open.local != local {
            return Err(Error::InvalidCloseTag {
                expected: qualified(open.prefix, open.local),
                found: qualified(prefix, local),
            });
        }
        self.end_element(open.node);
        Ok(())
    }

    fn end_element(&mut self, node: Node) {
        let count = self.binding_counts.pop().unwrap_or_default();
        self.bindings.truncate(self.bindings.len() - count);
        self.current = self.document.parent(node).unwrap_or(self.document.root());
    }

    fn text(&mut self, text: &str) -> Result<(), Error> {
        if self.current == self.document.root() {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(Error::TextOutsideDocumentElement);
        }
        // adjacent text and CDATA end up in a single text node
        if let Some(last) = self.document.last_child(self.current) {
            if let Some(existing) = self.document.text_mut(last) {
                existing.text.push_str(text);
                return Ok(());
            }
        }
        let node = self.document.new_node(Value::Text(Text::new(text.to_string())));
        self.attach(node)
    }

    fn comment(&mut self, text: &str) -> Result<(), Error> {
        let node = self.document.new_comment(text);
        self.attach(node)
    }

    fn processing_instruction(&mut self, target: &str, content: Option<&str>) -> Result<(), Error> {
        let node = self.document.new_processing_instruction(target, content);
        self.attach(node)
    }

    fn finish(self, xml: &str) -> Result<Document, Error> {
        if let Some(open) = self.open.last() {
            return Err(Error::UnclosedElement(qualified(open.prefix, open.local)));
        }
        let top_level_end = self.top_level_end;
        let mut document = self.document;
        if document.document_element().is_none() {
            return Err(Error::NoDocumentElement);
        }
        document.prolog.trailing = xml
            .get(top_level_end..)
            .unwrap_or_default()
            .to_string();
        Ok(document)
    }
}

fn qualified(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

/// ## Parsing
impl Document {
    /// Parse a string into a document.
    ///
    /// Namespaces are resolved while parsing; entities and character
    /// references are expanded. The XML declaration and any DOCTYPE are kept
    /// verbatim for serialization.
    ///
    /// ```rust
    /// let doc = teifix::Document::parse(r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"/>"#)?;
    /// let tei = doc.document_element().unwrap();
    /// assert_eq!(doc.namespace_uri(tei), Some("http://www.tei-c.org/ns/1.0"));
    /// # Ok::<(), teifix::Error>(())
    /// ```
    pub fn parse(xml: &str) -> Result<Document, Error> {
        let mut builder = DocumentBuilder::new();

        for token in Tokenizer::from(xml) {
            match token? {
                Token::Declaration { span, .. } => {
                    builder.top_level_item(xml, span);
                    builder.document.prolog.declaration = Some(span.as_str().to_string());
                }
                Token::DtdStart { span, .. } => {
                    builder.top_level_start(xml, span.start());
                    builder.dtd_start = Some(span.start());
                }
                Token::DtdEnd { span } => {
                    builder.top_level_end = span.end();
                    if let Some(start) = builder.dtd_start.take() {
                        builder.document.prolog.doctype = Some(xml[start..span.end()].to_string());
                    }
                }
                Token::EmptyDtd { span, .. } => {
                    builder.top_level_item(xml, span);
                    builder.document.prolog.doctype = Some(span.as_str().to_string());
                }
                Token::EntityDeclaration { .. } => {}
                Token::ElementStart {
                    prefix,
                    local,
                    span,
                } => {
                    if builder.at_top_level() {
                        builder.top_level_start(xml, span.start());
                    }
                    builder.element_start(prefix, local);
                }
                Token::Attribute {
                    prefix,
                    local,
                    value,
                    ..
                } => {
                    builder.attribute(prefix.as_str(), local.as_str(), value.as_str());
                }
                Token::ElementEnd { end, span } => {
                    match end {
                        ElementEnd::Open => {
                            builder.open_element()?;
                        }
                        ElementEnd::Empty => {
                            let node = builder.open_element()?;
                            builder.open.pop();
                            builder.end_element(node);
                        }
                        ElementEnd::Close(prefix, local) => {
                            builder.close_element(prefix.as_str(), local.as_str())?;
                        }
                    }
                    if builder.at_top_level() {
                        builder.top_level_end = span.end();
                    }
                }
                Token::Text { text } => {
                    let text = parse_entities(text.as_str())?;
                    builder.text(&text)?;
                }
                Token::Cdata { text, .. } => {
                    builder.text(text.as_str())?;
                }
                Token::Comment { text, span } => {
                    if builder.at_top_level() {
                        builder.top_level_item(xml, span);
                    }
                    builder.comment(text.as_str())?;
                }
                Token::ProcessingInstruction {
                    target,
                    content,
                    span,
                } => {
                    if builder.at_top_level() {
                        builder.top_level_item(xml, span);
                    }
                    builder.processing_instruction(
                        target.as_str(),
                        content.map(|content| content.as_str()),
                    )?;
                }
            }
        }

        builder.finish(xml)
    }

    /// Parse bytes into a document, detecting their encoding. The encoding
    /// and any byte order mark are remembered so the document can be
    /// written back the same way.
    pub fn parse_bytes(data: &[u8]) -> Result<Document, Error> {
        let (xml, decoded) = decode(data)?;
        let mut document = Document::parse(&xml)?;
        document.encoding = decoded.encoding;
        document.byte_order_mark = decoded.byte_order_mark;
        Ok(document)
    }
}
