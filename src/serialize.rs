use std::fmt::Write as _;
use std::io;

use crate::access::NodeEdge;
use crate::document::{Document, Node};
use crate::encoding::{encode, Decoded};
use crate::entity::{serialize_attribute, serialize_text};
use crate::error::Error;
use crate::name::NameId;
use crate::namespace::NamespaceId;
use crate::prefix::PrefixId;
use crate::xmlvalue::{Element, Value};

// Resolves expanded names back to prefixed names while walking the tree.
struct FullnameSerializer<'a> {
    document: &'a Document,
    bindings: Vec<(PrefixId, NamespaceId)>,
    // per open element: bindings pushed, and the full name for the end tag
    stack: Vec<(usize, String)>,
}

impl<'a> FullnameSerializer<'a> {
    fn new(document: &'a Document) -> Self {
        Self {
            document,
            bindings: vec![
                (document.empty_prefix_id, document.no_namespace_id),
                (document.xml_prefix_id, document.xml_namespace_id),
            ],
            stack: Vec::new(),
        }
    }

    fn lookup(&self, prefix_id: PrefixId) -> Option<NamespaceId> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| *bound == prefix_id)
            .map(|(_, namespace_id)| *namespace_id)
    }

    // a prefix bound to the namespace that isn't shadowed by an inner
    // declaration of the same prefix
    fn prefix_for(&self, namespace_id: NamespaceId, allow_empty: bool) -> Option<PrefixId> {
        self.bindings
            .iter()
            .rev()
            .filter(|(prefix_id, bound)| {
                *bound == namespace_id
                    && (allow_empty || *prefix_id != self.document.empty_prefix_id)
            })
            .map(|(prefix_id, _)| *prefix_id)
            .find(|prefix_id| self.lookup(*prefix_id) == Some(namespace_id))
    }

    fn fullname(&self, name_id: NameId, prefix_id: Option<PrefixId>) -> Result<String, Error> {
        let local = self.document.local_name_str(name_id);
        let namespace_id = self.document.name_namespace(name_id);
        let prefix_id = match prefix_id {
            // elements prefer the prefix they were written with
            Some(prefix_id) if self.lookup(prefix_id) == Some(namespace_id) => Some(prefix_id),
            Some(_) => self.prefix_for(namespace_id, true),
            None if namespace_id == self.document.no_namespace_id => {
                return Ok(local.to_string());
            }
            None => self.prefix_for(namespace_id, false),
        };
        let prefix_id = prefix_id.ok_or_else(|| {
            Error::NoPrefixForNamespace(self.document.namespace_str(namespace_id).to_string())
        })?;
        let prefix = self.document.prefix_str(prefix_id);
        if prefix.is_empty() {
            Ok(local.to_string())
        } else {
            Ok(format!("{}:{}", prefix, local))
        }
    }

    fn push(&mut self, element: &Element) -> Result<&str, Error> {
        self.bindings
            .extend(element.prefixes().iter().map(|(p, ns)| (*p, *ns)));
        let fullname = self.fullname(element.name(), Some(element.prefix()))?;
        self.stack.push((element.prefixes().len(), fullname));
        Ok(self.stack.last().map(|(_, name)| name.as_str()).unwrap_or_default())
    }

    fn pop(&mut self) -> Option<String> {
        let (count, fullname) = self.stack.pop()?;
        self.bindings.truncate(self.bindings.len() - count);
        Some(fullname)
    }
}

/// ## Serialization
impl Document {
    /// Serialize the document to a string.
    ///
    /// The XML declaration, the DOCTYPE and the whitespace around
    /// top-level items are written as they were read. Namespace
    /// declarations come before attributes, attributes keep their order, and
    /// elements without children are written as `<x/>`.
    pub fn serialize_to_string(&self) -> Result<String, Error> {
        let mut out = String::new();
        let mut top_level = 0;
        for item in [&self.prolog.declaration, &self.prolog.doctype]
            .into_iter()
            .flatten()
        {
            out.push_str(self.prolog.gap(top_level));
            out.push_str(item);
            top_level += 1;
        }

        let mut names = FullnameSerializer::new(self);
        for edge in self.traverse(self.root) {
            match edge {
                NodeEdge::Start(node) => {
                    if self.parent(node) == Some(self.root) {
                        out.push_str(self.prolog.gap(top_level));
                        top_level += 1;
                    }
                    self.serialize_start(&mut out, &mut names, node)?;
                }
                NodeEdge::End(node) => {
                    if self.is_element(node) {
                        let fullname = names.pop().unwrap_or_default();
                        if self.first_child(node).is_some() {
                            let _ = write!(out, "</{}>", fullname);
                        }
                    }
                }
            }
        }
        out.push_str(&self.prolog.trailing);
        Ok(out)
    }

    fn serialize_start(
        &self,
        out: &mut String,
        names: &mut FullnameSerializer,
        node: Node,
    ) -> Result<(), Error> {
        match self.value(node) {
            Value::Root => {}
            Value::Element(element) => {
                let fullname = names.push(element)?;
                let _ = write!(out, "<{}", fullname);
                for (prefix_id, namespace_id) in element.prefixes() {
                    let namespace = serialize_attribute(self.namespace_str(*namespace_id));
                    if *prefix_id == self.empty_prefix_id {
                        let _ = write!(out, " xmlns=\"{}\"", namespace);
                    } else {
                        let _ = write!(
                            out,
                            " xmlns:{}=\"{}\"",
                            self.prefix_str(*prefix_id),
                            namespace
                        );
                    }
                }
                for (name_id, value) in element.attributes() {
                    let fullname = names.fullname(*name_id, None)?;
                    let _ = write!(out, " {}=\"{}\"", fullname, serialize_attribute(value));
                }
                if self.first_child(node).is_some() {
                    out.push('>');
                } else {
                    out.push_str("/>");
                }
            }
            Value::Text(text) => out.push_str(&serialize_text(text.get())),
            Value::Comment(comment) => {
                let _ = write!(out, "<!--{}-->", comment.get());
            }
            Value::ProcessingInstruction(pi) => match pi.data() {
                Some(data) => {
                    let _ = write!(out, "<?{} {}?>", pi.target(), data);
                }
                None => {
                    let _ = write!(out, "<?{}?>", pi.target());
                }
            },
        }
        Ok(())
    }

    /// Serialize the document to bytes in the encoding it was read in,
    /// with a byte order mark if it was read with one.
    pub fn serialize_to_bytes(&self) -> Result<Vec<u8>, Error> {
        let decoded = Decoded {
            encoding: self.encoding,
            byte_order_mark: self.byte_order_mark,
        };
        encode(&self.serialize_to_string()?, decoded)
    }

    /// Serialize the document into a writer, in the encoding it was read
    /// in.
    pub fn write<W: io::Write>(&self, w: &mut W) -> Result<(), Error> {
        w.write_all(&self.serialize_to_bytes()?)?;
        Ok(())
    }
}
