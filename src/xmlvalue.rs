use indexmap::IndexMap;

use crate::name::NameId;
use crate::namespace::NamespaceId;
use crate::prefix::PrefixId;

/// The type of a node's value, for when you don't need to match on the
/// value itself.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ValueType {
    /// Document root that holds everything. Not the same as the document
    /// element.
    Root,
    Element,
    Text,
    ProcessingInstruction,
    Comment,
}

/// The value stored in a node of the document tree.
#[derive(Debug, Clone)]
pub enum Value {
    /// Document root that holds the document element and any top-level
    /// comments and processing instructions.
    Root,
    /// Element; it has a name, attributes and namespace declarations.
    Element(Element),
    /// Text. CDATA sections are also stored as text.
    Text(Text),
    ProcessingInstruction(ProcessingInstruction),
    Comment(Comment),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Root => ValueType::Root,
            Value::Element(_) => ValueType::Element,
            Value::Text(_) => ValueType::Text,
            Value::Comment(_) => ValueType::Comment,
            Value::ProcessingInstruction(_) => ValueType::ProcessingInstruction,
        }
    }
}

/// Attributes in document order.
pub type Attributes = IndexMap<NameId, String>;
/// Namespace declarations made on an element, in document order.
pub type Prefixes = IndexMap<PrefixId, NamespaceId>;

/// XML element value.
///
/// Besides its expanded name an element remembers the prefix it was written
/// with, so that serialization reproduces `tei:head` as `tei:head` even when
/// the same namespace is also the default namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) name_id: NameId,
    pub(crate) prefix_id: PrefixId,
    pub(crate) prefixes: Prefixes,
    pub(crate) attributes: Attributes,
}

impl Element {
    pub(crate) fn new(name_id: NameId, prefix_id: PrefixId) -> Self {
        Element {
            name_id,
            prefix_id,
            prefixes: Prefixes::new(),
            attributes: Attributes::new(),
        }
    }

    /// The expanded name of the element.
    pub fn name(&self) -> NameId {
        self.name_id
    }

    /// The prefix the element was written with; the empty prefix if it was
    /// unprefixed.
    pub fn prefix(&self) -> PrefixId {
        self.prefix_id
    }

    /// The attributes of the element, in document order.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Get an attribute by name.
    pub fn get_attribute(&self, name_id: NameId) -> Option<&str> {
        self.attributes.get(&name_id).map(|s| s.as_str())
    }

    /// Set an attribute value. A new attribute is added at the end, an
    /// existing one keeps its position.
    pub fn set_attribute<S: Into<String>>(&mut self, name_id: NameId, value: S) {
        self.attributes.insert(name_id, value.into());
    }

    /// Namespace declarations made on this element. Declarations on
    /// ancestors are not included.
    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    /// Declare a prefix on this element.
    pub fn set_prefix(&mut self, prefix_id: PrefixId, namespace_id: NamespaceId) {
        self.prefixes.insert(prefix_id, namespace_id);
    }
}

/// XML text value.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub(crate) text: String,
}

impl Text {
    pub(crate) fn new(text: String) -> Self {
        Text { text }
    }

    pub fn get(&self) -> &str {
        &self.text
    }

    pub fn set<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }
}

/// XML comment, e.g. `<!-- foo -->`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub(crate) text: String,
}

impl Comment {
    pub(crate) fn new(text: String) -> Self {
        Comment { text }
    }

    pub fn get(&self) -> &str {
        &self.text
    }
}

/// XML processing instruction, e.g. `<?foo bar?>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingInstruction {
    pub(crate) target: String,
    pub(crate) data: Option<String>,
}

impl ProcessingInstruction {
    pub(crate) fn new(target: String, data: Option<String>) -> Self {
        ProcessingInstruction { target, data }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}
