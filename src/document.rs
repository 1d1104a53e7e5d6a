use encoding_rs::{Encoding, UTF_8};
use indextree::{Arena, NodeId};

use crate::name::{Name, NameId, NameLookup};
use crate::namespace::{Namespace, NamespaceId, NamespaceLookup, XML_NAMESPACE};
use crate::prefix::{Prefix, PrefixId, PrefixLookup};
use crate::xmlvalue::{Comment, Element, ProcessingInstruction, Value};

pub(crate) type XmlArena = Arena<Value>;

/// A node in the document tree.
///
/// This is a lightweight handle and can be copied. It stays valid when the
/// node is renamed or moved elsewhere in the same document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(NodeId);

impl Node {
    #[inline]
    pub(crate) fn new(node_id: NodeId) -> Self {
        Node(node_id)
    }

    #[inline]
    pub(crate) fn get(&self) -> NodeId {
        self.0
    }
}

/// Everything outside the document element that isn't a node: the XML
/// declaration, the DOCTYPE and the whitespace between top-level items. It
/// is kept verbatim so it survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Prolog {
    pub(crate) declaration: Option<String>,
    pub(crate) doctype: Option<String>,
    // whitespace before each top-level item, declaration and DOCTYPE included
    pub(crate) gaps: Vec<String>,
    pub(crate) trailing: String,
}

impl Prolog {
    /// The whitespace to write before the top-level item at `index`. Items
    /// the parser never saw are put on their own line.
    pub(crate) fn gap(&self, index: usize) -> &str {
        match self.gaps.get(index) {
            Some(gap) => gap,
            None if index == 0 => "",
            None => "\n",
        }
    }
}

/// A parsed XML document.
///
/// The document owns all its nodes in an arena; [`Node`] handles refer into
/// it. Names, namespaces and prefixes are interned so comparing them is
/// cheap.
///
/// The document is implemented in several sections: read-only access,
/// the node adapter used by observers, tree manipulation, parsing and
/// serialization.
#[derive(Debug)]
pub struct Document {
    pub(crate) arena: XmlArena,
    pub(crate) root: Node,
    pub(crate) namespace_lookup: NamespaceLookup,
    pub(crate) prefix_lookup: PrefixLookup,
    pub(crate) name_lookup: NameLookup,
    pub(crate) no_namespace_id: NamespaceId,
    pub(crate) empty_prefix_id: PrefixId,
    pub(crate) xml_namespace_id: NamespaceId,
    pub(crate) xml_prefix_id: PrefixId,
    pub(crate) prolog: Prolog,
    pub(crate) encoding: &'static Encoding,
    pub(crate) byte_order_mark: bool,
}

impl Document {
    /// Create an empty document holding only the document root.
    pub(crate) fn empty() -> Self {
        let mut namespace_lookup = NamespaceLookup::new();
        let no_namespace_id = namespace_lookup.get_id_mut(Namespace::new(""));
        let xml_namespace_id = namespace_lookup.get_id_mut(Namespace::new(XML_NAMESPACE));
        let mut prefix_lookup = PrefixLookup::new();
        let empty_prefix_id = prefix_lookup.get_id_mut(Prefix::new(""));
        let xml_prefix_id = prefix_lookup.get_id_mut(Prefix::new("xml"));
        let mut arena = XmlArena::new();
        let root = Node::new(arena.new_node(Value::Root));
        Document {
            arena,
            root,
            namespace_lookup,
            prefix_lookup,
            name_lookup: NameLookup::new(),
            no_namespace_id,
            empty_prefix_id,
            xml_namespace_id,
            xml_prefix_id,
            prolog: Prolog::default(),
            encoding: UTF_8,
            byte_order_mark: false,
        }
    }

    #[inline]
    pub(crate) fn arena(&self) -> &XmlArena {
        &self.arena
    }

    #[inline]
    pub(crate) fn arena_mut(&mut self) -> &mut XmlArena {
        &mut self.arena
    }

    /// The document root. This is not the document element; it's the
    /// node that holds it.
    #[inline]
    pub fn root(&self) -> Node {
        self.root
    }

    /// The encoding the document was read in, and will be written in.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Intern a namespace URI.
    pub fn add_namespace(&mut self, uri: &str) -> NamespaceId {
        self.namespace_lookup.get_id_mut(Namespace::new(uri))
    }

    /// Look up a namespace URI without interning it.
    pub fn namespace(&self, uri: &str) -> Option<NamespaceId> {
        self.namespace_lookup.get_id(&Namespace::new(uri))
    }

    /// The id used for names that are not in any namespace.
    pub fn no_namespace(&self) -> NamespaceId {
        self.no_namespace_id
    }

    pub fn namespace_str(&self, namespace_id: NamespaceId) -> &str {
        self.namespace_lookup.get_value(namespace_id).get()
    }

    /// Intern a prefix.
    pub fn add_prefix(&mut self, prefix: &str) -> PrefixId {
        self.prefix_lookup.get_id_mut(Prefix::new(prefix))
    }

    pub fn prefix_str(&self, prefix_id: PrefixId) -> &str {
        self.prefix_lookup.get_value(prefix_id).get()
    }

    /// Intern a name in a namespace.
    pub fn add_name_ns(&mut self, local: &str, namespace_id: NamespaceId) -> NameId {
        self.name_lookup.get_id_mut(Name::new(local, namespace_id))
    }

    /// Look up a name that is not in a namespace, without interning it.
    pub fn name(&self, local: &str) -> Option<NameId> {
        self.name_ns(local, self.no_namespace_id)
    }

    /// Look up a name in a namespace, without interning it.
    pub fn name_ns(&self, local: &str, namespace_id: NamespaceId) -> Option<NameId> {
        self.name_lookup.get_id(&Name::new(local, namespace_id))
    }

    /// The local part of a name.
    pub fn local_name_str(&self, name_id: NameId) -> &str {
        &self.name_lookup.get_value(name_id).local
    }

    /// The namespace of a name.
    pub fn name_namespace(&self, name_id: NameId) -> NamespaceId {
        self.name_lookup.get_value(name_id).namespace_id
    }

    pub(crate) fn new_node(&mut self, value: Value) -> Node {
        Node::new(self.arena.new_node(value))
    }

    /// Create a new, unattached element written with the given prefix.
    pub fn new_element_with_prefix(&mut self, name_id: NameId, prefix_id: PrefixId) -> Node {
        self.new_node(Value::Element(Element::new(name_id, prefix_id)))
    }

    pub(crate) fn new_comment(&mut self, comment: &str) -> Node {
        self.new_node(Value::Comment(Comment::new(comment.to_string())))
    }

    pub(crate) fn new_processing_instruction(&mut self, target: &str, data: Option<&str>) -> Node {
        self.new_node(Value::ProcessingInstruction(ProcessingInstruction::new(
            target.to_string(),
            data.map(|s| s.to_string()),
        )))
    }
}
