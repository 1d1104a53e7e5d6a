use crate::document::{Document, Node};
use crate::xmlvalue::{Element, Text, Value, ValueType};

/// Node edges, as produced by [`Document::traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEdge {
    /// The start of a node. For an element this is the start tag.
    Start(Node),
    /// The end of a node. For an element this is the end tag; for other
    /// values it immediately follows the start edge.
    End(Node),
}

/// ## Read-only access
impl Document {
    /// The value of a node.
    #[inline]
    pub fn value(&self, node: Node) -> &Value {
        self.arena[node.get()].get()
    }

    /// Mutable access to the value of a node.
    #[inline]
    pub fn value_mut(&mut self, node: Node) -> &mut Value {
        self.arena[node.get()].get_mut()
    }

    pub fn value_type(&self, node: Node) -> ValueType {
        self.value(node).value_type()
    }

    pub fn is_element(&self, node: Node) -> bool {
        self.value_type(node) == ValueType::Element
    }

    /// The element value of a node, or [`None`] if it isn't an element.
    pub fn element(&self, node: Node) -> Option<&Element> {
        match self.value(node) {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Mutable element value of a node, or [`None`] if it isn't an element.
    pub fn element_mut(&mut self, node: Node) -> Option<&mut Element> {
        match self.value_mut(node) {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// The text value of a node, or [`None`] if it isn't text.
    pub fn text(&self, node: Node) -> Option<&Text> {
        match self.value(node) {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, node: Node) -> Option<&mut Text> {
        match self.value_mut(node) {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The document element: the single element under the document root.
    ///
    /// ```rust
    /// let doc = teifix::Document::parse("<TEI><text/></TEI>")?;
    /// let tei = doc.document_element().unwrap();
    /// assert_eq!(doc.local_name(tei), Some("TEI"));
    /// # Ok::<(), teifix::Error>(())
    /// ```
    pub fn document_element(&self) -> Option<Node> {
        self.children(self.root).find(|child| self.is_element(*child))
    }

    /// Check whether a node has been removed from the arena.
    pub fn is_removed(&self, node: Node) -> bool {
        self.arena[node.get()].is_removed()
    }

    /// Get the parent node. Returns [`None`] for the document root and for
    /// unattached nodes.
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].parent().map(Node::new)
    }

    pub fn first_child(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].first_child().map(Node::new)
    }

    pub fn last_child(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].last_child().map(Node::new)
    }

    pub fn next_sibling(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].next_sibling().map(Node::new)
    }

    pub fn previous_sibling(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].previous_sibling().map(Node::new)
    }

    /// Iterator over the children of a node.
    pub fn children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().children(self.arena()).map(Node::new)
    }

    /// Iterator over the element children of a node.
    pub fn element_children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        self.children(node).filter(|child| self.is_element(*child))
    }

    /// Iterator over this node and its following siblings.
    pub fn following_siblings(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().following_siblings(self.arena()).map(Node::new)
    }

    /// Iterator over ancestors, starting with the node itself.
    pub fn ancestors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().ancestors(self.arena()).map(Node::new)
    }

    /// Iterator over the node and its descendants in document order
    /// (pre-order, depth-first).
    ///
    /// ```rust
    /// let doc = teifix::Document::parse("<a><b><c/></b><d/></a>")?;
    /// let a = doc.document_element().unwrap();
    /// let names = doc
    ///     .descendants(a)
    ///     .filter_map(|node| doc.local_name(node))
    ///     .collect::<Vec<_>>();
    /// assert_eq!(names, vec!["a", "b", "c", "d"]);
    /// # Ok::<(), teifix::Error>(())
    /// ```
    pub fn descendants(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().descendants(self.arena()).map(Node::new)
    }

    /// Traverse a node and its descendants, yielding start and end edges.
    pub fn traverse(&self, node: Node) -> impl Iterator<Item = NodeEdge> + '_ {
        node.get().traverse(self.arena()).map(|edge| match edge {
            indextree::NodeEdge::Start(node_id) => NodeEdge::Start(Node::new(node_id)),
            indextree::NodeEdge::End(node_id) => NodeEdge::End(Node::new(node_id)),
        })
    }

    /// The node that follows `node` in document order, not descending into
    /// `node`'s own children.
    pub(crate) fn next_skipping_children(&self, node: Node) -> Option<Node> {
        self.ancestors(node)
            .take_while(|ancestor| *ancestor != self.root)
            .find_map(|ancestor| self.next_sibling(ancestor))
    }

    /// The node that follows `node` in document order.
    pub(crate) fn next_in_document_order(&self, node: Node) -> Option<Node> {
        self.first_child(node)
            .or_else(|| self.next_skipping_children(node))
    }

    /// Concatenated text of all text descendants.
    pub fn text_content(&self, node: Node) -> String {
        self.descendants(node)
            .filter_map(|descendant| self.text(descendant))
            .map(|text| text.get())
            .collect()
    }
}
