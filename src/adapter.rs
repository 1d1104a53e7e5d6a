use crate::document::{Document, Node};
use crate::error::Error;
use crate::xmlvalue::Attributes;

/// ## Node adapter
///
/// The view observers use to inspect and correct elements. Everything here
/// works on namespace-stripped local names, so a rule written against
/// `head` matches `<head>`, `<tei:head>` and `<head xmlns="...">` alike.
impl Document {
    /// The local name of an element, without prefix or namespace. Returns
    /// [`None`] for anything that isn't an element.
    ///
    /// ```rust
    /// let doc = teifix::Document::parse(
    ///     r#"<tei:TEI xmlns:tei="http://www.tei-c.org/ns/1.0"/>"#,
    /// )?;
    /// let tei = doc.document_element().unwrap();
    /// assert_eq!(doc.local_name(tei), Some("TEI"));
    /// # Ok::<(), teifix::Error>(())
    /// ```
    pub fn local_name(&self, node: Node) -> Option<&str> {
        self.element(node)
            .map(|element| self.local_name_str(element.name()))
    }

    /// The namespace URI of an element. The empty string means the element
    /// is not in a namespace.
    pub fn namespace_uri(&self, node: Node) -> Option<&str> {
        self.element(node)
            .map(|element| self.namespace_str(self.name_namespace(element.name())))
    }

    /// The namespace-qualified tag in Clark notation: `{uri}local`, or just
    /// `local` when the element is not in a namespace.
    pub fn qualified_tag(&self, node: Node) -> Option<String> {
        let local = self.local_name(node)?;
        let uri = self.namespace_uri(node)?;
        if uri.is_empty() {
            Some(local.to_string())
        } else {
            Some(format!("{{{}}}{}", uri, local))
        }
    }

    /// The local name of the parent element, if the parent is an element.
    pub fn parent_local_name(&self, node: Node) -> Option<&str> {
        self.parent(node).and_then(|parent| self.local_name(parent))
    }

    /// The element siblings that come strictly before `node`, in document
    /// order.
    pub fn preceding_siblings(&self, node: Node) -> Vec<Node> {
        let mut siblings = node
            .get()
            .preceding_siblings(self.arena())
            .skip(1)
            .map(Node::new)
            .filter(|sibling| self.is_element(*sibling))
            .collect::<Vec<_>>();
        siblings.reverse();
        siblings
    }

    /// Whether any element sibling comes before `node`.
    pub fn has_preceding_sibling_element(&self, node: Node) -> bool {
        node.get()
            .preceding_siblings(self.arena())
            .skip(1)
            .any(|sibling| self.is_element(Node::new(sibling)))
    }

    /// The attributes of an element, in document order.
    pub fn attributes(&self, node: Node) -> Option<&Attributes> {
        self.element(node).map(|element| element.attributes())
    }

    /// Look up an attribute by local name, whatever its namespace.
    pub fn attribute_by_local_name(&self, node: Node, local: &str) -> Option<&str> {
        self.attributes(node)?
            .iter()
            .find(|(name_id, _)| self.local_name_str(**name_id) == local)
            .map(|(_, value)| value.as_str())
    }

    /// Rename an element in place.
    ///
    /// Only the local name changes: the namespace, the prefix it is written
    /// with, its namespace declarations, its attributes and its children
    /// stay as they are. The node handle stays valid.
    ///
    /// ```rust
    /// let mut doc = teifix::Document::parse(r#"<textclass n="1"/>"#)?;
    /// let node = doc.document_element().unwrap();
    /// doc.rename(node, "textClass")?;
    /// assert_eq!(doc.serialize_to_string()?, r#"<textClass n="1"/>"#);
    /// # Ok::<(), teifix::Error>(())
    /// ```
    pub fn rename(&mut self, node: Node, new_local_name: &str) -> Result<(), Error> {
        let name_id = self.element(node).ok_or(Error::NotElement)?.name();
        let namespace_id = self.name_namespace(name_id);
        let renamed = self.add_name_ns(new_local_name, namespace_id);
        let element = self.element_mut(node).ok_or(Error::NotElement)?;
        element.name_id = renamed;
        Ok(())
    }

    /// A location path for a node, such as `/TEI/text/body/div[2]/head`.
    ///
    /// A position is only given when the parent has more than one element
    /// child with the same local name.
    pub fn location(&self, node: Node) -> String {
        let mut steps = self
            .ancestors(node)
            .filter(|ancestor| self.is_element(*ancestor))
            .map(|ancestor| self.location_step(ancestor))
            .collect::<Vec<_>>();
        steps.reverse();
        format!("/{}", steps.join("/"))
    }

    fn location_step(&self, node: Node) -> String {
        let local = self.local_name(node).unwrap_or_default();
        let Some(parent) = self.parent(node) else {
            return local.to_string();
        };
        let same_named = self
            .element_children(parent)
            .filter(|sibling| self.local_name(*sibling) == Some(local))
            .collect::<Vec<_>>();
        if same_named.len() < 2 {
            return local.to_string();
        }
        let position = same_named
            .iter()
            .position(|sibling| *sibling == node)
            .map(|index| index + 1)
            .unwrap_or_default();
        format!("{}[{}]", local, position)
    }
}
