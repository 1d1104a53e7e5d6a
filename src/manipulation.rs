use crate::document::{Document, Node};
use crate::error::Error;
use crate::xmlvalue::{Value, ValueType};

/// ## Manipulation of the tree structure.
///
/// This maintains an XML structure:
/// - The document root cannot be moved or removed, and neither can the
///   document element.
/// - Nothing but comments and processing instructions can be added directly
///   under the document root.
/// - Only elements and the document root can have children.
///
/// Text nodes are consolidated: two text nodes are never adjacent. Moving a
/// text node next to another merges them, as does moving away the node that
/// separated two text nodes.
impl Document {
    /// Append a child to the end of the children of `parent`. If the child
    /// is already in the tree it's moved.
    pub fn append(&mut self, parent: Node, child: Node) -> Result<(), Error> {
        self.add_structure_check(Some(parent), child)?;
        self.detach(child)?;
        if self.add_consolidate_text_nodes(child, self.last_child(parent), None) {
            return Ok(());
        }
        parent.get().checked_append(child.get(), self.arena_mut())?;
        Ok(())
    }

    /// Prepend a child to the children of `parent`. If the child is already
    /// in the tree it's moved.
    pub fn prepend(&mut self, parent: Node, child: Node) -> Result<(), Error> {
        self.add_structure_check(Some(parent), child)?;
        self.detach(child)?;
        if self.add_consolidate_text_nodes(child, None, self.first_child(parent)) {
            return Ok(());
        }
        parent.get().checked_prepend(child.get(), self.arena_mut())?;
        Ok(())
    }

    /// Insert a node as the next sibling of `reference_node`.
    pub fn insert_after(&mut self, reference_node: Node, new_sibling: Node) -> Result<(), Error> {
        self.add_structure_check(self.parent(reference_node), new_sibling)?;
        self.detach(new_sibling)?;
        if self.add_consolidate_text_nodes(
            new_sibling,
            Some(reference_node),
            self.next_sibling(reference_node),
        ) {
            return Ok(());
        }
        reference_node
            .get()
            .checked_insert_after(new_sibling.get(), self.arena_mut())?;
        Ok(())
    }

    /// Detach a node (and its descendants) from the tree. It stays in the
    /// arena and can be attached elsewhere.
    pub fn detach(&mut self, node: Node) -> Result<(), Error> {
        self.remove_structure_check(node)?;
        let prev_node = self.previous_sibling(node);
        let next_node = self.next_sibling(node);
        node.get().detach(self.arena_mut());
        self.remove_consolidate_text_nodes(prev_node, next_node);
        Ok(())
    }

    /// Remove a node (and its descendants) from the document.
    pub fn remove(&mut self, node: Node) -> Result<(), Error> {
        self.remove_structure_check(node)?;
        let prev_node = self.previous_sibling(node);
        let next_node = self.next_sibling(node);
        node.get().remove_subtree(self.arena_mut());
        self.remove_consolidate_text_nodes(prev_node, next_node);
        Ok(())
    }

    fn is_document_element(&self, node: Node) -> bool {
        self.parent(node) == Some(self.root) && self.is_element(node)
    }

    fn add_structure_check(&self, parent: Option<Node>, child: Node) -> Result<(), Error> {
        let parent = parent.ok_or_else(|| {
            Error::InvalidOperation("cannot create siblings for the document root".into())
        })?;
        if !matches!(
            self.value_type(parent),
            ValueType::Element | ValueType::Root
        ) {
            return Err(Error::InvalidOperation(
                "cannot add children to a node that isn't an element".into(),
            ));
        }
        if parent.get().ancestors(self.arena()).any(|a| a == child.get()) {
            return Err(Error::InvalidOperation(
                "cannot move a node below itself".into(),
            ));
        }
        match self.value_type(child) {
            ValueType::Root => {
                return Err(Error::InvalidOperation(
                    "cannot move the document root".into(),
                ));
            }
            ValueType::Element | ValueType::Text => {
                if parent == self.root {
                    return Err(Error::InvalidOperation(
                        "cannot add elements or text under the document root".into(),
                    ));
                }
            }
            ValueType::ProcessingInstruction | ValueType::Comment => {}
        }
        Ok(())
    }

    fn remove_structure_check(&self, node: Node) -> Result<(), Error> {
        match self.value_type(node) {
            ValueType::Root => Err(Error::InvalidOperation(
                "cannot remove the document root".into(),
            )),
            ValueType::Element if self.is_document_element(node) => Err(
                Error::InvalidOperation("cannot remove the document element".into()),
            ),
            _ => Ok(()),
        }
    }

    // returns true when the added node was merged into a neighbouring text
    // node and so no longer exists
    fn add_consolidate_text_nodes(
        &mut self,
        node: Node,
        prev_node: Option<Node>,
        next_node: Option<Node>,
    ) -> bool {
        let added_text = match self.value(node) {
            Value::Text(text) => text.get().to_string(),
            _ => return false,
        };

        // two text nodes are never adjacent, so merging with one neighbour
        // is enough
        if let Some(prev) = prev_node.and_then(|prev| self.text_mut(prev)) {
            let mut s = prev.get().to_string();
            s.push_str(&added_text);
            prev.set(s);
            node.get().remove(self.arena_mut());
            return true;
        }
        if let Some(next) = next_node.and_then(|next| self.text_mut(next)) {
            let mut s = added_text;
            s.push_str(next.get());
            next.set(s);
            node.get().remove(self.arena_mut());
            return true;
        }
        false
    }

    fn remove_consolidate_text_nodes(&mut self, prev_node: Option<Node>, next_node: Option<Node>) {
        let (Some(prev_node), Some(next_node)) = (prev_node, next_node) else {
            return;
        };
        let Some(to_add) = self.text(next_node).map(|text| text.get().to_string()) else {
            return;
        };
        let Some(prev) = self.text_mut(prev_node) else {
            return;
        };
        let mut s = prev.get().to_string();
        s.push_str(&to_add);
        prev.set(s);
        next_node.get().remove(self.arena_mut());
    }
}
