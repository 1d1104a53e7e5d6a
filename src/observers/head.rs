use log::debug;

use crate::document::{Document, Node};
use crate::error::Error;
use crate::observer::{expect_local_name, Observer};

const HEAD: &str = "head";

/// Corrects a `head` that doesn't lead its block.
///
/// A `head` with an element sibling before it is a heading that an upstream
/// conversion failed to start a new block with. The correction splits the
/// enclosing block at the heading: a new block with the same name, prefix
/// and namespace declarations as the enclosing one (but none of its other
/// attributes) is inserted right after it, and the `head` and everything
/// after it move into the new block.
///
/// When the enclosing block is the document element no sibling block can be
/// created, so the new block is nested at the end of the document element
/// instead. If that document element is itself a `head` its heads are left
/// alone, since every new block would be another misplaced `head`.
///
/// ```text
/// <body><div><p/><head/><p/></div></body>  ->  <body><div><p/></div><div><head/><p/></div></body>
/// <div><p/><head/><p/></div>               ->  <div><p/><div><head/><p/></div></div>
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadObserver;

impl HeadObserver {
    fn violation(&self, document: &Document, node: Node, reason: &str) -> Error {
        Error::ContractViolation {
            observer: self.name(),
            location: document.location(node),
            reason: reason.to_string(),
        }
    }

    // a block like `block`, without its attributes; a sibling of `block`
    // needs its namespace declarations too, a child has them in scope
    fn new_block(
        &self,
        document: &mut Document,
        block: Node,
        declarations: bool,
    ) -> Result<Node, Error> {
        let element = document.element(block).ok_or(Error::NotElement)?.clone();
        let new_block = document.new_element_with_prefix(element.name(), element.prefix());
        if declarations {
            if let Some(new_element) = document.element_mut(new_block) {
                for (prefix_id, namespace_id) in element.prefixes() {
                    new_element.set_prefix(*prefix_id, *namespace_id);
                }
            }
        }
        Ok(new_block)
    }
}

impl Observer for HeadObserver {
    fn name(&self) -> &'static str {
        "head-position"
    }

    fn observe(&self, document: &Document, node: Node) -> bool {
        let Some(block) = document
            .parent(node)
            .filter(|parent| document.is_element(*parent))
        else {
            return false;
        };
        // wrapping inside a `head` document element yields a new misplaced
        // head every time
        let wraps_into_head = document.parent(block) == Some(document.root())
            && document.parent_local_name(node) == Some(HEAD);
        document.local_name(node) == Some(HEAD)
            && !wraps_into_head
            && document.has_preceding_sibling_element(node)
    }

    fn transform_node(&self, document: &mut Document, node: Node) -> Result<(), Error> {
        expect_local_name(self, document, node, HEAD)?;
        if !document.has_preceding_sibling_element(node) {
            return Err(self.violation(document, node, "head already leads its block"));
        }
        let block = document
            .parent(node)
            .filter(|parent| document.is_element(*parent))
            .ok_or_else(|| self.violation(document, node, "head is not inside an element"))?;
        let nested = document
            .parent(block)
            .is_some_and(|grandparent| document.is_element(grandparent));

        let tail = document.following_siblings(node).collect::<Vec<_>>();
        let new_block = self.new_block(document, block, nested)?;
        if nested {
            debug!("{}: splitting block at {}", self.name(), document.location(node));
            document.insert_after(block, new_block)?;
        } else {
            debug!("{}: wrapping {} in a new block", self.name(), document.location(node));
            document.append(block, new_block)?;
        }
        // from the end, so that no text nodes get merged on the way
        for sibling in tail.into_iter().rev() {
            document.prepend(new_block, sibling)?;
        }
        Ok(())
    }
}
