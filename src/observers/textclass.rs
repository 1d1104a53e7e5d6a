use crate::document::{Document, Node};
use crate::error::Error;
use crate::observer::Observer;

use super::casing::rename_checked;

const WRONG: &str = "textclass";
const LEGAL: &str = "textClass";

/// Renames `<textclass>` to the schema-legal `<textClass>`.
///
/// Attributes, namespace, prefix and children are kept exactly as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextClassObserver;

impl Observer for TextClassObserver {
    fn name(&self) -> &'static str {
        "textclass-casing"
    }

    fn observe(&self, document: &Document, node: Node) -> bool {
        document.local_name(node) == Some(WRONG)
    }

    fn transform_node(&self, document: &mut Document, node: Node) -> Result<(), Error> {
        rename_checked(self, document, node, WRONG, LEGAL)
    }
}
