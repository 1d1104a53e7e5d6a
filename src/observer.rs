use crate::document::{Document, Node};
use crate::error::Error;

/// A detection and correction rule for one specific structural malformation.
///
/// Observers hold no per-document state, so one instance can be shared by
/// any number of traversals, also from several threads at once.
///
/// The engine only calls [`Observer::transform_node`] on nodes for which
/// [`Observer::observe`] returned `true`, and checks afterwards that
/// `observe` no longer returns `true` for the corrected node. That makes
/// every correction idempotent: running the same observers over their own
/// output changes nothing.
pub trait Observer: Send + Sync {
    /// A stable name, used in reports and to deduplicate registries.
    fn name(&self) -> &'static str;

    /// Whether `node` has the malformation this observer corrects.
    ///
    /// This must not look further than the node itself, its parent and its
    /// siblings, and should match on local names so that it behaves the
    /// same with and without a namespace.
    fn observe(&self, document: &Document, node: Node) -> bool;

    /// Correct the malformation at `node`.
    ///
    /// Any node this creates must become an ancestor of `node` or follow it
    /// in document order, so the traversal still reaches it.
    fn transform_node(&self, document: &mut Document, node: Node) -> Result<(), Error>;
}

/// Check that `node` is the element an observer expects before correcting
/// it.
pub(crate) fn expect_local_name(
    observer: &dyn Observer,
    document: &Document,
    node: Node,
    expected: &str,
) -> Result<(), Error> {
    match document.local_name(node) {
        Some(local) if local == expected => Ok(()),
        found => Err(Error::ContractViolation {
            observer: observer.name(),
            location: document.location(node),
            reason: format!(
                "expected <{}>, found {}",
                expected,
                found.map_or_else(|| "a non-element node".to_string(), |l| format!("<{}>", l))
            ),
        }),
    }
}
