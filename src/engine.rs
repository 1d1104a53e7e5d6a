use std::fmt::{Display, Formatter};

use ahash::HashSet;
use log::{debug, trace};

use crate::document::{Document, Node};
use crate::error::Error;
use crate::observer::Observer;
use crate::registry::Registry;

/// A correction applied to one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    /// Name of the observer that made the correction.
    pub observer: &'static str,
    /// Location of the node before it was corrected.
    pub location: String,
    /// Local name of the node before it was corrected.
    pub local_name: String,
}

impl Display for Fix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.observer, self.location)
    }
}

/// The corrections made to one document, in the order they were made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub fixes: Vec<Fix>,
}

impl Report {
    /// Whether no correction was needed.
    pub fn is_clean(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

/// Walks a document once in document order and lets the enabled observers
/// correct the nodes they claim.
///
/// A node is corrected before its children are visited, so the walk
/// descends into the corrected children. Corrections may move nodes: every
/// element is offered to the observers exactly once, including blocks a
/// correction created, and a moved element is never offered again.
pub struct Engine<'a> {
    registry: &'a Registry,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Correct a document in place.
    ///
    /// On error the document may be partially corrected and should be
    /// discarded.
    ///
    /// ```rust
    /// use teifix::{Document, Engine, Registry};
    ///
    /// let registry = Registry::all();
    /// let mut doc = Document::parse("<teiHeader><textclass/></teiHeader>")?;
    /// let report = Engine::new(&registry).run(&mut doc)?;
    /// assert_eq!(report.len(), 1);
    /// assert_eq!(doc.serialize_to_string()?, "<teiHeader><textClass/></teiHeader>");
    /// # Ok::<(), teifix::Error>(())
    /// ```
    pub fn run(&self, document: &mut Document) -> Result<Report, Error> {
        let mut report = Report::default();
        if self.registry.is_empty() {
            return Ok(report);
        }
        let mut visited = HashSet::default();
        let mut cursor = Some(document.root());
        while let Some(node) = cursor {
            if document.is_element(node) && visited.insert(node) {
                self.visit(document, node, &mut visited, &mut report)?;
            }
            cursor = document.next_in_document_order(node);
        }
        Ok(report)
    }

    fn visit(
        &self,
        document: &mut Document,
        node: Node,
        visited: &mut HashSet<Node>,
        report: &mut Report,
    ) -> Result<(), Error> {
        let Some(observer) = self.registry.claim(document, node)? else {
            return Ok(());
        };
        let location = document.location(node);
        let local_name = document.local_name(node).unwrap_or_default().to_string();
        debug!("{} claims {}", observer.name(), location);

        observer.transform_node(document, node)?;
        self.check_corrected(observer, document, node, &location)?;
        report.fixes.push(Fix {
            observer: observer.name(),
            location,
            local_name,
        });

        // blocks created by the correction sit above the node; offer them
        // to the observers too, outermost first
        let created = document
            .ancestors(node)
            .skip(1)
            .filter(|ancestor| document.is_element(*ancestor) && !visited.contains(ancestor))
            .collect::<Vec<_>>();
        for ancestor in created.into_iter().rev() {
            trace!("visiting created {}", document.location(ancestor));
            visited.insert(ancestor);
            self.visit(document, ancestor, visited, report)?;
        }
        Ok(())
    }

    fn check_corrected(
        &self,
        observer: &dyn Observer,
        document: &Document,
        node: Node,
        location: &str,
    ) -> Result<(), Error> {
        let reason = if document.is_removed(node) {
            "the corrected node was removed"
        } else if document.parent(node).is_none() {
            "the corrected node was detached"
        } else if observer.observe(document, node) {
            "the node is still claimed after correction"
        } else {
            return Ok(());
        };
        Err(Error::ContractViolation {
            observer: observer.name(),
            location: location.to_string(),
            reason: reason.to_string(),
        })
    }
}
