use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while parsing, correcting or writing a document.
#[derive(Debug, Error)]
pub enum Error {
    /// An entity reference was started but never closed with `;`.
    #[error("unclosed entity: &{0}")]
    UnclosedEntity(String),
    /// An entity reference that is neither predefined nor a character
    /// reference.
    #[error("invalid entity: &{0};")]
    InvalidEntity(String),
    /// A prefix was used that isn't declared in scope.
    #[error("unknown namespace prefix: {0}")]
    UnknownPrefix(String),
    /// A close tag doesn't match the element that is open.
    #[error("close tag </{found}> does not match open element <{expected}>")]
    InvalidCloseTag { expected: String, found: String },
    /// The input ended while elements were still open.
    #[error("unclosed element <{0}>")]
    UnclosedElement(String),
    /// The input has no document element.
    #[error("document has no document element")]
    NoDocumentElement,
    /// The input has more than one top-level element.
    #[error("document has more than one top-level element")]
    MultipleDocumentElements,
    /// Text that isn't whitespace appears outside the document element.
    #[error("text outside of the document element")]
    TextOutsideDocumentElement,
    /// Error from the underlying tokenizer.
    #[error("XML syntax error: {0}")]
    Parser(#[from] xmlparser::Error),
    /// The input bytes could not be decoded.
    #[error("cannot decode input as {0}")]
    Encoding(String),
    /// During serialization a namespace turned out to have no prefix in
    /// scope.
    #[error("no prefix in scope for namespace {0}")]
    NoPrefixForNamespace(String),
    /// A tree operation that would break the document structure.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// The node is not an element.
    #[error("node is not an element")]
    NotElement,
    /// Error from the arena.
    #[error("tree error: {0:?}")]
    Tree(indextree::NodeError),
    /// An observer broke its contract: it was asked to correct a node it
    /// doesn't claim, or it still claims the node after correcting it.
    #[error("observer {observer} violated its contract at {location}: {reason}")]
    ContractViolation {
        observer: &'static str,
        location: String,
        reason: String,
    },
    /// Two enabled observers claim the same node.
    #[error("observers {first} and {second} both claim {location}")]
    AmbiguousClaim {
        first: &'static str,
        second: &'static str,
        location: String,
    },
    /// A transformation category name that isn't known.
    #[error("unknown transformation category: {0}")]
    UnknownCategory(String),
    /// Two input files would be written to the same output file.
    #[error(
        "{} and {} would both be written to {}",
        first.display(),
        second.display(),
        target.display()
    )]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        target: PathBuf,
    },
    /// A configuration file could not be read.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<indextree::NodeError> for Error {
    #[inline]
    fn from(e: indextree::NodeError) -> Self {
        Error::Tree(e)
    }
}
