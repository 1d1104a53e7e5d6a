use std::fmt::{Display, Formatter};

use crate::idmap::{IdIndex, IdMap};

/// The TEI namespace.
pub const TEI_NAMESPACE: &str = "http://www.tei-c.org/ns/1.0";
/// The namespace bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Id uniquely identifying a namespace URI. The empty URI stands for "no
/// namespace".
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct NamespaceId(u16);

impl IdIndex<NamespaceId> for NamespaceId {
    fn to_id(index: usize) -> NamespaceId {
        NamespaceId(index as u16)
    }

    fn from_id(id: NamespaceId) -> usize {
        id.0 as usize
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub(crate) struct Namespace(String);

impl Namespace {
    pub(crate) fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub(crate) fn get(&self) -> &str {
        &self.0
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) type NamespaceLookup = IdMap<NamespaceId, Namespace>;
