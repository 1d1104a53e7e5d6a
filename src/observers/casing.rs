use log::debug;

use crate::document::{Document, Node};
use crate::error::Error;
use crate::observer::{expect_local_name, Observer};

/// Casing variants of `teiHeader` elements that conversion pipelines
/// produce, as observer name, wrong name and legal name. `textclass` has
/// its own observer.
pub const HEADER_CASINGS: &[(&str, &str, &str)] = &[
    ("teiheader-casing", "teiheader", "teiHeader"),
    ("filedesc-casing", "filedesc", "fileDesc"),
    ("titlestmt-casing", "titlestmt", "titleStmt"),
    ("publicationstmt-casing", "publicationstmt", "publicationStmt"),
    ("sourcedesc-casing", "sourcedesc", "sourceDesc"),
    ("profiledesc-casing", "profiledesc", "profileDesc"),
    ("encodingdesc-casing", "encodingdesc", "encodingDesc"),
    ("classcode-casing", "classcode", "classCode"),
    ("langusage-casing", "langusage", "langUsage"),
    ("revisiondesc-casing", "revisiondesc", "revisionDesc"),
];

/// Renames one wrongly cased element name to its legal form.
///
/// Matching is exact: only `wrong` is claimed, so already correct elements
/// and other casing variants are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasingObserver {
    name: &'static str,
    wrong: &'static str,
    legal: &'static str,
}

impl CasingObserver {
    pub const fn new(name: &'static str, wrong: &'static str, legal: &'static str) -> Self {
        Self { name, wrong, legal }
    }

    /// One observer per entry of [`HEADER_CASINGS`].
    pub fn header_casings() -> Vec<CasingObserver> {
        HEADER_CASINGS
            .iter()
            .map(|&(name, wrong, legal)| CasingObserver::new(name, wrong, legal))
            .collect()
    }

    pub fn wrong(&self) -> &'static str {
        self.wrong
    }

    pub fn legal(&self) -> &'static str {
        self.legal
    }
}

impl Observer for CasingObserver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn observe(&self, document: &Document, node: Node) -> bool {
        document.local_name(node) == Some(self.wrong)
    }

    fn transform_node(&self, document: &mut Document, node: Node) -> Result<(), Error> {
        rename_checked(self, document, node, self.wrong, self.legal)
    }
}

/// Rename `node` from `wrong` to `legal`, failing when it isn't named
/// `wrong`.
pub(crate) fn rename_checked(
    observer: &dyn Observer,
    document: &mut Document,
    node: Node,
    wrong: &str,
    legal: &str,
) -> Result<(), Error> {
    expect_local_name(observer, document, node, wrong)?;
    debug!("{}: renaming <{}> to <{}>", observer.name(), wrong, legal);
    document.rename(node, legal)
}
