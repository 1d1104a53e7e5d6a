use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::debug;

use crate::document::{Document, Node};
use crate::error::Error;
use crate::observer::Observer;
use crate::observers::{CasingObserver, HeadObserver, TextClassObserver};

/// A named group of observers that can be enabled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Headings that don't lead their block.
    Head,
    /// `textclass` written in the wrong case.
    TextClass,
    /// Wrongly cased `teiHeader` elements, `textclass` included.
    TeiHeader,
}

impl Category {
    pub const ALL: &'static [Category] = &[Category::Head, Category::TextClass, Category::TeiHeader];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Head => "head",
            Category::TextClass => "textclass",
            Category::TeiHeader => "teiheader",
        }
    }

    /// The observers this category enables.
    pub fn observers(&self) -> Vec<Box<dyn Observer>> {
        match self {
            Category::Head => vec![Box::new(HeadObserver)],
            Category::TextClass => vec![Box::new(TextClassObserver)],
            Category::TeiHeader => {
                let mut observers: Vec<Box<dyn Observer>> = vec![Box::new(TextClassObserver)];
                observers.extend(
                    CasingObserver::header_casings()
                        .into_iter()
                        .map(|observer| Box::new(observer) as Box<dyn Observer>),
                );
                observers
            }
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// The enabled observers, in the order they were enabled.
///
/// Observers are deduplicated by name, so enabling two categories that share
/// an observer doesn't make it claim nodes twice.
#[derive(Default)]
pub struct Registry {
    observers: Vec<Box<dyn Observer>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every category enabled.
    pub fn all() -> Self {
        Self::from_categories(Category::ALL.iter().copied())
    }

    /// A registry with the observers of the given categories.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut registry = Self::new();
        for category in categories {
            for observer in category.observers() {
                registry.add(observer);
            }
        }
        registry
    }

    /// A registry from category names, such as `"teiheader"`.
    ///
    /// ```rust
    /// let registry = teifix::Registry::from_names(["head", "textclass"])?;
    /// assert_eq!(registry.names(), vec!["head-position", "textclass-casing"]);
    /// # Ok::<(), teifix::Error>(())
    /// ```
    pub fn from_names<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let categories = names
            .into_iter()
            .map(|name| name.as_ref().parse::<Category>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_categories(categories))
    }

    /// Enable an observer. Returns `false` if an observer with the same name
    /// was already enabled.
    pub fn add(&mut self, observer: Box<dyn Observer>) -> bool {
        if self.observers.iter().any(|o| o.name() == observer.name()) {
            debug!("observer {} already enabled", observer.name());
            return false;
        }
        self.observers.push(observer);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.observers.iter().map(|o| o.name()).collect()
    }

    pub fn observers(&self) -> impl Iterator<Item = &dyn Observer> + '_ {
        self.observers.iter().map(|o| o.as_ref())
    }

    /// The observer that claims `node`, if any.
    ///
    /// Every observer is asked. When more than one claims the node the
    /// enabled rule set is inconsistent and [`Error::AmbiguousClaim`] is
    /// returned.
    pub fn claim(&self, document: &Document, node: Node) -> Result<Option<&dyn Observer>, Error> {
        let mut claimed: Option<&dyn Observer> = None;
        for observer in self.observers() {
            if !observer.observe(document, node) {
                continue;
            }
            if let Some(first) = claimed {
                return Err(Error::AmbiguousClaim {
                    first: first.name(),
                    second: observer.name(),
                    location: document.location(node),
                });
            }
            claimed = Some(observer);
        }
        Ok(claimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AnyElement;

    impl Observer for AnyElement {
        fn name(&self) -> &'static str {
            "any-element"
        }

        fn observe(&self, document: &Document, node: Node) -> bool {
            document.is_element(node)
        }

        fn transform_node(&self, _document: &mut Document, _node: Node) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn test_category_names() {
        assert_eq!("TEIHEADER".parse::<Category>().unwrap(), Category::TeiHeader);
        assert_eq!(" head ".parse::<Category>().unwrap(), Category::Head);
        assert!(matches!(
            "footnotes".parse::<Category>(),
            Err(Error::UnknownCategory(name)) if name == "footnotes"
        ));
    }

    #[test]
    fn test_overlapping_categories_are_deduplicated() {
        let registry = Registry::from_names(["textclass", "teiheader"]).unwrap();
        let names = registry.names();
        assert_eq!(
            names.iter().filter(|name| **name == "textclass-casing").count(),
            1
        );
        assert_eq!(registry.len(), 11);
    }

    #[test]
    fn test_claim() {
        let registry = Registry::all();
        let doc = Document::parse("<teiHeader><textclass/><filedesc/><p/></teiHeader>").unwrap();
        let header = doc.document_element().unwrap();
        let claims = doc
            .element_children(header)
            .map(|node| registry.claim(&doc, node).unwrap().map(|o| o.name()))
            .collect::<Vec<_>>();
        assert_eq!(
            claims,
            vec![Some("textclass-casing"), Some("filedesc-casing"), None]
        );
    }

    #[test]
    fn test_double_claim_is_an_error() {
        let mut registry = Registry::from_categories([Category::TextClass]);
        registry.add(Box::new(AnyElement));
        let doc = Document::parse("<textclass/>").unwrap();
        let node = doc.document_element().unwrap();
        assert!(matches!(
            registry.claim(&doc, node),
            Err(Error::AmbiguousClaim {
                first: "textclass-casing",
                second: "any-element",
                ..
            })
        ));
    }
}
