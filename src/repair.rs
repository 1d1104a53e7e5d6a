use std::borrow::Cow;

use crate::document::Document;
use crate::engine::{Engine, Report};
use crate::error::Error;
use crate::registry::Registry;

/// The result of repairing one document.
#[derive(Debug, Clone)]
pub struct Repaired<O> {
    /// The corrected document. When nothing needed correcting this is the
    /// input itself.
    pub output: O,
    pub report: Report,
}

impl<O> Repaired<O> {
    /// Whether any correction was made.
    pub fn changed(&self) -> bool {
        !self.report.is_clean()
    }
}

/// Repair a document given as a string.
///
/// Either the whole document is corrected or an error is returned; there is
/// no partial result.
///
/// ```rust
/// let registry = teifix::Registry::from_names(["textclass"])?;
/// let repaired = teifix::repair_str(r#"<textclass attrib="b"/>"#, &registry)?;
/// assert_eq!(repaired.output, r#"<textClass attrib="b"/>"#);
/// assert!(repaired.changed());
/// # Ok::<(), teifix::Error>(())
/// ```
pub fn repair_str<'a>(
    input: &'a str,
    registry: &Registry,
) -> Result<Repaired<Cow<'a, str>>, Error> {
    let mut document = Document::parse(input)?;
    let report = Engine::new(registry).run(&mut document)?;
    let output = if report.is_clean() {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(document.serialize_to_string()?)
    };
    Ok(Repaired { output, report })
}

/// Repair a document given as bytes in any encoding the XML declaration or
/// a byte order mark announces. The output is in the same encoding.
pub fn repair_bytes<'a>(
    input: &'a [u8],
    registry: &Registry,
) -> Result<Repaired<Cow<'a, [u8]>>, Error> {
    let mut document = Document::parse_bytes(input)?;
    let report = Engine::new(registry).run(&mut document)?;
    let output = if report.is_clean() {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(document.serialize_to_bytes()?)
    };
    Ok(Repaired { output, report })
}
