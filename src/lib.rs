#![forbid(unsafe_code)]

//! Repair structurally malformed TEI documents.
//!
//! A document is parsed into a mutable tree, walked once in document order,
//! and every element is offered to a set of [`Observer`]s. An observer that
//! claims an element corrects it in place. The repaired tree is serialized
//! back, keeping everything the corrections didn't touch as it was.
//!
//! ```rust
//! use teifix::{repair_str, Registry};
//!
//! let registry = Registry::from_names(["head"])?;
//! let repaired = repair_str(
//!     "<TEI><body><div><p>a</p><head>B</head><p>b</p></div></body></TEI>",
//!     &registry,
//! )?;
//! assert_eq!(
//!     repaired.output,
//!     "<TEI><body><div><p>a</p></div><div><head>B</head><p>b</p></div></body></TEI>"
//! );
//! # Ok::<(), teifix::Error>(())
//! ```

mod access;
mod adapter;
pub mod batch;
mod config;
mod document;
mod encoding;
mod engine;
mod entity;
mod error;
mod idmap;
mod manipulation;
mod name;
mod namespace;
mod observer;
pub mod observers;
mod parse;
mod prefix;
mod registry;
mod repair;
mod serialize;
mod xmlvalue;

pub use access::NodeEdge;
pub use config::{Config, DEFAULT_CONFIG_FILE};
pub use document::{Document, Node};
pub use engine::{Engine, Fix, Report};
pub use error::Error;
pub use name::NameId;
pub use namespace::{NamespaceId, TEI_NAMESPACE, XML_NAMESPACE};
pub use observer::Observer;
pub use prefix::PrefixId;
pub use registry::{Category, Registry};
pub use repair::{repair_bytes, repair_str, Repaired};
pub use xmlvalue::{
    Attributes, Comment, Element, Prefixes, ProcessingInstruction, Text, Value, ValueType,
};
