//! The built-in observers.

mod casing;
mod head;
mod textclass;

pub use casing::{CasingObserver, HEADER_CASINGS};
pub use head::HeadObserver;
pub use textclass::TextClassObserver;
