//! Template syntax: regions, the transfer policy, and the raw tag scanner.
//!
//! The scanner deliberately does not parse Latte or HTML. It tracks which
//! kind of span it is in (markup, markup tag, template tag, quoted string)
//! just well enough to cut template tags out of the document with exact
//! offsets. See [`Scanner`].

mod cursor;
mod error;
pub mod policy;
mod raw_tag;
mod region;
mod scanner;

pub use cursor::{ScanPosition, SubMatch};
pub use error::ScanError;
pub use raw_tag::{RawTag, RawTagKind};
pub use region::{Region, RegionStack};
pub use scanner::{Scanner, scan};
