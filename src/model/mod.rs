//! Layout model types for hOCR pages.
//!
//! This module holds the pure data side of the crate: box geometry, font
//! styles, script classification, the arena-backed layout tree and the
//! column views derived from it. Nothing here knows about markup.

mod column;
mod geometry;
pub mod script;
mod style;
mod tree;

pub use column::{Column, ColumnNumbers, ColumnSide};
pub use geometry::{Alignment, BBox, Point};
pub use script::{is_primary_script, is_punctuation, DEFAULT_PRIMARY_THRESHOLD};
pub use style::Style;
pub use tree::{LayoutTree, Node, NodeId, NodeKind, Token};
