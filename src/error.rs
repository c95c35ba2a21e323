//! Error types for hocrflow library.

use std::io;
use thiserror::Error;

use crate::model::NodeId;

/// Result type alias for hocrflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or editing layout trees.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as hOCR markup.
    #[error("Unknown format: not hOCR markup")]
    UnknownFormat,

    /// The markup is not well-formed.
    #[error("Markup parsing error: {0}")]
    Xml(String),

    /// No element classed `ocr_page` was found.
    #[error("No ocr_page element found")]
    MissingPage,

    /// A style descriptor lacks the required `font-size` property.
    #[error("Style is missing font-size")]
    MissingFontSize,

    /// A style descriptor could not be interpreted.
    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    /// A bounding box descriptor could not be interpreted.
    #[error("Invalid bbox: {0}")]
    InvalidBBox(String),

    /// A structural edit targeted a leaf node.
    #[error("Node {0} is not a span")]
    NotASpan(NodeId),

    /// The node is not a child of the given span.
    #[error("Node {child} is not a child of {parent}")]
    NotAChild {
        /// The span that was searched
        parent: NodeId,
        /// The node that was not found
        child: NodeId,
    },

    /// Insertion index past the end of a span.
    #[error("Index {index} is out of range (span has {len} children)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current number of children
        len: usize,
    },

    /// The edit would corrupt the tree (for example, a node adopting its ancestor).
    #[error("Invalid tree structure: {0}")]
    InvalidStructure(String),

    /// Error during rendering (XML, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
