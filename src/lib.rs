//! # hocrflow
//!
//! Reading-order and column reconstruction for bilingual hOCR pages.
//!
//! Scanned critical editions often print two scripts side by side, one per
//! column. OCR engines read such pages into hOCR markup, but now and then
//! merge a row of both columns into one line. This library builds a layout
//! tree from each page, repairs those fused lines, and recovers the page's
//! columns, running head, column numbers and titles.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hocrflow::{parse_file, render};
//!
//! fn main() -> hocrflow::Result<()> {
//!     // Parse an hOCR page (fused lines are repaired by default)
//!     let page = parse_file("page_0071.html")?;
//!
//!     // Render the primary-script columns as XML
//!     let options = render::RenderOptions::default();
//!     let xml = render::to_xml(&page, &options)?;
//!     println!("{}", xml);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Arena layout tree**: page, block, paragraph, line and word nodes with
//!   boxes kept in step with every structural edit
//! - **Fused-line repair**: script-aware splitting of lines that span both columns
//! - **Page segmentation**: margins, baseline rows, columns, running head, titles
//! - **Parallel volumes**: page directories loaded and repaired with Rayon
//! - **Output**: XML, plain text and JSON reports

pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;
pub mod volume;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_hocr, HocrFormat};
pub use error::{Error, Result};
pub use layout::{LayoutOptions, Page};
pub use model::{
    Alignment, BBox, Column, ColumnNumbers, ColumnSide, LayoutTree, Node, NodeId, NodeKind, Point,
    Style, Token,
};
pub use parser::{normalize_markup, ErrorMode, HocrParser, PageSelection, ParseOptions};
pub use render::{JsonFormat, RenderOptions};
pub use volume::Volume;

use std::path::Path;

/// Parse an hOCR page file.
///
/// The page is numbered 1; see [`parse_file_with_options`] and
/// [`HocrParser::parse_page`] to control numbering and parsing.
///
/// # Example
///
/// ```no_run
/// use hocrflow::parse_file;
///
/// let page = parse_file("page_0071.html").unwrap();
/// println!("Lines: {}", page.lines().len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Page> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse an hOCR page file with custom options.
///
/// # Example
///
/// ```no_run
/// use hocrflow::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient().with_repair(false);
/// let page = parse_file_with_options("page_0071.html", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Page> {
    let parser = HocrParser::open_with_options(path, options)?;
    parser.parse_page(1)
}

/// Parse hOCR markup held in memory.
pub fn parse_str(markup: &str) -> Result<Page> {
    parser::parse_page(markup, 1, &ParseOptions::default())
}

/// Parse hOCR markup held in memory with custom options.
pub fn parse_str_with_options(markup: &str, number: u32, options: &ParseOptions) -> Result<Page> {
    parser::parse_page(markup, number, options)
}

/// Load a directory of hOCR page files as a volume.
///
/// # Example
///
/// ```no_run
/// use hocrflow::{open_volume, ParseOptions};
///
/// let volume = open_volume("32101007506148", &ParseOptions::default()).unwrap();
/// println!("Pages: {}", volume.page_count());
/// ```
pub fn open_volume<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Volume> {
    Volume::from_dir(path, options)
}

/// Parse an hOCR page file and render its primary-script columns as XML.
pub fn to_xml<P: AsRef<Path>>(path: P) -> Result<String> {
    let page = parse_file(path)?;
    render::to_xml(&page, &RenderOptions::default())
}

/// Parse an hOCR page file and render its primary-script columns as text.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let page = parse_file(path)?;
    render::to_text(&page, &RenderOptions::default())
}

/// Parse an hOCR page file and produce its JSON layout report.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let page = parse_file(path)?;
    render::to_json(&page, format)
}
