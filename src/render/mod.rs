//! Rendering module for converting repaired pages to output formats.

mod json;
mod options;
mod text;
mod xml;

pub use json::{to_json, volume_to_json, ColumnReport, JsonFormat, PageReport, VolumeReport};
pub use options::RenderOptions;
pub use text::{to_text, volume_to_text};
pub use xml::{to_xml, volume_to_xml};

use crate::layout::Page;
use crate::model::{Column, NodeId};

/// Columns a renderer should emit for `page`.
fn selected_columns(page: &Page, options: &RenderOptions) -> Vec<Column> {
    if options.primary_only {
        page.primary_columns()
    } else {
        page.columns().into_iter().filter(|c| !c.is_empty()).collect()
    }
}

/// Line text with runs of whitespace collapsed to one space.
fn clean_line_text(page: &Page, line: NodeId) -> String {
    page.line_text(line)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
