//! Plain text rendering for pages and volumes.

use crate::error::Result;
use crate::layout::Page;
use crate::volume::Volume;

use super::{clean_line_text, selected_columns, RenderOptions};

/// Convert a page to plain text: each selected column's lines, columns
/// separated by a blank line.
///
/// With the running head included, it opens the text as its own block and
/// its lines are left out of the columns.
pub fn to_text(page: &Page, options: &RenderOptions) -> Result<String> {
    let mut blocks = Vec::new();
    let mut head_lines = Vec::new();
    if options.include_running_head {
        if let Some(head) = page.running_head_text() {
            blocks.push(head);
            head_lines = page.running_head();
        }
    }

    for column in selected_columns(page, options) {
        let lines: Vec<String> = column
            .lines
            .iter()
            .filter(|&&line| !head_lines.contains(&line))
            .map(|&line| clean_line_text(page, line))
            .filter(|text| !text.is_empty())
            .collect();
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    Ok(blocks.join("\n\n"))
}

/// Convert a volume to plain text, pages separated by a blank line.
pub fn volume_to_text(volume: &Volume, options: &RenderOptions) -> Result<String> {
    let mut pages = Vec::with_capacity(volume.page_count());
    for page in volume.pages() {
        let text = to_text(page, options)?;
        if !text.is_empty() {
            pages.push(text);
        }
    }
    Ok(pages.join("\n\n"))
}
