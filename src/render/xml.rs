//! XML rendering for pages and volumes.
//!
//! ```text
//! <page n='12' running_head='…'>
//! <column n='345' side='left'><cb n='345' />
//! line text
//! </column>
//! </page>
//! ```

use std::fmt::Write as _;

use html_escape::{encode_single_quoted_attribute, encode_text};

use crate::error::{Error, Result};
use crate::layout::Page;
use crate::volume::Volume;

use super::{clean_line_text, selected_columns, RenderOptions};

/// Render one page as XML.
pub fn to_xml(page: &Page, options: &RenderOptions) -> Result<String> {
    let mut out = String::new();
    write_page(&mut out, page, options).map_err(|e| Error::Render(e.to_string()))?;
    Ok(out)
}

/// Render a volume as XML, one `<page>` per page.
pub fn volume_to_xml(volume: &Volume, options: &RenderOptions) -> Result<String> {
    let mut out = String::new();
    let render = |out: &mut String| -> std::fmt::Result {
        writeln!(
            out,
            "<volume n='{}'>",
            encode_single_quoted_attribute(volume.name())
        )?;
        for page in volume.pages() {
            write_page(out, page, options)?;
        }
        writeln!(out, "</volume>")
    };
    render(&mut out).map_err(|e| Error::Render(e.to_string()))?;
    Ok(out)
}

fn write_page(out: &mut String, page: &Page, options: &RenderOptions) -> std::fmt::Result {
    write!(out, "<page n='{}'", page.number())?;
    if options.include_running_head {
        if let Some(head) = page.running_head_text() {
            write!(out, " running_head='{}'", encode_single_quoted_attribute(&head))?;
        }
    }
    writeln!(out, ">")?;

    for column in selected_columns(page, options) {
        match &column.number {
            Some(n) => write!(
                out,
                "<column n='{}' side='{}'>",
                encode_single_quoted_attribute(n),
                column.side
            )?,
            None => write!(out, "<column side='{}'>", column.side)?,
        }
        match column.numeric_label() {
            Some(n) => writeln!(out, "<cb n='{}' />", n)?,
            None => writeln!(out, "<cb/>")?,
        }
        for &line in &column.lines {
            writeln!(out, "{}", encode_text(&clean_line_text(page, line)))?;
        }
        writeln!(out, "</column>")?;
    }

    writeln!(out, "</page>")
}
