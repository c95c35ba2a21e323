//! JSON reports for pages and volumes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::Page;
use crate::model::{BBox, ColumnNumbers, ColumnSide};
use crate::volume::Volume;

use super::clean_line_text;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Layout summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub side: ColumnSide,
    pub number: Option<String>,
    /// Percentage of words in the primary script
    pub percent_primary: u32,
    /// Whether the column counts as a primary-script column
    pub primary: bool,
    pub lines: Vec<String>,
}

/// Layout summary of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub number: u32,
    pub bbox: BBox,
    pub print_region: Option<BBox>,
    pub running_head: Option<String>,
    pub column_numbers: ColumnNumbers,
    pub columns: Vec<ColumnReport>,
    pub titles: Vec<String>,
    pub names: Vec<String>,
    /// Lines still detected as fused
    pub fused_lines: usize,
}

impl PageReport {
    /// Summarize a page.
    pub fn from_page(page: &Page) -> Self {
        let threshold = page.options().primary_threshold;
        let primary_sides: Vec<ColumnSide> =
            page.primary_columns().iter().map(|c| c.side).collect();

        let columns = page
            .columns()
            .into_iter()
            .filter(|c| !c.is_empty())
            .map(|c| ColumnReport {
                side: c.side,
                number: c.number.clone(),
                percent_primary: c.percent_primary(page.tree(), threshold),
                primary: primary_sides.contains(&c.side),
                lines: c.lines.iter().map(|&l| clean_line_text(page, l)).collect(),
            })
            .collect();

        Self {
            number: page.number(),
            bbox: page.bbox(),
            print_region: page.print_region(),
            running_head: page.running_head_text(),
            column_numbers: page.column_numbers(),
            columns,
            titles: page.title_strings(),
            names: page
                .names_in_titles()
                .into_iter()
                .map(|l| clean_line_text(page, l))
                .collect(),
            fused_lines: page.fused_lines().len(),
        }
    }
}

/// Layout summary of a volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeReport {
    pub name: String,
    pub pages: Vec<PageReport>,
}

impl VolumeReport {
    pub fn from_volume(volume: &Volume) -> Self {
        Self {
            name: volume.name().to_string(),
            pages: volume.pages().iter().map(PageReport::from_page).collect(),
        }
    }
}

fn serialize<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a page report to JSON.
pub fn to_json(page: &Page, format: JsonFormat) -> Result<String> {
    serialize(&PageReport::from_page(page), format)
}

/// Convert a volume report to JSON.
pub fn volume_to_json(volume: &Volume, format: JsonFormat) -> Result<String> {
    serialize(&VolumeReport::from_volume(volume), format)
}
