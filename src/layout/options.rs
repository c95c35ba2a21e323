//! Tolerances and thresholds for page segmentation.

use crate::model::DEFAULT_PRIMARY_THRESHOLD;

/// Heuristic parameters used by [`Page`](super::Page) queries.
///
/// All distances are in page pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Bottom-coordinate tolerance for baseline grouping
    pub baseline_tolerance: i32,

    /// Wider baseline tolerance used when splitting a page into two columns
    pub column_baseline_tolerance: i32,

    /// Default tolerance for [`Page::aligned_left`](super::Page::aligned_left)
    pub aligned_left_tolerance: i32,

    /// Default tolerance for [`Page::aligned_right`](super::Page::aligned_right)
    pub aligned_right_tolerance: i32,

    /// Default tolerance for [`Page::left_lines`](super::Page::left_lines)
    pub left_lines_tolerance: i32,

    /// Default tolerance for [`Page::right_lines`](super::Page::right_lines)
    pub right_lines_tolerance: i32,

    /// Left-alignment tolerance for membership in the left column
    pub left_column_tolerance: i32,

    /// Right-alignment tolerance for membership in the right column
    pub right_column_tolerance: i32,

    /// Bottom-coordinate tolerance for lines sharing a printed row
    pub adjacency_tolerance: i32,

    /// Lines at the top of the print region no taller than this are running head
    pub header_line_height: i32,

    /// Horizontal centering tolerance for title lines
    pub title_center_tolerance: i32,

    /// A fused line must have more tokens than this
    pub fusion_min_tokens: usize,

    /// Name lines must use a font larger than this (points)
    pub name_min_font_size: u32,

    /// Share of primary-script characters a token needs
    pub primary_threshold: f64,
}

impl LayoutOptions {
    /// Create layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the baseline grouping tolerance.
    pub fn with_baseline_tolerance(mut self, tolerance: i32) -> Self {
        self.baseline_tolerance = tolerance;
        self
    }

    /// Set the baseline tolerance used for two-column splitting.
    pub fn with_column_baseline_tolerance(mut self, tolerance: i32) -> Self {
        self.column_baseline_tolerance = tolerance;
        self
    }

    /// Set the left and right column alignment tolerances.
    pub fn with_column_tolerances(mut self, left: i32, right: i32) -> Self {
        self.left_column_tolerance = left;
        self.right_column_tolerance = right;
        self
    }

    /// Set the maximum running-head line height.
    pub fn with_header_line_height(mut self, height: i32) -> Self {
        self.header_line_height = height;
        self
    }

    /// Set the title centering tolerance.
    pub fn with_title_center_tolerance(mut self, tolerance: i32) -> Self {
        self.title_center_tolerance = tolerance;
        self
    }

    /// Set the minimum token count (exclusive) for fused lines.
    pub fn with_fusion_min_tokens(mut self, tokens: usize) -> Self {
        self.fusion_min_tokens = tokens;
        self
    }

    /// Set the primary-script threshold for tokens.
    pub fn with_primary_threshold(mut self, threshold: f64) -> Self {
        self.primary_threshold = threshold;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            baseline_tolerance: 10,
            column_baseline_tolerance: 35,
            aligned_left_tolerance: 20,
            aligned_right_tolerance: 10,
            left_lines_tolerance: 30,
            right_lines_tolerance: 10,
            left_column_tolerance: 50,
            right_column_tolerance: 50,
            adjacency_tolerance: 10,
            header_line_height: 35,
            title_center_tolerance: 100,
            fusion_min_tokens: 4,
            name_min_font_size: 10,
            primary_threshold: DEFAULT_PRIMARY_THRESHOLD,
        }
    }
}
