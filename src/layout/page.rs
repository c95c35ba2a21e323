//! A page's layout tree together with its segmentation queries.
//!
//! Margins, print region and midline are measured over the page's lines.
//! A page without lines has none of them, and every query built on them
//! returns an empty result for such a page.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::script::primary_ratio;
use crate::model::{BBox, Column, ColumnNumbers, ColumnSide, LayoutTree, NodeId, NodeKind, Style};

use super::options::LayoutOptions;

/// Share above which a set of tokens counts as primary-script.
pub(crate) const MAJORITY: f64 = 0.5;

fn digits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

/// One OCR page.
#[derive(Debug, Clone)]
pub struct Page {
    number: u32,
    tree: LayoutTree,
    options: LayoutOptions,
}

impl Page {
    /// Wrap a built layout tree.
    pub fn new(number: u32, tree: LayoutTree, options: LayoutOptions) -> Self {
        Self {
            number,
            tree,
            options,
        }
    }

    /// A page with no content.
    pub fn blank(number: u32) -> Self {
        Self::new(
            number,
            LayoutTree::new(NodeKind::Page, BBox::ZERO),
            LayoutOptions::default(),
        )
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn set_number(&mut self, number: u32) {
        self.number = number;
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// Mutable access to the tree. Columns computed earlier go stale after edits.
    pub fn tree_mut(&mut self) -> &mut LayoutTree {
        &mut self.tree
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: LayoutOptions) {
        self.options = options;
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// The page box from the markup.
    pub fn bbox(&self) -> BBox {
        self.tree.bbox(self.tree.root())
    }

    /// Whether the page has no lines.
    pub fn is_blank(&self) -> bool {
        self.lines().is_empty()
    }

    /// Lines in document order.
    pub fn lines(&self) -> Vec<NodeId> {
        self.tree.lines(self.tree.root())
    }

    pub fn blocks(&self) -> Vec<NodeId> {
        self.tree.blocks(self.tree.root())
    }

    pub fn tokens(&self) -> Vec<NodeId> {
        self.tree.tokens(self.tree.root())
    }

    pub fn words(&self) -> Vec<NodeId> {
        self.tree.words(self.tree.root())
    }

    /// Full page text in document order.
    pub fn text(&self) -> String {
        self.tree.text(self.tree.root())
    }

    pub fn line_text(&self, line: NodeId) -> String {
        self.tree.text(line)
    }

    /// Lines ordered by top coordinate; ties keep document order.
    pub fn lines_sorted_by_top(&self) -> Vec<NodeId> {
        let mut lines = self.lines();
        lines.sort_by_key(|&l| self.tree.bbox(l).top());
        lines
    }

    /// Style of a line: its resolved style, else that of its first styled token.
    pub fn line_style(&self, line: NodeId) -> Option<&Style> {
        self.tree.style(line).or_else(|| {
            self.tree
                .tokens(line)
                .into_iter()
                .find_map(|t| self.tree.style(t))
        })
    }

    fn line_boxes(&self) -> Vec<BBox> {
        self.lines().into_iter().map(|l| self.tree.bbox(l)).collect()
    }

    /// Distance from the page's left edge to the leftmost line.
    pub fn margin_left(&self) -> Option<i32> {
        let min = self.line_boxes().iter().map(BBox::left).min()?;
        Some(min.saturating_sub(self.bbox().left()))
    }

    /// Distance from the rightmost line to the page's right edge.
    pub fn margin_right(&self) -> Option<i32> {
        let max = self.line_boxes().iter().map(BBox::right).max()?;
        Some(self.bbox().right().saturating_sub(max))
    }

    /// Distance from the page's top edge to the highest line.
    pub fn margin_top(&self) -> Option<i32> {
        let min = self.line_boxes().iter().map(BBox::top).min()?;
        Some(min.saturating_sub(self.bbox().top()))
    }

    /// Distance from the lowest line to the page's bottom edge.
    pub fn margin_bottom(&self) -> Option<i32> {
        let max = self.line_boxes().iter().map(BBox::bottom).max()?;
        Some(self.bbox().bottom().saturating_sub(max))
    }

    /// The page box inset by all four margins.
    pub fn print_region(&self) -> Option<BBox> {
        let page = self.bbox();
        Some(BBox::new(
            page.left().saturating_add(self.margin_left()?),
            page.top().saturating_add(self.margin_top()?),
            page.right().saturating_sub(self.margin_right()?),
            page.bottom().saturating_sub(self.margin_bottom()?),
        ))
    }

    /// Half the width of the print region.
    pub fn midline(&self) -> Option<f64> {
        self.print_region().map(|r| f64::from(r.width()) / 2.0)
    }

    /// Group lines sitting on the same printed row.
    ///
    /// Lines are taken in bottom order; a line joins the current group when
    /// its bottom is within `tolerance` of the bottom of the group's first line.
    pub fn group_lines_by_baseline(&self, tolerance: i32) -> Vec<Vec<NodeId>> {
        let mut lines = self.lines();
        lines.sort_by_key(|&l| self.tree.bbox(l).bottom());

        let mut groups = Vec::new();
        let mut current: Vec<NodeId> = Vec::new();
        let mut baseline = 0;
        for line in lines {
            let bottom = self.tree.bbox(line).bottom();
            if !current.is_empty() && bottom.saturating_sub(baseline).saturating_abs() < tolerance {
                current.push(line);
            } else {
                if !current.is_empty() {
                    groups.push(std::mem::take(&mut current));
                }
                current.push(line);
                baseline = bottom;
            }
        }
        if !current.is_empty() {
            groups.push(current);
        }
        groups
    }

    /// Split baseline groups into a left and a right column at the midline.
    pub fn group_lines_into_columns(&self) -> (Vec<NodeId>, Vec<NodeId>) {
        let Some(midline) = self.midline() else {
            return (Vec::new(), Vec::new());
        };

        let mut left = Vec::new();
        let mut right = Vec::new();
        for group in self.group_lines_by_baseline(self.options.column_baseline_tolerance) {
            for line in group {
                if f64::from(self.tree.bbox(line).left()) < midline {
                    left.push(line);
                } else {
                    right.push(line);
                }
            }
        }
        (left, right)
    }

    /// Lines whose bottom is within the adjacency tolerance of `line`'s bottom,
    /// `line` included.
    pub fn lines_adjacent(&self, line: NodeId) -> Vec<NodeId> {
        let bottom = self.tree.bbox(line).bottom();
        let tolerance = self.options.adjacency_tolerance;
        self.lines()
            .into_iter()
            .filter(|&l| bottom.saturating_sub(self.tree.bbox(l).bottom()).saturating_abs() <= tolerance)
            .collect()
    }

    /// Lines on the same row as the topmost line.
    pub fn header_lines(&self) -> Vec<NodeId> {
        match self.lines_sorted_by_top().first() {
            Some(&first) => self.lines_adjacent(first),
            None => Vec::new(),
        }
    }

    /// Lines starting at or left of `x`.
    pub fn lines_aligned_left(&self, x: i32) -> Vec<NodeId> {
        self.lines()
            .into_iter()
            .filter(|&l| self.tree.bbox(l).left() <= x)
            .collect()
    }

    /// Blocks starting at or left of `x`.
    pub fn blocks_aligned_left(&self, x: i32) -> Vec<NodeId> {
        self.blocks()
            .into_iter()
            .filter(|&b| self.tree.bbox(b).left() <= x)
            .collect()
    }

    /// Labels printed in the header: the first number of each of the two
    /// topmost lines. The right label is only read when the left one exists.
    pub fn column_numbers(&self) -> ColumnNumbers {
        let lines = self.lines_sorted_by_top();
        let mut numbers = ColumnNumbers::default();
        if lines.len() < 2 {
            return numbers;
        }

        let first_number = |line: NodeId| {
            digits_regex()
                .find(self.tree.text(line).trim())
                .map(|m| m.as_str().to_string())
        };
        numbers.left = first_number(lines[0]);
        if numbers.left.is_some() {
            numbers.right = first_number(lines[1]);
        }
        numbers
    }

    /// Short lines flush with the top of the print region.
    pub fn running_head(&self) -> Vec<NodeId> {
        let Some(region) = self.print_region() else {
            return Vec::new();
        };
        self.lines()
            .into_iter()
            .filter(|&l| {
                let bbox = self.tree.bbox(l);
                bbox.top() == region.top() && bbox.height() <= self.options.header_line_height
            })
            .collect()
    }

    /// Running-head lines joined by a space, if any.
    pub fn running_head_text(&self) -> Option<String> {
        let text = self
            .running_head()
            .into_iter()
            .map(|l| self.tree.text(l))
            .collect::<Vec<_>>()
            .join(" ");
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Whether `line` starts within `tolerance` of the print region's left edge.
    pub fn aligned_left_within(&self, line: NodeId, tolerance: i32) -> bool {
        self.print_region()
            .is_some_and(|r| self.tree.bbox(line).left().saturating_sub(r.left()) <= tolerance)
    }

    /// Whether `line` ends within `tolerance` of the print region's right edge.
    pub fn aligned_right_within(&self, line: NodeId, tolerance: i32) -> bool {
        self.print_region()
            .is_some_and(|r| r.right().saturating_sub(self.tree.bbox(line).right()).saturating_abs() <= tolerance)
    }

    pub fn aligned_left(&self, line: NodeId) -> bool {
        self.aligned_left_within(line, self.options.aligned_left_tolerance)
    }

    pub fn aligned_right(&self, line: NodeId) -> bool {
        self.aligned_right_within(line, self.options.aligned_right_tolerance)
    }

    pub fn left_lines_within(&self, tolerance: i32) -> Vec<NodeId> {
        self.lines()
            .into_iter()
            .filter(|&l| self.aligned_left_within(l, tolerance))
            .collect()
    }

    pub fn right_lines_within(&self, tolerance: i32) -> Vec<NodeId> {
        self.lines()
            .into_iter()
            .filter(|&l| self.aligned_right_within(l, tolerance))
            .collect()
    }

    pub fn left_lines(&self) -> Vec<NodeId> {
        self.left_lines_within(self.options.left_lines_tolerance)
    }

    pub fn right_lines(&self) -> Vec<NodeId> {
        self.right_lines_within(self.options.right_lines_tolerance)
    }

    pub fn left_column(&self) -> Column {
        Column::new(
            self.left_lines_within(self.options.left_column_tolerance),
            ColumnSide::Left,
            self.column_numbers().left,
        )
    }

    pub fn right_column(&self) -> Column {
        Column::new(
            self.right_lines_within(self.options.right_column_tolerance),
            ColumnSide::Right,
            self.column_numbers().right,
        )
    }

    /// Left and right columns.
    pub fn columns(&self) -> [Column; 2] {
        [self.left_column(), self.right_column()]
    }

    fn is_primary_column(&self, column: &Column) -> bool {
        !column.is_empty()
            && column.primary_ratio(&self.tree, self.options.primary_threshold) > MAJORITY
    }

    /// The first column, left before right, whose tokens are mostly primary-script.
    pub fn primary_column(&self) -> Option<Column> {
        self.columns()
            .into_iter()
            .find(|c| self.is_primary_column(c))
    }

    /// Every column whose tokens are mostly primary-script.
    pub fn primary_columns(&self) -> Vec<Column> {
        self.columns()
            .into_iter()
            .filter(|c| self.is_primary_column(c))
            .collect()
    }

    /// Horizontal gap between the two lines of every two-line row, once per line.
    pub fn gutters(&self) -> Vec<i32> {
        self.lines()
            .into_iter()
            .filter_map(|line| {
                let mut row = self.lines_adjacent(line);
                if row.len() != 2 {
                    return None;
                }
                row.sort_by_key(|&l| self.tree.bbox(l).left());
                Some(self.tree.bbox(row[1]).left().saturating_sub(self.tree.bbox(row[0]).right()))
            })
            .collect()
    }

    /// Share (0.0 to 1.0) of the page's tokens that are primary-script.
    pub fn primary_ratio(&self) -> f64 {
        primary_ratio(
            self.tokens()
                .into_iter()
                .map(|t| self.tree.is_primary(t, self.options.primary_threshold)),
        )
    }
}
