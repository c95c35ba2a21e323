//! Reading columns derived from a page's lines.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::script::{primary_percent, primary_ratio};
use super::tree::{LayoutTree, NodeId};

/// Which side of the page a column sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSide {
    Left,
    Right,
}

impl ColumnSide {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnSide::Left => "left",
            ColumnSide::Right => "right",
        }
    }
}

impl fmt::Display for ColumnSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Printed column numbers found in the page header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNumbers {
    /// Label of the left column
    pub left: Option<String>,
    /// Label of the right column
    pub right: Option<String>,
}

impl ColumnNumbers {
    pub fn get(&self, side: ColumnSide) -> Option<&str> {
        match side {
            ColumnSide::Left => self.left.as_deref(),
            ColumnSide::Right => self.right.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// A non-owning view over the lines of one reading column.
///
/// Columns are recomputed from the page on every request and hold only
/// line ids, so they go stale if the tree is edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Lines in page order
    pub lines: Vec<NodeId>,
    /// Side of the page
    pub side: ColumnSide,
    /// Printed column label, if any
    pub number: Option<String>,
}

impl Column {
    /// Create a new column.
    pub fn new(lines: Vec<NodeId>, side: ColumnSide, number: Option<String>) -> Self {
        Self {
            lines,
            side,
            number,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The label, only when it is purely numeric.
    pub fn numeric_label(&self) -> Option<&str> {
        self.number
            .as_deref()
            .filter(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    }

    pub fn tokens(&self, tree: &LayoutTree) -> Vec<NodeId> {
        self.lines.iter().flat_map(|&l| tree.tokens(l)).collect()
    }

    pub fn words(&self, tree: &LayoutTree) -> Vec<NodeId> {
        self.lines.iter().flat_map(|&l| tree.words(l)).collect()
    }

    /// Text of each line, in order.
    pub fn line_texts(&self, tree: &LayoutTree) -> Vec<String> {
        self.lines.iter().map(|&l| tree.text(l)).collect()
    }

    /// Share (0.0 to 1.0) of the column's tokens, punctuation included, that are primary-script.
    pub fn primary_ratio(&self, tree: &LayoutTree, threshold: f64) -> f64 {
        primary_ratio(
            self.tokens(tree)
                .into_iter()
                .map(|t| tree.is_primary(t, threshold)),
        )
    }

    /// Percentage (0-100) of the column's words that are primary-script.
    pub fn percent_primary(&self, tree: &LayoutTree, threshold: f64) -> u32 {
        primary_percent(
            self.words(tree)
                .into_iter()
                .map(|w| tree.is_primary(w, threshold)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, NodeKind, Token};

    #[test]
    fn test_column_statistics() {
        let mut tree = LayoutTree::new(NodeKind::Page, BBox::ZERO);
        let root = tree.root();
        let line = tree.new_span(NodeKind::Line, BBox::ZERO, None);
        tree.append(root, line).unwrap();
        for text in ["λόγος", "καὶ", "verbum", "."] {
            let t = tree.new_token(Token::new(text, Some(" ".into())), BBox::ZERO, None);
            tree.append(line, t).unwrap();
        }

        let column = Column::new(vec![line], ColumnSide::Left, Some("12".into()));
        assert_eq!(column.len(), 1);
        assert_eq!(column.tokens(&tree).len(), 4);
        assert_eq!(column.words(&tree).len(), 3);
        assert_eq!(column.primary_ratio(&tree, 0.5), 0.5);
        assert_eq!(column.percent_primary(&tree, 0.5), 67);
        assert_eq!(column.numeric_label(), Some("12"));
        assert_eq!(column.line_texts(&tree), vec!["λόγος καὶ verbum . "]);
    }

    #[test]
    fn test_numeric_label() {
        let column = Column::new(vec![], ColumnSide::Right, Some("XII".into()));
        assert_eq!(column.numeric_label(), None);
        assert!(column.is_empty());
        assert_eq!(column.side.to_string(), "right");
    }

    #[test]
    fn test_column_numbers() {
        let numbers = ColumnNumbers {
            left: Some("123".into()),
            right: None,
        };
        assert_eq!(numbers.get(ColumnSide::Left), Some("123"));
        assert_eq!(numbers.get(ColumnSide::Right), None);
        assert!(!numbers.is_empty());
        assert!(ColumnNumbers::default().is_empty());
    }
}
