//! Fused-line detection and repair.
//!
//! The OCR engine sometimes reads a row of a two-column page as one line
//! running from the left column into the right one. Such a line starts in
//! one script and ends in the other. Repair splits it at its midpoint, moves
//! tokens across the split until the right fragment is free of
//! primary-script words (or the left fragment is, when the line starts in
//! the secondary script), and puts the fragments back into reading order.

use crate::error::{Error, Result};
use crate::model::script::primary_ratio;
use crate::model::{BBox, LayoutTree, NodeId, NodeKind};

use super::page::{Page, MAJORITY};

fn half_is_primary(tree: &LayoutTree, words: &[NodeId], threshold: f64) -> bool {
    primary_ratio(words.iter().map(|&w| tree.is_primary(w, threshold))) > MAJORITY
}

/// Whether most words in the first half of `line` are primary-script.
pub fn starts_primary(tree: &LayoutTree, line: NodeId, threshold: f64) -> bool {
    let words = tree.words(line);
    half_is_primary(tree, &words[..words.len() / 2], threshold)
}

/// Whether most words in the second half of `line` are primary-script.
pub fn ends_primary(tree: &LayoutTree, line: NodeId, threshold: f64) -> bool {
    let words = tree.words(line);
    half_is_primary(tree, &words[words.len() / 2..], threshold)
}

/// A line whose halves are in different scripts.
pub fn is_fused(tree: &LayoutTree, line: NodeId, threshold: f64) -> bool {
    starts_primary(tree, line, threshold) != ends_primary(tree, line, threshold)
}

/// Whether `b` sits to the right of `a`, at most `padding` pixels away.
pub fn precedes(tree: &LayoutTree, a: NodeId, b: NodeId, padding: i32) -> bool {
    tree.bbox(a).is_to_the_left_of(&tree.bbox(b), padding)
}

/// `round(n / 2)` with ties to even.
fn split_point(n: usize) -> usize {
    let half = n / 2;
    if n % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half
    }
}

/// Move the tokens of `line` into two new detached lines, split at the midpoint.
///
/// The new lines copy the class and style of `line`, which is left empty.
/// Returns `None` for a line without tokens.
pub fn split(tree: &mut LayoutTree, line: NodeId) -> Result<Option<(NodeId, NodeId)>> {
    let tokens = tree.tokens(line);
    if tokens.is_empty() {
        return Ok(None);
    }

    let mid = split_point(tokens.len());
    let left = new_fragment(tree, line);
    let right = new_fragment(tree, line);
    for (i, &token) in tokens.iter().enumerate() {
        let target = if i < mid { left } else { right };
        tree.append(target, token)?;
    }

    log::debug!(
        "Split line {} at token {} of {}",
        line,
        mid,
        tokens.len()
    );
    Ok(Some((left, right)))
}

fn new_fragment(tree: &mut LayoutTree, line: NodeId) -> NodeId {
    let style = tree.style(line).cloned();
    let class = tree.node(line).class().to_string();
    let fragment = tree.new_span(NodeKind::Line, BBox::ZERO, style);
    tree.set_class(fragment, class);
    fragment
}

/// Split a fused line and rebalance the fragments by script.
///
/// When the line starts in the primary script, tokens move from the head of
/// the right fragment to the tail of the left one while the right fragment
/// still holds primary-script words; punctuation then at the head of the
/// right fragment follows each moved token. The mirror case moves tokens
/// from the tail of the left fragment to the head of the right one.
///
/// Returns `None`, leaving the line untouched, when it is not fused.
pub fn unfuse(
    tree: &mut LayoutTree,
    line: NodeId,
    threshold: f64,
) -> Result<Option<(NodeId, NodeId)>> {
    let starts = starts_primary(tree, line, threshold);
    let ends = ends_primary(tree, line, threshold);
    if starts == ends {
        return Ok(None);
    }

    let Some((left, right)) = split(tree, line)? else {
        return Ok(None);
    };

    if starts {
        while tree.percent_primary(right, threshold) > 0 {
            let Some(token) = tree.popleft(right) else {
                break;
            };
            tree.append(left, token)?;
            while let Some(next) = tree.peekleft(right).filter(|&t| tree.is_punct(t)) {
                tree.remove(right, next)?;
                tree.append(left, next)?;
            }
        }
    } else {
        while tree.percent_primary(left, threshold) > 0 {
            let Some(token) = tree.pop(left) else {
                break;
            };
            tree.prepend(right, token)?;
            while let Some(prev) = tree.peek(left).filter(|&t| tree.is_punct(t)) {
                tree.remove(left, prev)?;
                tree.prepend(right, prev)?;
            }
        }
    }

    log::debug!(
        "Unfused line {}: {} token(s) left, {} token(s) right",
        line,
        tree.len(left),
        tree.len(right)
    );
    Ok(Some((left, right)))
}

impl Page {
    /// Whether the first half of `line` is mostly primary-script.
    pub fn starts_primary(&self, line: NodeId) -> bool {
        starts_primary(self.tree(), line, self.options().primary_threshold)
    }

    /// Whether the second half of `line` is mostly primary-script.
    pub fn ends_primary(&self, line: NodeId) -> bool {
        ends_primary(self.tree(), line, self.options().primary_threshold)
    }

    /// Whether `line` is script-mixed.
    pub fn is_fused(&self, line: NodeId) -> bool {
        is_fused(self.tree(), line, self.options().primary_threshold)
    }

    /// Left-column lines wider than the midline, with more than the minimum
    /// number of tokens, whose halves are in different scripts.
    pub fn fused_lines(&self) -> Vec<NodeId> {
        let Some(midline) = self.midline() else {
            return Vec::new();
        };
        let min_tokens = self.options().fusion_min_tokens;

        self.left_column()
            .lines
            .into_iter()
            .filter(|&line| {
                f64::from(self.tree().bbox(line).width()) > midline
                    && self.tree().tokens(line).len() > min_tokens
                    && self.is_fused(line)
            })
            .collect()
    }

    /// Repair one fused line in place.
    ///
    /// The left fragment takes the line's place in its parent. The right
    /// fragment goes just before the line two positions further down in
    /// top order, or at the end of the line's parent when there is no such
    /// line. Returns `false` when the line was not fused.
    pub fn repair_fused_line(&mut self, line: NodeId) -> Result<bool> {
        let sorted = self.lines_sorted_by_top();
        let idx = sorted
            .iter()
            .position(|&l| l == line)
            .ok_or_else(|| Error::InvalidStructure(format!("{} is not a line of this page", line)))?;
        let parent = self
            .tree()
            .parent(line)
            .ok_or_else(|| Error::InvalidStructure(format!("line {} has no parent", line)))?;
        let next_line = sorted.get(idx + 2).copied();

        let threshold = self.options().primary_threshold;
        let number = self.number();
        let tree = self.tree_mut();
        let Some((left, right)) = unfuse(tree, line, threshold)? else {
            return Ok(false);
        };

        // a fragment emptied by the rebalancing is dropped
        if tree.is_empty(left) {
            tree.remove(parent, line)?;
        } else {
            tree.replace(parent, line, left)?;
        }
        if tree.is_empty(right) {
            return Ok(true);
        }

        match next_line.and_then(|next| tree.parent(next).map(|p| (next, p))) {
            Some((next, next_parent)) => {
                let index = tree.index_of(next_parent, next).ok_or(Error::NotAChild {
                    parent: next_parent,
                    child: next,
                })?;
                log::debug!(
                    "Page {}: right fragment of {} placed before {}",
                    number,
                    line,
                    next
                );
                tree.insert(next_parent, index, right)?;
            }
            None => {
                log::debug!(
                    "Page {}: right fragment of {} appended to {}",
                    number,
                    line,
                    parent
                );
                tree.append(parent, right)?;
            }
        }
        Ok(true)
    }

    /// Repair every fused line; returns the number repaired.
    pub fn repair_fused_lines(&mut self) -> Result<usize> {
        let mut repaired = 0;
        for line in self.fused_lines() {
            if self.repair_fused_line(line)? {
                repaired += 1;
            }
        }
        Ok(repaired)
    }
}
