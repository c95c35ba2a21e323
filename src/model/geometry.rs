//! Axis-aligned bounding boxes in page pixel coordinates.
//!
//! Boxes come straight from OCR output and are never validated: `min` may
//! lie below or to the right of `max`, in which case widths and heights are
//! negative and the predicates below return well-defined but meaningless
//! answers instead of failing. Differences between coordinates are taken in
//! `i64`, so extreme values never overflow.

use serde::{Deserialize, Serialize};

/// A pixel position on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the page's left edge
    pub x: i32,
    /// Vertical offset from the page's top edge
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A bounding box spanning `min` (top-left) to `max` (bottom-right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BBox {
    /// Top-left corner
    pub min: Point,
    /// Bottom-right corner
    pub max: Point,
}

/// A geometric relation between two boxes, as reported by [`BBox::alignment_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// This box contains the other
    Contains,
    /// This box lies inside the other
    ContainedBy,
    /// Contained and horizontally centered
    HorizontallyCenteredWithin,
    /// Contained and vertically centered
    VerticallyCenteredWithin,
    /// Left edges line up
    Left,
    /// Right edges line up
    Right,
    /// Top edges line up
    Top,
    /// Bottom edges line up
    Bottom,
}

impl BBox {
    /// The empty box at the origin.
    pub const ZERO: BBox = BBox::new(0, 0, 0, 0);

    /// Create a box from `x_min y_min x_max y_max`, the order used by hOCR.
    pub const fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            min: Point::new(x_min, y_min),
            max: Point::new(x_max, y_max),
        }
    }

    /// The smallest box running from the top-left of `first` to the
    /// bottom-right of `last`.
    pub const fn spanning(first: &BBox, last: &BBox) -> Self {
        Self {
            min: first.min,
            max: last.max,
        }
    }

    pub fn left(&self) -> i32 {
        self.min.x
    }

    pub fn right(&self) -> i32 {
        self.max.x
    }

    pub fn top(&self) -> i32 {
        self.min.y
    }

    pub fn bottom(&self) -> i32 {
        self.max.y
    }

    /// Width in pixels; negative for inverted boxes.
    pub fn width(&self) -> i32 {
        self.right().saturating_sub(self.left())
    }

    /// Height in pixels; negative for inverted boxes.
    pub fn height(&self) -> i32 {
        self.bottom().saturating_sub(self.top())
    }

    /// Check whether `inner` lies entirely inside this box (edges may touch).
    pub fn contains(&self, inner: &BBox) -> bool {
        self.left() <= inner.left()
            && self.right() >= inner.right()
            && self.top() <= inner.top()
            && self.bottom() >= inner.bottom()
    }

    /// Check whether this box lies entirely inside `outer`.
    pub fn contained_by(&self, outer: &BBox) -> bool {
        outer.contains(self)
    }

    /// Contained in `outer`, with left and right gaps differing by at most `tolerance`.
    pub fn is_horizontally_centered_within(&self, outer: &BBox, tolerance: i32) -> bool {
        let left_gap = diff(self.left(), outer.left()).abs();
        let right_gap = diff(outer.right(), self.right()).abs();
        self.contained_by(outer) && (right_gap - left_gap).abs() <= i64::from(tolerance)
    }

    /// Contained in `outer`, with top and bottom gaps differing by at most `tolerance`.
    pub fn is_vertically_centered_within(&self, outer: &BBox, tolerance: i32) -> bool {
        let top_gap = diff(self.top(), outer.top()).abs();
        let bottom_gap = diff(outer.bottom(), self.bottom()).abs();
        self.contained_by(outer) && (bottom_gap - top_gap).abs() <= i64::from(tolerance)
    }

    pub fn is_aligned_left(&self, other: &BBox, tolerance: i32) -> bool {
        diff(self.left(), other.left()).abs() <= i64::from(tolerance)
    }

    pub fn is_aligned_right(&self, other: &BBox, tolerance: i32) -> bool {
        diff(self.right(), other.right()).abs() <= i64::from(tolerance)
    }

    pub fn is_aligned_top(&self, other: &BBox, tolerance: i32) -> bool {
        diff(self.top(), other.top()).abs() <= i64::from(tolerance)
    }

    pub fn is_aligned_bottom(&self, other: &BBox, tolerance: i32) -> bool {
        diff(self.bottom(), other.bottom()).abs() <= i64::from(tolerance)
    }

    /// This box starts no more than `tolerance` pixels left of where `other` ends.
    pub fn is_to_the_right_of(&self, other: &BBox, tolerance: i32) -> bool {
        diff(self.left(), other.right()) <= i64::from(tolerance)
    }

    /// `other` starts no more than `tolerance` pixels right of where this box ends.
    pub fn is_to_the_left_of(&self, other: &BBox, tolerance: i32) -> bool {
        diff(other.left(), self.right()) <= i64::from(tolerance)
    }

    pub fn is_above(&self, other: &BBox, tolerance: i32) -> bool {
        diff(self.bottom(), other.top()) <= i64::from(tolerance)
    }

    pub fn is_below(&self, other: &BBox, tolerance: i32) -> bool {
        diff(other.bottom(), self.top()) <= i64::from(tolerance)
    }

    /// List every relation that holds between this box and `other`.
    pub fn alignment_with(&self, other: &BBox, tolerance: i32) -> Vec<Alignment> {
        let checks = [
            (self.contains(other), Alignment::Contains),
            (self.contained_by(other), Alignment::ContainedBy),
            (
                self.is_horizontally_centered_within(other, tolerance),
                Alignment::HorizontallyCenteredWithin,
            ),
            (
                self.is_vertically_centered_within(other, tolerance),
                Alignment::VerticallyCenteredWithin,
            ),
            (self.is_aligned_left(other, tolerance), Alignment::Left),
            (self.is_aligned_right(other, tolerance), Alignment::Right),
            (self.is_aligned_top(other, tolerance), Alignment::Top),
            (self.is_aligned_bottom(other, tolerance), Alignment::Bottom),
        ];

        checks
            .into_iter()
            .filter_map(|(holds, alignment)| holds.then_some(alignment))
            .collect()
    }
}

fn diff(a: i32, b: i32) -> i64 {
    i64::from(a) - i64::from(b)
}
