//! Rectangle primitives and the edge-sharing adjacency test.
//!
//! Coordinates live in the compositor's shared space: signed origin, unsigned
//! extent. Edge math is done in `i64` so `x + width` never overflows.

/// Axis-aligned region anchored in the shared coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Orientation of the boundary two rectangles share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Side by side: the shared boundary is a vertical line.
    Vertical,
    /// Stacked: the shared boundary is a horizontal line.
    Horizontal,
}

/// Boundary segment shared by two adjacent rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedEdge {
    pub axis: Axis,
    pub length: i64,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> i64 {
        self.x as i64
    }

    pub fn top(&self) -> i64 {
        self.y as i64
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Find the boundary segment shared with `other`.
    ///
    /// Two sides count as touching when they are at most `tolerance` units
    /// apart, and the projections on the perpendicular axis must overlap by
    /// more than `tolerance`. Contact at a corner point never qualifies. The
    /// result does not depend on argument order.
    pub fn shared_edge(&self, other: &Rect, tolerance: i64) -> Option<SharedEdge> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let tolerance = tolerance.max(0);

        let touches_vertically = (self.right() - other.left()).abs() <= tolerance
            || (other.right() - self.left()).abs() <= tolerance;
        if touches_vertically {
            let overlap = overlap(self.top(), self.bottom(), other.top(), other.bottom());
            if overlap > tolerance {
                return Some(SharedEdge {
                    axis: Axis::Vertical,
                    length: overlap,
                });
            }
        }

        let touches_horizontally = (self.bottom() - other.top()).abs() <= tolerance
            || (other.bottom() - self.top()).abs() <= tolerance;
        if touches_horizontally {
            let overlap = overlap(self.left(), self.right(), other.left(), other.right());
            if overlap > tolerance {
                return Some(SharedEdge {
                    axis: Axis::Horizontal,
                    length: overlap,
                });
            }
        }

        None
    }

    pub fn is_adjacent(&self, other: &Rect, tolerance: i64) -> bool {
        self.shared_edge(other, tolerance).is_some()
    }
}

fn overlap(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> i64 {
    a_end.min(b_end) - a_start.max(b_start)
}
