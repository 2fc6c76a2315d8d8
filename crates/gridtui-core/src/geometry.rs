#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are signed so that callers can describe rectangles that start
//! off-screen or were computed from degenerate inputs. Sizes are never
//! negative: every constructor clamps them to zero.

/// An axis-aligned rectangle in terminal cell coordinates.
///
/// Origin is top-left; `right()` and `bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in cells (always `>= 0` when built through constructors).
    pub width: i32,
    /// Height in cells (always `>= 0` when built through constructors).
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle, clamping negative sizes to zero.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Create a rectangle spanning two corner points.
    ///
    /// `(x0, y0)` is inclusive and `(x1, y1)` exclusive. Inverted corners
    /// yield an empty rectangle anchored at `(x0, y0)`.
    #[inline]
    pub const fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// Left edge (inclusive).
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (inclusive).
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.width as u64 * self.height as u64
        }
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection, returning `None` if there is no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Smallest rectangle containing both. Empty operands are ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Shrink by the given margins. The result never has a negative size.
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect::new(
            self.x.saturating_add(margin.left),
            self.y.saturating_add(margin.top),
            self.width
                .saturating_sub(margin.left)
                .saturating_sub(margin.right),
            self.height
                .saturating_sub(margin.top)
                .saturating_sub(margin.bottom),
        )
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub const fn moved(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            width: self.width,
            height: self.height,
        }
    }

    /// Position this rectangle inside `parent` according to `align`.
    ///
    /// The size is kept; only the edges named in `align` move. `CENTER`
    /// centers on both axes, `CENTER_HORIZONTAL`/`CENTER_VERTICAL` on one.
    pub fn align_within(&self, parent: Rect, align: Align) -> Rect {
        let mut out = *self;

        if align.contains(Align::LEFT) {
            out.x = parent.x;
        }
        if align.contains(Align::RIGHT) {
            out.x = parent.right() - self.width;
        }
        if align.contains(Align::TOP) {
            out.y = parent.y;
        }
        if align.contains(Align::BOTTOM) {
            out.y = parent.bottom() - self.height;
        }
        if align.contains(Align::CENTER_HORIZONTAL) {
            out.x = parent.x + (parent.width - self.width) / 2;
        }
        if align.contains(Align::CENTER_VERTICAL) {
            out.y = parent.y + (parent.height - self.height) / 2;
        }

        out
    }
}

bitflags::bitflags! {
    /// Edges used by [`Rect::align_within`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Align: u8 {
        const LEFT              = 0b0000_0001;
        const RIGHT             = 0b0000_0010;
        const TOP               = 0b0000_0100;
        const BOTTOM            = 0b0000_1000;
        const CENTER_HORIZONTAL = 0b0001_0000;
        const CENTER_VERTICAL   = 0b0010_0000;
        const CENTER = Self::CENTER_HORIZONTAL.bits() | Self::CENTER_VERTICAL.bits();
    }
}

/// Sides for padding/margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sides {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Sides {
    /// Equal value on all four sides.
    pub const fn all(val: i32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Left and right only.
    pub const fn horizontal(val: i32) -> Self {
        Self {
            top: 0,
            right: val,
            bottom: 0,
            left: val,
        }
    }

    /// Top and bottom only.
    pub const fn vertical(val: i32) -> Self {
        Self {
            top: val,
            right: 0,
            bottom: val,
            left: 0,
        }
    }

    /// Specific values, clockwise from the top.
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal_sum(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical_sum(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }
}

impl From<i32> for Sides {
    fn from(val: i32) -> Self {
        Self::all(val)
    }
}

impl From<(i32, i32)> for Sides {
    fn from((vertical, horizontal): (i32, i32)) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

impl From<(i32, i32, i32, i32)> for Sides {
    fn from((top, right, bottom, left): (i32, i32, i32, i32)) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}


#[cfg(test)]
mod geometry_proptests {
    use super::{Rect, Sides};
    use proptest::prelude::*;

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-50i32..50, -50i32..50, -20i32..40, -20i32..40)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn sizes_never_negative(r in arb_rect()) {
            prop_assert!(r.width >= 0);
            prop_assert!(r.height >= 0);
        }

        #[test]
        fn intersection_is_contained_in_both(a in arb_rect(), b in arb_rect()) {
            if let Some(i) = a.intersection_opt(&b) {
                prop_assert!(a.contains(i.x, i.y));
                prop_assert!(b.contains(i.x, i.y));
                prop_assert!(i.right() <= a.right() && i.right() <= b.right());
                prop_assert!(i.bottom() <= a.bottom() && i.bottom() <= b.bottom());
            }
        }

        #[test]
        fn union_contains_both(a in arb_rect(), b in arb_rect()) {
            let u = a.union(&b);
            for r in [a, b] {
                if !r.is_empty() {
                    prop_assert!(u.contains(r.x, r.y));
                    prop_assert!(u.contains(r.right() - 1, r.bottom() - 1));
                }
            }
        }

        #[test]
        fn inner_never_negative(r in arb_rect(), t in -5i32..10, l in -5i32..10, b in 0i32..10, rr in 0i32..10) {
            let inner = r.inner(Sides::new(t, rr, b, l));
            prop_assert!(inner.width >= 0);
            prop_assert!(inner.height >= 0);
        }
    }
}
