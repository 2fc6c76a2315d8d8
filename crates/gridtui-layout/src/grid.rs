#![forbid(unsafe_code)]

//! Row/column grid layout.
//!
//! A layout is a tree of [`Node`]s. Leaves hold widgets; branches hold an
//! ordered list of [`Child`]ren and a [`Direction`]. Each child carries an
//! integer `span` and an optional leading `offset`.
//!
//! Solving runs four passes over the tree:
//!
//! 1. widths flow down: a row splits its width between children in
//!    proportion to their spans, a column hands its full width to each child
//! 2. heights flow up: leaves report a preferred height, a row takes the
//!    tallest child, a column sums its children
//! 3. x positions flow down: row children sit side by side after their
//!    leading gap, column children share the column's x
//! 4. y positions flow down: column children stack, row children share y
//!
//! Children with `span <= 0` are inactive. They receive an empty rectangle
//! and contribute nothing to their parent's height.

use gridtui_core::geometry::Rect;

/// A widget that can be placed by the grid solver.
pub trait Layoutable {
    /// Height the widget wants, in cells. Negative values are treated as zero.
    fn preferred_height(&self) -> i32;

    /// Receive the solved area.
    fn set_area(&mut self, area: Rect);
}

impl<T: Layoutable + ?Sized> Layoutable for Box<T> {
    fn preferred_height(&self) -> i32 {
        (**self).preferred_height()
    }

    fn set_area(&mut self, area: Rect) {
        (**self).set_area(area);
    }
}

/// Axis along which a branch arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Children side by side, widths split by span.
    #[default]
    Row,
    /// Children stacked top to bottom, each at full width.
    Col,
}

/// A child slot in a branch.
#[derive(Debug, Clone)]
pub struct Child<W> {
    /// The subtree placed in this slot.
    pub node: Node<W>,
    /// Relative width share. `<= 0` deactivates the slot.
    pub span: i32,
    /// Leading gap, in span units, before this child in a row.
    pub offset: i32,
    lead: i32,
}

impl<W> Child<W> {
    /// Child with the given span and no offset.
    #[must_use]
    pub fn new(span: i32, node: Node<W>) -> Self {
        Self {
            node,
            span,
            offset: 0,
            lead: 0,
        }
    }

    /// Set the leading offset.
    #[must_use]
    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    /// Whether the slot takes part in layout.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.span > 0
    }
}

/// A node in the layout tree.
#[derive(Debug, Clone)]
pub enum Node<W> {
    /// A widget.
    Leaf { widget: W, rect: Rect },
    /// An ordered group of children.
    Branch {
        direction: Direction,
        children: Vec<Child<W>>,
        rect: Rect,
    },
}

impl<W> Node<W> {
    /// Leaf node wrapping `widget`.
    #[must_use]
    pub fn leaf(widget: W) -> Self {
        Self::Leaf {
            widget,
            rect: Rect::default(),
        }
    }

    /// Branch with an explicit direction.
    #[must_use]
    pub fn branch(direction: Direction, children: Vec<Child<W>>) -> Self {
        Self::Branch {
            direction,
            children,
            rect: Rect::default(),
        }
    }

    /// Row branch.
    #[must_use]
    pub fn row(children: Vec<Child<W>>) -> Self {
        Self::branch(Direction::Row, children)
    }

    /// Column branch.
    #[must_use]
    pub fn col(children: Vec<Child<W>>) -> Self {
        Self::branch(Direction::Col, children)
    }

    /// Column of widgets stacked at full width, each with span 1.
    #[must_use]
    pub fn stack(widgets: impl IntoIterator<Item = W>) -> Self {
        Self::col(
            widgets
                .into_iter()
                .map(|w| Child::new(1, Self::leaf(w)))
                .collect(),
        )
    }

    /// Solved rectangle. Zero until [`Node::solve`] has run.
    #[inline]
    pub const fn rect(&self) -> Rect {
        match self {
            Self::Leaf { rect, .. } | Self::Branch { rect, .. } => *rect,
        }
    }

    fn rect_mut(&mut self) -> &mut Rect {
        match self {
            Self::Leaf { rect, .. } | Self::Branch { rect, .. } => rect,
        }
    }

    /// Children of a branch; empty for a leaf.
    pub fn children(&self) -> &[Child<W>] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Branch { children, .. } => children,
        }
    }

    /// Widgets in depth-first, left-to-right order.
    pub fn leaves(&self) -> Vec<&W> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a W>) {
        match self {
            Self::Leaf { widget, .. } => out.push(widget),
            Self::Branch { children, .. } => {
                for child in children {
                    child.node.collect_leaves(out);
                }
            }
        }
    }

    /// Apply `f` to every widget in depth-first, left-to-right order.
    pub fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut W)) {
        match self {
            Self::Leaf { widget, .. } => f(widget),
            Self::Branch { children, .. } => {
                for child in children {
                    child.node.for_each_leaf_mut(f);
                }
            }
        }
    }
}

impl<W: Layoutable> Node<W> {
    /// Solve the tree with its top-left corner at `(x, y)` and the given
    /// width, pushing each leaf's area into its widget.
    ///
    /// Returns the root rectangle. Negative widths are treated as zero.
    pub fn solve(&mut self, x: i32, y: i32, width: i32) -> Rect {
        let _span = gridtui_core::debug_span!("grid.solve", x, y, width).entered();
        self.assign_width(width.max(0));
        self.solve_height();
        self.assign_x(x);
        self.assign_y(y);
        self.rect()
    }

    fn assign_width(&mut self, width: i32) {
        self.rect_mut().width = width;
        let Self::Branch {
            direction,
            children,
            ..
        } = self
        else {
            return;
        };
        match direction {
            Direction::Row => {
                let weights: Vec<(i32, i32)> =
                    children.iter().map(|c| (c.span, c.offset)).collect();
                let split = split_spans(width, &weights);
                for (child, (lead, w)) in children.iter_mut().zip(split) {
                    child.lead = lead;
                    child.node.assign_width(w);
                }
            }
            Direction::Col => {
                for child in children.iter_mut() {
                    child.lead = 0;
                    let w = if child.is_active() { width } else { 0 };
                    child.node.assign_width(w);
                }
            }
        }
    }

    fn solve_height(&mut self) -> i32 {
        let height = match self {
            Self::Leaf { widget, .. } => widget.preferred_height().max(0),
            Self::Branch {
                direction,
                children,
                ..
            } => {
                let mut acc = 0i32;
                for child in children.iter_mut() {
                    let h = child.node.solve_height();
                    if !child.is_active() {
                        child.node.collapse_height();
                        continue;
                    }
                    acc = match direction {
                        Direction::Row => acc.max(h),
                        Direction::Col => acc.saturating_add(h),
                    };
                }
                acc
            }
        };
        self.rect_mut().height = height;
        height
    }

    /// Zero the height of an inactive subtree.
    fn collapse_height(&mut self) {
        self.rect_mut().height = 0;
        if let Self::Branch { children, .. } = self {
            for child in children {
                child.node.collapse_height();
            }
        }
    }

    fn assign_x(&mut self, x: i32) {
        self.rect_mut().x = x;
        let Self::Branch {
            direction,
            children,
            ..
        } = self
        else {
            return;
        };
        let mut cursor = x;
        for child in children.iter_mut() {
            match direction {
                Direction::Row => {
                    cursor = cursor.saturating_add(child.lead);
                    child.node.assign_x(cursor);
                    cursor = cursor.saturating_add(child.node.rect().width);
                }
                Direction::Col => child.node.assign_x(x),
            }
        }
    }

    fn assign_y(&mut self, y: i32) {
        self.rect_mut().y = y;
        match self {
            Self::Leaf { widget, rect } => widget.set_area(*rect),
            Self::Branch {
                direction,
                children,
                ..
            } => {
                let mut cursor = y;
                for child in children.iter_mut() {
                    match direction {
                        Direction::Row => child.node.assign_y(y),
                        Direction::Col => {
                            child.node.assign_y(cursor);
                            if child.is_active() {
                                cursor = cursor.saturating_add(child.node.rect().height);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Split `total` cells between `(span, offset)` slots.
///
/// Returns `(leading_gap, width)` per slot. Active slots (`span > 0`) share
/// the width in proportion to `span + max(offset, 0)`, floored; whatever the
/// flooring leaves over goes to the last active slot so the shares always
/// sum to `total`. Inactive slots get `(0, 0)`, as does everything when no
/// slot is active.
#[must_use]
pub fn split_spans(total: i32, slots: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let total = total.max(0);
    let weight = |&(span, offset): &(i32, i32)| -> i64 {
        if span > 0 {
            i64::from(span) + i64::from(offset.max(0))
        } else {
            0
        }
    };
    let denom: i64 = slots.iter().map(weight).sum();
    let mut out = vec![(0, 0); slots.len()];
    if denom == 0 {
        return out;
    }

    let scale = |units: i32| -> i32 {
        let share = i64::from(total) * i64::from(units) / denom;
        i32::try_from(share).unwrap_or(total)
    };

    let mut used = 0i32;
    let mut last_active = None;
    for (i, &(span, offset)) in slots.iter().enumerate() {
        if span <= 0 {
            continue;
        }
        let lead = scale(offset.max(0));
        let width = scale(span);
        used += lead + width;
        out[i] = (lead, width);
        last_active = Some(i);
    }
    if let Some(i) = last_active {
        out[i].1 += total - used;
    }
    out
}

/// Top-level rows stacked vertically inside a fixed width.
#[derive(Debug, Clone)]
pub struct Grid<W> {
    rows: Vec<Node<W>>,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl<W> Grid<W> {
    /// Empty grid at `(x, y)` with the given width.
    #[must_use]
    pub fn new(x: i32, y: i32, width: i32) -> Self {
        Self {
            rows: Vec::new(),
            x,
            y,
            width: width.max(0),
            height: 0,
        }
    }

    /// Append a row. Any node works; it is placed below the previous one.
    pub fn add_row(&mut self, row: Node<W>) -> &mut Self {
        self.rows.push(row);
        self
    }

    /// Builder form of [`Grid::add_row`].
    #[must_use]
    pub fn with_row(mut self, row: Node<W>) -> Self {
        self.rows.push(row);
        self
    }

    /// Change the width used by the next [`Grid::align`].
    pub fn set_width(&mut self, width: i32) {
        self.width = width.max(0);
    }

    /// Move the grid's top-left corner.
    pub fn set_origin(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Width used by [`Grid::align`].
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Total height from the last [`Grid::align`].
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Area covered by the last [`Grid::align`].
    pub const fn area(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[Node<W>] {
        &self.rows
    }

    /// Mutable access to the rows.
    pub fn rows_mut(&mut self) -> &mut [Node<W>] {
        &mut self.rows
    }

    /// Every widget, row by row.
    pub fn leaves(&self) -> Vec<&W> {
        self.rows.iter().flat_map(Node::leaves).collect()
    }

    /// Apply `f` to every widget, row by row.
    pub fn for_each_leaf_mut(&mut self, mut f: impl FnMut(&mut W)) {
        for row in &mut self.rows {
            row.for_each_leaf_mut(&mut f);
        }
    }

    /// Remove all rows.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.height = 0;
    }
}

impl<W: Layoutable> Grid<W> {
    /// Solve every row and stack them. Returns the covered area.
    pub fn align(&mut self) -> Rect {
        let _span =
            gridtui_core::debug_span!("grid.align", rows = self.rows.len(), width = self.width)
                .entered();
        let mut cursor = self.y;
        for row in &mut self.rows {
            let rect = row.solve(self.x, cursor, self.width);
            cursor = cursor.saturating_add(rect.height);
        }
        self.height = cursor - self.y;
        gridtui_core::debug!(height = self.height, "grid aligned");
        self.area()
    }
}
