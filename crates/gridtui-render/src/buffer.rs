#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! A [`Buffer`] maps absolute screen coordinates to cells. Its `area` is a
//! rectangle of interest: cells inside it are stored densely in row-major
//! order, cells written anywhere else go to an ordered overflow map. No write
//! is ever dropped because of the area.
//!
//! # Invariants
//!
//! 1. `cells.len() == area.width * area.height`
//! 2. `overflow` never holds a position inside `area`
//! 3. `area` changes only through [`Buffer::set_area`] and [`Buffer::align`]
//! 4. `get` never fails: unset positions read as [`Cell::EMPTY`]
//! 5. An empty scissor stack means writes are not clipped

use std::collections::BTreeMap;

use crate::cell::Cell;
use gridtui_core::geometry::Rect;

/// A 2D map of cells in absolute coordinates.
///
/// # Example
///
/// ```
/// use gridtui_core::geometry::Rect;
/// use gridtui_render::buffer::Buffer;
/// use gridtui_render::cell::Cell;
///
/// let mut buf = Buffer::new(Rect::new(10, 5, 80, 24));
/// buf.set(10, 5, Cell::from_char('H'));
/// buf.set(0, 0, Cell::from_char('o'));
/// assert_eq!(buf.get(10, 5).ch, 'H');
/// assert_eq!(buf.get(0, 0).ch, 'o');
/// assert_eq!(buf.area(), Rect::new(10, 5, 80, 24));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    area: Rect,
    cells: Vec<Option<Cell>>,
    /// Cells outside `area`, keyed `(y, x)` so iteration is row-major.
    overflow: BTreeMap<(i32, i32), Cell>,
    scissor_stack: Vec<Rect>,
}

impl Buffer {
    /// Create an empty buffer whose area is `area`.
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            cells: vec![None; slot_count(area)],
            overflow: BTreeMap::new(),
            scissor_stack: Vec::new(),
        }
    }

    /// Create a buffer with every position of `area` set to `cell`.
    pub fn filled(area: Rect, cell: Cell) -> Self {
        Self {
            area,
            cells: vec![Some(cell); slot_count(area)],
            overflow: BTreeMap::new(),
            scissor_stack: Vec::new(),
        }
    }

    /// The buffer's area. Stored cells may lie outside it.
    #[inline]
    pub const fn area(&self) -> Rect {
        self.area
    }

    /// Number of stored cells.
    pub fn stored_len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count() + self.overflow.len()
    }

    /// Whether no cell is stored.
    pub fn is_empty(&self) -> bool {
        self.overflow.is_empty() && self.cells.iter().all(Option::is_none)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.area.contains(x, y) {
            let dx = (x - self.area.x) as usize;
            let dy = (y - self.area.y) as usize;
            Some(dy * self.area.width as usize + dx)
        } else {
            None
        }
    }

    /// The cell at `(x, y)`, or [`Cell::EMPTY`] if nothing is stored there.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.get_stored(x, y).copied().unwrap_or(Cell::EMPTY)
    }

    /// The stored cell at `(x, y)`, if any.
    #[inline]
    pub fn get_stored(&self, x: i32, y: i32) -> Option<&Cell> {
        match self.index(x, y) {
            Some(i) => self.cells[i].as_ref(),
            None => self.overflow.get(&(y, x)),
        }
    }

    /// Mutable access to the stored cell at `(x, y)`, if any.
    #[inline]
    pub fn get_stored_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        match self.index(x, y) {
            Some(i) => self.cells[i].as_mut(),
            None => self.overflow.get_mut(&(y, x)),
        }
    }

    #[inline]
    fn store(&mut self, x: i32, y: i32, cell: Cell) {
        match self.index(x, y) {
            Some(i) => self.cells[i] = Some(cell),
            None => {
                self.overflow.insert((y, x), cell);
            }
        }
    }

    /// Store `cell` at `(x, y)`, overwriting any previous cell.
    ///
    /// Positions outside the area are kept too. Only an active scissor
    /// rectangle can reject the write.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(clip) = self.current_scissor()
            && !clip.contains(x, y)
        {
            return;
        }
        self.store(x, y, cell);
    }

    /// Remove the stored cell at `(x, y)`.
    pub fn unset(&mut self, x: i32, y: i32) {
        match self.index(x, y) {
            Some(i) => self.cells[i] = None,
            None => {
                self.overflow.remove(&(y, x));
            }
        }
    }

    /// Store `cell` at every position of `rect`, clipped by the scissor.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clip = match self.current_scissor() {
            Some(scissor) => rect.intersection(&scissor),
            None => rect,
        };
        for y in clip.top()..clip.bottom() {
            for x in clip.left()..clip.right() {
                self.store(x, y, cell);
            }
        }
    }

    /// Remove every stored cell. The area is kept.
    pub fn clear(&mut self) {
        self.cells.fill(None);
        self.overflow.clear();
    }

    /// Copy every stored cell of `other` into `self` (last-merged-wins).
    ///
    /// Both buffers use absolute coordinates. Cells only present in `self`
    /// are left untouched and neither area changes. The scissor stack does
    /// not apply.
    pub fn merge(&mut self, other: &Buffer) {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "buffer.merge",
            src_w = other.area.width,
            src_h = other.area.height,
            src_overflow = other.overflow.len()
        )
        .entered();

        for (x, y, cell) in other.iter() {
            self.store(x, y, cell);
        }
    }

    /// Minimal rectangle containing every stored cell.
    ///
    /// Returns `Rect::default()` when nothing is stored.
    pub fn bounds(&self) -> Rect {
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for (x, y, _) in self.iter() {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if min_x > max_x {
            return Rect::default();
        }
        Rect::from_corners(min_x, min_y, max_x + 1, max_y + 1)
    }

    /// Replace the area. Every stored cell is kept.
    ///
    /// Resets the scissor stack.
    pub fn set_area(&mut self, area: Rect) {
        self.scissor_stack.clear();
        if area == self.area {
            return;
        }
        let mut next = Buffer::new(area);
        next.merge(self);
        *self = next;
    }

    /// Set the area to [`bounds`](Self::bounds) so every cell is inside it.
    pub fn align(&mut self) {
        let bounds = self.bounds();
        self.set_area(bounds);
    }

    /// Iterate stored cells as `(x, y, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let width = self.area.width.max(1) as usize;
        let origin = (self.area.x, self.area.y);
        let mut dense = self
            .cells
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| {
                slot.map(|cell| {
                    (
                        origin.0 + (i % width) as i32,
                        origin.1 + (i / width) as i32,
                        cell,
                    )
                })
            })
            .peekable();
        let mut overflow = self
            .overflow
            .iter()
            .map(|(&(y, x), &cell)| (x, y, cell))
            .peekable();

        std::iter::from_fn(move || {
            let dense_first = match (dense.peek(), overflow.peek()) {
                (Some(&(dx, dy, _)), Some(&(ox, oy, _))) => (dy, dx) < (oy, ox),
                (Some(_), None) => true,
                (None, _) => false,
            };
            if dense_first {
                dense.next()
            } else {
                overflow.next()
            }
        })
    }

    /// Push a clipping rectangle; it is intersected with the current one.
    pub fn push_scissor(&mut self, rect: Rect) {
        let next = match self.current_scissor() {
            Some(current) => current.intersection(&rect),
            None => rect,
        };
        self.scissor_stack.push(next);
    }

    /// Pop the innermost clipping rectangle. Popping an empty stack does nothing.
    pub fn pop_scissor(&mut self) {
        self.scissor_stack.pop();
    }

    /// Current clipping rectangle, or `None` when writes are unclipped.
    #[inline]
    pub fn current_scissor(&self) -> Option<Rect> {
        self.scissor_stack.last().copied()
    }

    /// Number of pushed scissor rectangles.
    pub fn scissor_depth(&self) -> usize {
        self.scissor_stack.len()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

fn slot_count(area: Rect) -> usize {
    if area.is_empty() {
        0
    } else {
        area.width as usize * area.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Color;

    fn c(ch: char) -> Cell {
        Cell::from_char(ch)
    }

    #[test]
    fn get_on_absent_coordinate_is_empty_cell() {
        let buf = Buffer::new(Rect::new(0, 0, 4, 4));
        assert_eq!(buf.get(1, 1), Cell::EMPTY);
        assert_eq!(buf.get(-10, 99), Cell::EMPTY);
        assert!(buf.get_stored(1, 1).is_none());
    }

    #[test]
    fn set_and_get_with_offset_area() {
        let mut buf = Buffer::new(Rect::new(10, 20, 5, 5));
        buf.set(12, 21, c('x'));
        assert_eq!(buf.get(12, 21).ch, 'x');
        assert_eq!(buf.stored_len(), 1);
    }

    #[test]
    fn set_outside_area_is_kept_and_area_unchanged() {
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::new(area);
        buf.set(5, 5, c('z'));
        buf.set(-1, 0, c('w'));
        assert_eq!(buf.get(5, 5).ch, 'z');
        assert_eq!(buf.get(-1, 0).ch, 'w');
        assert_eq!(buf.stored_len(), 2);
        assert_eq!(buf.area(), area);
        assert_eq!(buf.bounds(), Rect::from_corners(-1, 0, 6, 6));
    }

    #[test]
    fn zero_area_buffer_stores_everything_outside() {
        let mut buf = Buffer::new(Rect::new(3, 3, -2, 0));
        buf.set(3, 3, c('x'));
        buf.fill(Rect::new(0, 0, 2, 2), c('y'));
        assert_eq!(buf.stored_len(), 5);
        assert_eq!(buf.get(3, 3).ch, 'x');
        assert_eq!(buf.bounds(), Rect::new(0, 0, 4, 4));
        assert!(buf.area().is_empty());
    }

    #[test]
    fn merge_last_write_wins() {
        let area = Rect::new(0, 0, 4, 4);
        let mut a = Buffer::new(area);
        let mut b = Buffer::new(area);
        a.set(1, 1, c('a'));
        b.set(1, 1, c('b'));
        a.merge(&b);
        assert_eq!(a.get(1, 1).ch, 'b');
    }

    #[test]
    fn merge_preserves_non_overlapping() {
        let area = Rect::new(0, 0, 4, 4);
        let mut a = Buffer::new(area);
        let mut b = Buffer::new(area);
        a.set(0, 0, c('a'));
        b.set(3, 3, c('b'));
        a.merge(&b);
        assert_eq!(a.get(0, 0).ch, 'a');
        assert_eq!(a.get(3, 3).ch, 'b');
        assert_eq!(a.stored_len(), 2);
    }

    #[test]
    fn merge_keeps_source_cells_outside_destination_area() {
        let mut dst = Buffer::new(Rect::new(0, 0, 2, 2));
        let mut src = Buffer::new(Rect::new(5, 5, 2, 2));
        dst.set(0, 0, c('a'));
        src.set(6, 6, c('b'));
        dst.merge(&src);
        assert_eq!(dst.get(0, 0).ch, 'a');
        assert_eq!(dst.get(6, 6).ch, 'b');
        assert_eq!(dst.stored_len(), 2);
        assert_eq!(dst.area(), Rect::new(0, 0, 2, 2));
    }

    #[test]
    fn union_into_empty_buffer_then_align() {
        let mut first = Buffer::new(Rect::new(3, 3, 1, 1));
        first.set(3, 3, c('a'));
        let mut second = Buffer::new(Rect::new(4, 4, 1, 1));
        second.set(4, 4, c('b'));

        let mut union = Buffer::default();
        union.merge(&first);
        union.merge(&second);
        union.align();

        assert_eq!(union.area(), Rect::new(3, 3, 2, 2));
        assert_eq!(union.get(3, 3).ch, 'a');
        assert_eq!(union.get(4, 4).ch, 'b');
        assert!(union.overflow.is_empty());
    }

    #[test]
    fn bounds_is_minimal_rect_over_stored_cells() {
        let mut buf = Buffer::new(Rect::new(0, 0, 20, 20));
        assert_eq!(buf.bounds(), Rect::default());
        buf.set(3, 4, c('a'));
        buf.set(7, 2, c('b'));
        buf.set(5, 9, c('c'));
        assert_eq!(buf.bounds(), Rect::new(3, 2, 5, 8));
    }

    #[test]
    fn align_shrinks_to_bounds_and_keeps_cells() {
        let mut buf = Buffer::new(Rect::new(0, 0, 20, 20));
        buf.set(3, 4, c('a'));
        buf.set(6, 5, c('b'));
        buf.align();
        assert_eq!(buf.area(), Rect::new(3, 4, 4, 2));
        assert_eq!(buf.get(3, 4).ch, 'a');
        assert_eq!(buf.get(6, 5).ch, 'b');
    }

    #[test]
    fn align_grows_over_cells_outside_area() {
        let mut buf = Buffer::new(Rect::new(0, 0, 2, 2));
        buf.set(0, 0, c('a'));
        buf.set(9, 4, c('b'));
        buf.align();
        assert_eq!(buf.area(), Rect::new(0, 0, 10, 5));
        assert_eq!(buf.get(9, 4).ch, 'b');
        assert!(buf.overflow.is_empty());
    }

    #[test]
    fn set_area_keeps_every_cell() {
        let mut buf = Buffer::new(Rect::new(0, 0, 10, 10));
        buf.set(1, 1, c('a'));
        buf.set(8, 8, c('b'));
        buf.set_area(Rect::new(0, 0, 5, 5));
        assert_eq!(buf.area(), Rect::new(0, 0, 5, 5));
        assert_eq!(buf.get(1, 1).ch, 'a');
        assert_eq!(buf.get(8, 8).ch, 'b');
        assert_eq!(buf.stored_len(), 2);
    }

    #[test]
    fn fill_and_clear() {
        let mut buf = Buffer::new(Rect::new(0, 0, 5, 5));
        let cell = c('#').with_bg(Color::BLUE);
        buf.fill(Rect::new(1, 1, 2, 2), cell);
        assert_eq!(buf.stored_len(), 4);
        assert_eq!(buf.get(2, 2), cell);
        buf.fill(Rect::new(4, 4, 2, 2), cell);
        assert_eq!(buf.stored_len(), 8);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.area(), Rect::new(0, 0, 5, 5));
    }

    #[test]
    fn filled_stores_every_position() {
        let buf = Buffer::filled(Rect::new(0, 0, 3, 2), c('.'));
        assert_eq!(buf.stored_len(), 6);
        assert_eq!(buf.bounds(), Rect::new(0, 0, 3, 2));
    }

    #[test]
    fn iter_is_row_major_with_absolute_coordinates() {
        let mut buf = Buffer::new(Rect::new(2, 2, 3, 3));
        buf.set(4, 2, c('b'));
        buf.set(2, 3, c('c'));
        buf.set(2, 2, c('a'));
        let seen: Vec<_> = buf.iter().map(|(x, y, cell)| (x, y, cell.ch)).collect();
        assert_eq!(seen, vec![(2, 2, 'a'), (4, 2, 'b'), (2, 3, 'c')]);
    }

    #[test]
    fn iter_interleaves_cells_outside_area() {
        let mut buf = Buffer::new(Rect::new(2, 2, 2, 2));
        buf.set(3, 3, c('d'));
        buf.set(0, 3, c('c'));
        buf.set(2, 2, c('b'));
        buf.set(9, 0, c('a'));
        buf.set(5, 2, c('x'));
        let seen: String = buf.iter().map(|(_, _, cell)| cell.ch).collect();
        assert_eq!(seen, "abxcd");
    }

    #[test]
    fn scissor_clips_writes() {
        let mut buf = Buffer::new(Rect::new(0, 0, 10, 10));
        buf.push_scissor(Rect::new(2, 2, 3, 3));
        buf.set(0, 0, c('x'));
        buf.set(3, 3, c('y'));
        buf.fill(Rect::new(0, 0, 10, 10), c('z'));
        assert!(buf.get_stored(0, 0).is_none());
        assert_eq!(buf.get(3, 3).ch, 'z');
        assert_eq!(buf.stored_len(), 9);
        buf.pop_scissor();
        buf.set(0, 0, c('x'));
        assert_eq!(buf.get(0, 0).ch, 'x');
    }

    #[test]
    fn nested_scissors_intersect() {
        let mut buf = Buffer::new(Rect::new(0, 0, 10, 10));
        buf.push_scissor(Rect::new(0, 0, 5, 5));
        buf.push_scissor(Rect::new(3, 3, 5, 5));
        assert_eq!(buf.current_scissor(), Some(Rect::new(3, 3, 2, 2)));
        buf.pop_scissor();
        assert_eq!(buf.current_scissor(), Some(Rect::new(0, 0, 5, 5)));
    }

    #[test]
    fn popping_empty_scissor_stack_leaves_writes_unclipped() {
        let mut buf = Buffer::new(Rect::new(0, 0, 4, 4));
        buf.pop_scissor();
        buf.pop_scissor();
        assert_eq!(buf.scissor_depth(), 0);
        assert_eq!(buf.current_scissor(), None);
        buf.set(7, 7, c('x'));
        assert_eq!(buf.get(7, 7).ch, 'x');
    }

    #[test]
    fn get_stored_mut_edits_in_place() {
        let mut buf = Buffer::new(Rect::new(0, 0, 2, 2));
        buf.set(0, 0, c('a'));
        buf.set(3, 0, c('b'));
        if let Some(cell) = buf.get_stored_mut(0, 0) {
            cell.fg = Color::RED;
        }
        if let Some(cell) = buf.get_stored_mut(3, 0) {
            cell.fg = Color::GREEN;
        }
        assert_eq!(buf.get(0, 0).fg, Color::RED);
        assert_eq!(buf.get(3, 0).fg, Color::GREEN);
        buf.unset(0, 0);
        buf.unset(3, 0);
        assert!(buf.is_empty());
    }
}
