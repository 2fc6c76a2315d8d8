#![forbid(unsafe_code)]

use gridtui_layout::{Child, Grid, Layoutable, Node, Rect, split_spans};

#[derive(Debug, Default)]
struct Fixed {
    height: i32,
    area: Rect,
}

impl Layoutable for Fixed {
    fn preferred_height(&self) -> i32 {
        self.height
    }

    fn set_area(&mut self, area: Rect) {
        self.area = area;
    }
}

#[test]
fn huge_width_and_spans_do_not_overflow() {
    let split = split_spans(i32::MAX, &[(i32::MAX, i32::MAX), (i32::MAX, 0)]);
    let sum: i64 = split.iter().map(|&(l, w)| i64::from(l) + i64::from(w)).sum();
    assert_eq!(sum, i64::from(i32::MAX));
}

#[test]
fn many_children_share_a_narrow_row() {
    // 1000 children over 10 cells: every floor share is zero, the last
    // child absorbs the whole width.
    let mut root = Node::row(
        (0..1000)
            .map(|_| Child::new(1, Node::leaf(Fixed { height: 1, ..Fixed::default() })))
            .collect(),
    );
    root.solve(0, 0, 10);
    let leaves = root.leaves();
    assert!(leaves[..999].iter().all(|f| f.area.width == 0));
    assert_eq!(leaves[999].area, Rect::new(0, 0, 10, 1));
}

#[test]
fn negative_width_solves_as_zero() {
    let mut grid = Grid::new(0, 0, -20).with_row(Node::leaf(Fixed {
        height: 4,
        ..Fixed::default()
    }));
    assert_eq!(grid.align(), Rect::new(0, 0, 0, 4));
}

#[test]
fn deep_nesting_keeps_full_width() {
    let mut node = Node::leaf(Fixed {
        height: 1,
        ..Fixed::default()
    });
    for _ in 0..64 {
        node = Node::col(vec![Child::new(1, node)]);
    }
    node.solve(2, 3, 77);
    assert_eq!(node.leaves()[0].area, Rect::new(2, 3, 77, 1));
}
