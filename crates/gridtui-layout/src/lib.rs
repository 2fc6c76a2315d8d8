#![forbid(unsafe_code)]

//! Layout primitives and solvers.
//!
//! - [`Node`] - a row/column tree whose leaves are widgets
//! - [`Grid`] - top-level rows stacked vertically
//! - [`split_spans`] - the proportional width split shared by both
//!
//! # Example
//!
//! ```
//! use gridtui_core::geometry::Rect;
//! use gridtui_layout::{Child, Layoutable, Node};
//!
//! struct Panel { height: i32, area: Rect }
//!
//! impl Layoutable for Panel {
//!     fn preferred_height(&self) -> i32 { self.height }
//!     fn set_area(&mut self, area: Rect) { self.area = area; }
//! }
//!
//! let panel = |height| Panel { height, area: Rect::default() };
//! let mut root = Node::row(vec![
//!     Child::new(6, Node::leaf(panel(3))),
//!     Child::new(6, Node::leaf(panel(5))),
//! ]);
//! let solved = root.solve(0, 0, 100);
//! assert_eq!(solved, Rect::new(0, 0, 100, 5));
//! ```

pub mod grid;

pub use gridtui_core::geometry::{Rect, Sides};
pub use grid::{Child, Direction, Grid, Layoutable, Node, split_spans};
