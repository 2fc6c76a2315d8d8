//! Benchmarks for grid solving.
//!
//! Run with: cargo bench -p gridtui-layout --bench grid_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gridtui_layout::{Child, Grid, Layoutable, Node, Rect};
use std::hint::black_box;

#[derive(Default)]
struct Cell(Rect);

impl Layoutable for Cell {
    fn preferred_height(&self) -> i32 {
        3
    }

    fn set_area(&mut self, area: Rect) {
        self.0 = area;
    }
}

fn dashboard(rows: usize, cols: usize) -> Grid<Cell> {
    let mut grid = Grid::new(0, 0, 200);
    for _ in 0..rows {
        grid.add_row(Node::row(
            (0..cols)
                .map(|i| {
                    let leaf = Node::stack([Cell::default(), Cell::default()]);
                    Child::new(1 + (i % 3) as i32, leaf)
                })
                .collect(),
        ));
    }
    grid
}

fn bench_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/align");
    for (rows, cols) in [(2, 2), (4, 6), (12, 12)] {
        let mut grid = dashboard(rows, cols);
        group.bench_function(BenchmarkId::new("rows_x_cols", format!("{rows}x{cols}")), |b| {
            b.iter(|| black_box(grid.align()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_align);
criterion_main!(benches);
