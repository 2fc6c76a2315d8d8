#![forbid(unsafe_code)]

use gridtui_core::geometry::Rect;
use gridtui_layout::{Child, Grid, Node};
use gridtui_render::buffer::Buffer;
use gridtui_render::cell::Color;
use gridtui_runtime::{Compositor, MemorySink};
use gridtui_widgets::{Block, Canvas, Drawable, canvas::BRAILLE_OFFSET};

fn two_blocks() -> (Block, Block) {
    let first = Block::new()
        .with_title("A")
        .with_rect(Rect::new(0, 0, 10, 5))
        .with_bg(Color::GREEN);
    let second = Block::new()
        .with_border(false)
        .with_rect(Rect::new(5, 2, 10, 5))
        .with_bg(Color::BLUE);
    (first, second)
}

fn check_overlay(get: impl Fn(i32, i32) -> (char, Color)) {
    for y in 2..=4 {
        for x in 5..=9 {
            assert_eq!(get(x, y), (' ', Color::BLUE), "overlap cell ({x}, {y})");
        }
    }

    assert_eq!(get(0, 0).0, '┌');
    assert_eq!(get(1, 0).0, 'A');
    assert_eq!(get(2, 0).0, '─');
    assert_eq!(get(0, 4).0, '└');
    for y in 1..=3 {
        assert_eq!(get(0, y).0, '│');
        for x in 1..=4 {
            assert_eq!(get(x, y), (' ', Color::GREEN), "first block fill ({x}, {y})");
        }
    }
    for x in 1..=4 {
        assert_eq!(get(x, 4).0, '─');
    }
}

#[test]
fn overlapping_blocks_in_a_shared_buffer() {
    let (first, second) = two_blocks();
    let mut screen = Buffer::new(Rect::from_size(50, 50));
    first.draw(&mut screen);
    second.draw(&mut screen);
    check_overlay(|x, y| {
        let c = screen.get(x, y);
        (c.ch, c.bg)
    });
}

#[test]
fn overlapping_blocks_merged_from_own_buffers() {
    let (first, second) = two_blocks();
    let mut screen = Buffer::new(Rect::from_size(50, 50));
    screen.merge(&gridtui_widgets::render_to_buffer(&first));
    screen.merge(&gridtui_widgets::render_to_buffer(&second));
    check_overlay(|x, y| {
        let c = screen.get(x, y);
        (c.ch, c.bg)
    });
}

#[test]
fn overlapping_blocks_through_the_compositor() {
    let (first, second) = two_blocks();
    let mut compositor = Compositor::new(MemorySink::new(50, 50)).unwrap();
    compositor.render(&[&first, &second]).unwrap();

    let sink = compositor.sink();
    assert_eq!(sink.flush_count(), 1);
    assert_eq!(sink.write_count(), 50 * 50);
    check_overlay(|x, y| {
        let c = sink.cell(x as u16, y as u16).unwrap();
        (c.ch, c.bg)
    });
    // Outside both blocks the default background shows.
    assert_eq!(sink.cell(40, 40).map(|c| c.bg), Some(Color::Reset));
}

#[test]
fn dashboard_grid_renders_every_widget() {
    let mut chart = Canvas::new().with_block(Block::new().with_title("chart").with_height(6));
    chart.set_line((2, 4), (30, 16), Color::RED);

    let mut grid = Grid::new(0, 0, 40)
        .with_row(Node::row(vec![
            Child::new(1, Node::leaf(chart)),
            Child::new(
                1,
                Node::stack([
                    Canvas::new().with_block(Block::new().with_title("top").with_height(3)),
                    Canvas::new().with_block(Block::new().with_title("bottom").with_height(3)),
                ]),
            ),
        ]));
    assert_eq!(grid.align(), Rect::new(0, 0, 40, 6));

    let mut compositor = Compositor::new(MemorySink::new(40, 8)).unwrap();
    compositor.render(&[&grid]).unwrap();
    let sink = compositor.sink();

    assert_eq!(sink.row_text(0).trim_end(), "┌chart─────────────┐┌top───────────────┐");
    assert_eq!(sink.row_text(3).chars().nth(20), Some('┌'));
    assert_eq!(sink.row_text(5).chars().nth(19), Some('┘'));

    let braille = (1..5)
        .flat_map(|y| (1..19).map(move |x| (x, y)))
        .filter_map(|(x, y)| sink.cell(x, y))
        .filter(|c| (c.ch as u32) > BRAILLE_OFFSET && (c.ch as u32) <= BRAILLE_OFFSET + 0xFF)
        .count();
    assert!(braille > 0);
}
