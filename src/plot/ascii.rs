//! ASCII plotting of a card for terminal output.
//!
//! Fixed-size grid in normalized card space (displacement across, load up),
//! deterministic so it can be golden-tested.
//!
//! Plot elements:
//! - loop path: `.`
//! - samples: `L`, `T`, `R`, `B` by the side they were assigned to
//! - corners: `*`

use crate::card::CardGeometry;
use crate::domain::Point;

/// Render the classified cycle of a card.
pub fn render_card_plot(geometry: &CardGeometry, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let mut grid = vec![vec![' '; width]; height];

    // Path first so samples overlay it.
    let cells: Vec<(usize, usize)> = geometry
        .normalized
        .iter()
        .map(|p| to_cell(p, width, height))
        .collect();
    for (i, &(x0, y0)) in cells.iter().enumerate() {
        let (x1, y1) = cells[(i + 1) % cells.len()];
        draw_line(&mut grid, x0, y0, x1, y1, '.');
    }

    for segment in geometry.card.segments() {
        let marker = segment.side().marker();
        for p in segment.points() {
            let (x, y) = to_cell(p, width, height);
            grid[y][x] = marker;
        }
    }

    let c = geometry.corners;
    for index in [c.lower_left, c.upper_left, c.upper_right, c.lower_right] {
        if let Some(p) = geometry.normalized.get(index) {
            let (x, y) = to_cell(p, width, height);
            grid[y][x] = '*';
        }
    }

    let mut out = String::from("Card (normalized): displacement ->, load ^ | sides L T R B | corners *\n");
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn to_cell(p: &Point, width: usize, height: usize) -> (usize, usize) {
    (map_x(p.x, width), map_y(p.y, height))
}

fn map_x(x: f64, width: usize) -> usize {
    let u = x.clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, height: usize) -> usize {
    let u = y.clamp(0.0, 1.0);
    // Highest load is row 0.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills empty cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
