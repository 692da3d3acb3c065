//! Largest rectangles with red tiles on two opposite corners.
//!
//! The red tiles, in input order, also trace a closed loop of horizontal
//! and vertical runs. Tiles on the loop and tiles enclosed by it are green.
//! [`largest_rectangle`] ignores colour; [`largest_enclosed_rectangle`]
//! only accepts rectangles made entirely of red and green tiles.
//!
//! Containment is decided exactly on a compressed floor: every distinct
//! tile coordinate gets its own row or column, and each run of columns
//! between two of them collapses into a single weighted column. Outside
//! cells are found by flood fill from a padding ring, and a prefix sum over
//! their tile counts answers each rectangle in constant time.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{parse_number, ParseError, SolveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i64,
    pub y: i64,
}

impl Tile {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Parse one `x,y` tile per non-blank line.
pub fn parse_tiles(input: &str) -> Result<Vec<Tile>, ParseError> {
    let mut tiles = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (x, y) = line
            .split_once(',')
            .ok_or_else(|| ParseError::malformed(idx + 1, "expected `x,y`"))?;
        tiles.push(Tile::new(parse_number(idx + 1, x)?, parse_number(idx + 1, y)?));
    }
    if tiles.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(tiles)
}

/// Tiles covered by the rectangle with corners `a` and `b`, edges included.
pub fn rectangle_area(a: Tile, b: Tile) -> u64 {
    (a.x.abs_diff(b.x) + 1) * (a.y.abs_diff(b.y) + 1)
}

/// Largest rectangle with two red tiles as opposite corners. 0 for fewer
/// than two tiles.
pub fn largest_rectangle(tiles: &[Tile]) -> u64 {
    let mut best = 0;
    for (i, &a) in tiles.iter().enumerate() {
        for &b in &tiles[i + 1..] {
            best = best.max(rectangle_area(a, b));
        }
    }
    best
}

/// Compressed index of `value`: coordinates sit at odd indices, the gaps
/// between them at even ones.
fn compress(values: &[i64], value: i64) -> usize {
    2 * values.partition_point(|&v| v < value) + 1
}

/// Tiles represented by each compressed index.
fn weights(values: &[i64]) -> Vec<u64> {
    let last = 2 * values.len();
    (0..=last)
        .map(|c| match c {
            _ if c % 2 == 1 => 1,
            0 => 0,
            _ if c == last => 0,
            _ => values[c / 2].abs_diff(values[c / 2 - 1]) - 1,
        })
        .collect()
}

/// The loop's floor, compressed, with a prefix sum of outside tiles.
#[derive(Debug, Clone)]
pub struct Floor {
    xs: Vec<i64>,
    ys: Vec<i64>,
    width: usize,
    /// `(height + 1) x (width + 1)` inclusive prefix sums of outside tiles
    outside: Vec<u64>,
}

impl Floor {
    /// Build the floor enclosed by `tiles` taken as a closed loop.
    pub fn new(tiles: &[Tile]) -> Result<Self, SolveError> {
        let mut xs: Vec<i64> = tiles.iter().map(|t| t.x).collect();
        let mut ys: Vec<i64> = tiles.iter().map(|t| t.y).collect();
        xs.sort_unstable();
        xs.dedup();
        ys.sort_unstable();
        ys.dedup();

        let (width, height) = (2 * xs.len() + 1, 2 * ys.len() + 1);
        let mut boundary = vec![false; width * height];
        for (i, &a) in tiles.iter().enumerate() {
            let j = (i + 1) % tiles.len();
            let b = tiles[j];
            if a.x != b.x && a.y != b.y {
                return Err(SolveError::DiagonalEdge { from: i, to: j });
            }
            let (c1, c2) = minmax(compress(&xs, a.x), compress(&xs, b.x));
            let (r1, r2) = minmax(compress(&ys, a.y), compress(&ys, b.y));
            for r in r1..=r2 {
                boundary[r * width + c1..=r * width + c2].fill(true);
            }
        }

        // The padding ring at index 0 is never on the loop
        let mut outside = vec![false; width * height];
        let mut queue = VecDeque::from([(0usize, 0usize)]);
        outside[0] = true;
        while let Some((r, c)) = queue.pop_front() {
            let neighbours = [
                (r.wrapping_sub(1), c),
                (r + 1, c),
                (r, c.wrapping_sub(1)),
                (r, c + 1),
            ];
            for (nr, nc) in neighbours {
                if nr < height && nc < width {
                    let idx = nr * width + nc;
                    if !outside[idx] && !boundary[idx] {
                        outside[idx] = true;
                        queue.push_back((nr, nc));
                    }
                }
            }
        }

        let (wx, wy) = (weights(&xs), weights(&ys));
        let stride = width + 1;
        let mut prefix = vec![0u64; stride * (height + 1)];
        for r in 0..height {
            for c in 0..width {
                let tiles_here = if outside[r * width + c] { wx[c] * wy[r] } else { 0 };
                prefix[(r + 1) * stride + c + 1] =
                    prefix[r * stride + c + 1] + prefix[(r + 1) * stride + c] - prefix[r * stride + c] + tiles_here;
            }
        }

        Ok(Self {
            xs,
            ys,
            width,
            outside: prefix,
        })
    }

    /// Whether every tile of the rectangle spanned by two loop tiles is red
    /// or green. Corners must be tiles the floor was built from.
    pub fn contains_rectangle(&self, a: Tile, b: Tile) -> bool {
        let (c1, c2) = minmax(compress(&self.xs, a.x), compress(&self.xs, b.x));
        let (r1, r2) = minmax(compress(&self.ys, a.y), compress(&self.ys, b.y));
        let stride = self.width + 1;
        let at = |r: usize, c: usize| self.outside[r * stride + c];
        // Added before subtracting so the unsigned sum never dips below zero
        at(r2 + 1, c2 + 1) + at(r1, c1) - at(r1, c2 + 1) - at(r2 + 1, c1) == 0
    }
}

fn minmax(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Largest rectangle with red corners whose every tile is red or green.
pub fn largest_enclosed_rectangle(tiles: &[Tile]) -> Result<u64, SolveError> {
    let floor = Floor::new(tiles)?;
    let mut best = 0;
    for (i, &a) in tiles.iter().enumerate() {
        for &b in &tiles[i + 1..] {
            let area = rectangle_area(a, b);
            if area > best && floor.contains_rectangle(a, b) {
                best = area;
            }
        }
    }
    Ok(best)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesReport {
    pub tiles: usize,
    pub largest: u64,
    pub largest_enclosed: u64,
}

pub fn analyze(tiles: &[Tile]) -> Result<TilesReport, SolveError> {
    Ok(TilesReport {
        tiles: tiles.len(),
        largest: largest_rectangle(tiles),
        largest_enclosed: largest_enclosed_rectangle(tiles)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_TILES: &str = "\
7,1
11,1
11,7
9,7
9,5
2,5
2,3
7,3";

    fn create_loop(points: &[(i64, i64)]) -> Vec<Tile> {
        points.iter().map(|&(x, y)| Tile::new(x, y)).collect()
    }

    /// Brute force over every tile of the bounding box.
    fn enclosed_by_scan(tiles: &[Tile]) -> u64 {
        let n = tiles.len();
        let on_loop = |x: i64, y: i64| {
            (0..n).any(|i| {
                let (a, b) = (tiles[i], tiles[(i + 1) % n]);
                a.x.min(b.x) <= x && x <= a.x.max(b.x) && a.y.min(b.y) <= y && y <= a.y.max(b.y)
            })
        };
        let green = |x: i64, y: i64| {
            if on_loop(x, y) {
                return true;
            }
            let crossings = (0..n)
                .filter(|&i| {
                    let (a, b) = (tiles[i], tiles[(i + 1) % n]);
                    a.x == b.x && a.x > x && a.y.min(b.y) <= y && y < a.y.max(b.y)
                })
                .count();
            crossings % 2 == 1
        };
        let mut best = 0;
        for (i, &a) in tiles.iter().enumerate() {
            for &b in &tiles[i + 1..] {
                let all_green = (a.x.min(b.x)..=a.x.max(b.x))
                    .all(|x| (a.y.min(b.y)..=a.y.max(b.y)).all(|y| green(x, y)));
                if all_green {
                    best = best.max(rectangle_area(a, b));
                }
            }
        }
        best
    }

    #[test]
    fn test_example_largest() {
        let tiles = parse_tiles(RED_TILES).unwrap();
        assert_eq!(largest_rectangle(&tiles), 50);
    }

    #[test]
    fn test_example_largest_enclosed() {
        let tiles = parse_tiles(RED_TILES).unwrap();
        assert_eq!(largest_enclosed_rectangle(&tiles), Ok(24));

        let floor = Floor::new(&tiles).unwrap();
        assert!(floor.contains_rectangle(Tile::new(9, 5), Tile::new(2, 3)));
        assert!(floor.contains_rectangle(Tile::new(9, 7), Tile::new(9, 5)));
        assert!(!floor.contains_rectangle(Tile::new(7, 1), Tile::new(11, 7)));
        assert!(!floor.contains_rectangle(Tile::new(2, 5), Tile::new(11, 1)));
    }

    #[test]
    fn test_u_shape_excludes_notch() {
        let tiles = create_loop(&[(0, 0), (6, 0), (6, 6), (4, 6), (4, 2), (2, 2), (2, 6), (0, 6)]);
        assert_eq!(largest_rectangle(&tiles), 49);
        assert_eq!(largest_enclosed_rectangle(&tiles), Ok(21));
        assert_eq!(largest_enclosed_rectangle(&tiles), Ok(enclosed_by_scan(&tiles)));
    }

    #[test]
    fn test_touching_runs_leave_no_gap() {
        // The notch between columns 2 and 3 is all loop tiles, so the whole box counts
        let tiles = create_loop(&[(0, 0), (2, 0), (2, 5), (3, 5), (3, 0), (5, 0), (5, 7), (0, 7)]);
        assert_eq!(largest_enclosed_rectangle(&tiles), Ok(48));
        assert_eq!(enclosed_by_scan(&tiles), 48);
    }

    #[test]
    fn test_matches_scan_on_example() {
        let tiles = parse_tiles(RED_TILES).unwrap();
        assert_eq!(largest_enclosed_rectangle(&tiles), Ok(enclosed_by_scan(&tiles)));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(largest_rectangle(&[Tile::new(3, 4)]), 0);
        assert_eq!(largest_enclosed_rectangle(&[Tile::new(3, 4)]), Ok(0));
        // A single column: every rectangle is a segment of the loop
        let line = create_loop(&[(1, 1), (1, 4)]);
        assert_eq!(largest_enclosed_rectangle(&line), Ok(4));
    }

    #[test]
    fn test_diagonal_edge_rejected() {
        let tiles = create_loop(&[(0, 0), (3, 0), (5, 5)]);
        assert_eq!(
            largest_enclosed_rectangle(&tiles),
            Err(SolveError::DiagonalEdge { from: 1, to: 2 })
        );
        // Colour-blind search does not need the loop
        assert_eq!(largest_rectangle(&tiles), 36);
    }

    #[test]
    fn test_report_and_parse_errors() {
        let report = analyze(&parse_tiles(RED_TILES).unwrap()).unwrap();
        assert_eq!(
            report,
            TilesReport {
                tiles: 8,
                largest: 50,
                largest_enclosed: 24
            }
        );
        assert_eq!(parse_tiles(""), Err(ParseError::Empty));
        assert!(matches!(parse_tiles("1 2"), Err(ParseError::Malformed { line: 1, .. })));
        assert!(matches!(parse_tiles("1,2\n3,y"), Err(ParseError::InvalidNumber { line: 2, .. })));
    }
}
