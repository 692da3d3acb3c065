//! Polyomino shapes and their symmetry orientations.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{parse_number, ParseError};

/// A translation-normalized set of occupied cells.
///
/// Cells are `(row, col)` pairs, sorted row-major, with the minimum row and
/// the minimum column both equal to zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Shape {
    cells: Vec<(usize, usize)>,
}

impl Shape {
    /// Build a shape from arbitrary integer coordinates. Duplicates collapse.
    pub fn new(cells: impl IntoIterator<Item = (i32, i32)>) -> Self {
        let raw: BTreeSet<(i32, i32)> = cells.into_iter().collect();
        let min_r = raw.iter().map(|&(r, _)| r).min().unwrap_or(0);
        let min_c = raw.iter().map(|&(_, c)| c).min().unwrap_or(0);
        let cells = raw
            .into_iter()
            .map(|(r, c)| ((r - min_r) as usize, (c - min_c) as usize))
            .collect();
        Self { cells }
    }

    /// Parse `#`/`.` rows into a shape.
    ///
    /// `first_line` is the 1-based line number of `rows[0]`, for errors.
    pub fn from_rows(rows: &[&str], first_line: usize) -> Result<Self, ParseError> {
        let mut cells = Vec::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, symbol) in row.trim().chars().enumerate() {
                match symbol {
                    '#' => cells.push((r as i32, c as i32)),
                    '.' => {}
                    _ => {
                        return Err(ParseError::UnknownSymbol {
                            line: first_line + r,
                            symbol,
                        })
                    }
                }
            }
        }
        if cells.is_empty() {
            return Err(ParseError::malformed(first_line, "shape has no cells"));
        }
        Ok(Self::new(cells))
    }

    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Number of occupied cells
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn height(&self) -> usize {
        self.cells.iter().map(|&(r, _)| r + 1).max().unwrap_or(0)
    }

    pub fn width(&self) -> usize {
        self.cells.iter().map(|&(_, c)| c + 1).max().unwrap_or(0)
    }

    fn map(&self, f: impl Fn(i32, i32) -> (i32, i32)) -> Shape {
        Shape::new(self.cells.iter().map(|&(r, c)| f(r as i32, c as i32)))
    }

    /// Rotate 90° clockwise.
    pub fn rotate(&self) -> Shape {
        self.map(|r, c| (c, -r))
    }

    /// Mirror left-right.
    pub fn reflect(&self) -> Shape {
        self.map(|r, c| (r, -c))
    }

    /// All distinct orientations under rotation and reflection, in a
    /// deterministic order: the four rotations first, then the four
    /// rotations of the mirror image, duplicates removed.
    pub fn orientations(&self) -> Vec<Shape> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(8);
        for base in [self.clone(), self.reflect()] {
            let mut current = base;
            for _ in 0..4 {
                let next = current.rotate();
                if seen.insert(current.clone()) {
                    out.push(current);
                }
                current = next;
            }
        }
        out
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.height() {
            let row: String = (0..self.width())
                .map(|c| if self.cells.binary_search(&(r, c)).is_ok() { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Shapes keyed by their puzzle id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeCatalog {
    shapes: BTreeMap<usize, Shape>,
}

impl ShapeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: usize, shape: Shape) {
        self.shapes.insert(id, shape);
    }

    pub fn get(&self, id: usize) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Shape)> {
        self.shapes.iter().map(|(&id, shape)| (id, shape))
    }

    /// Parse one `id:` header line, returning the id if it is a header.
    ///
    /// Region lines (`12x5: ...`) are not headers.
    pub(crate) fn parse_header(line: &str, line_no: usize) -> Result<Option<usize>, ParseError> {
        let line = line.trim();
        match line.strip_suffix(':') {
            Some(id) if !id.contains('x') => parse_number(line_no, id).map(Some),
            _ => Ok(None),
        }
    }
}

impl FromIterator<(usize, Shape)> for ShapeCatalog {
    fn from_iter<T: IntoIterator<Item = (usize, Shape)>>(iter: T) -> Self {
        Self {
            shapes: iter.into_iter().collect(),
        }
    }
}
