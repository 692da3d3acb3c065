//! Immutable symbol grid shared by the beam and roll simulations.
//!
//! Grids are parsed once from puzzle text and never mutated by the
//! solvers; simulations that need to change cells work on their own copy.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    /// `.`
    Empty,
    /// `@`, a roll of paper
    Roll,
    /// `^`, terminates a beam and spawns two lateral beams
    Splitter,
    /// `S`, where the first beam enters
    Start,
}

impl Cell {
    pub fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            '.' => Some(Cell::Empty),
            '@' => Some(Cell::Roll),
            '^' => Some(Cell::Splitter),
            'S' => Some(Cell::Start),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Roll => '@',
            Cell::Splitter => '^',
            Cell::Start => 'S',
        }
    }
}

/// Position on the grid, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The eight neighbour offsets, row-major.
pub const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A rectangular grid of cells stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Parse a grid from text. Blank lines are ignored; every remaining row
    /// must have the width of the first one.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut cells = Vec::new();
        let mut width = None;
        let mut height = 0;

        for (idx, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = idx + 1;
            let row_width = line.chars().count();
            match width {
                None => width = Some(row_width),
                Some(expected) if expected != row_width => {
                    return Err(ParseError::RaggedRow {
                        line: line_no,
                        expected,
                        found: row_width,
                    });
                }
                Some(_) => {}
            }
            for symbol in line.chars() {
                let cell = Cell::from_symbol(symbol).ok_or(ParseError::UnknownSymbol {
                    line: line_no,
                    symbol,
                })?;
                cells.push(cell);
            }
            height += 1;
        }

        let width = width.ok_or(ParseError::Empty)?;
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at a position (bounds-checked, signed so callers can
    /// look one step outside the grid)
    pub fn get(&self, row: isize, col: isize) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    pub fn at(&self, pos: Position) -> Option<Cell> {
        self.get(pos.row as isize, pos.col as isize)
    }

    /// First start cell in row-major order.
    pub fn find_start(&self) -> Option<Position> {
        self.positions_of(Cell::Start).next()
    }

    /// All positions holding `cell`, row-major.
    pub fn positions_of(&self, cell: Cell) -> impl Iterator<Item = Position> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == cell)
            .map(move |(idx, _)| Position::new(idx / width, idx % width))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Count neighbours of `pos` (8-connected) holding `cell`.
    pub fn neighbour_count(&self, pos: Position, cell: Cell) -> usize {
        NEIGHBOURS
            .iter()
            .filter(|(dr, dc)| self.get(pos.row as isize + dr, pos.col as isize + dc) == Some(cell))
            .count()
    }

    /// Overwrite a cell. Only simulations holding their own copy call this.
    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        if pos.row < self.height && pos.col < self.width {
            self.cells[pos.row * self.width + pos.col] = cell;
        }
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
