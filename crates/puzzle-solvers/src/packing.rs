//! Backtracking packer for polyomino pieces in a rectangular region.
//!
//! The search always works on the first empty cell in row-major order (the
//! anchor). Every cell before the anchor is already resolved, so a piece
//! covering the anchor must put its own first cell there; placements are
//! precomputed once per region and indexed by that first cell.
//!
//! When the demanded pieces cover less than the whole region, the anchor
//! may also be left empty, spending one unit of slack. Two prunes keep the
//! search small:
//! - cells ahead of the anchor that no remaining placement can cover are
//!   wasted, and waste beyond the remaining slack fails the branch
//! - failed states (anchor, occupancy, remaining demand) are remembered
//!   for the rest of the call

use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{parse_number, ParseError};
use crate::shape::{Shape, ShapeCatalog};

/// How often (in search nodes) the deadline is checked
const DEADLINE_CHECK_INTERVAL: usize = 1024;

/// A fixed-size set of cell indices packed into 64-bit words.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bitset {
    words: SmallVec<[u64; 4]>,
}

impl Bitset {
    pub fn new(bits: usize) -> Self {
        Self {
            words: SmallVec::from_elem(0, bits.div_ceil(64)),
        }
    }

    pub fn get(&self, idx: usize) -> bool {
        self.words[idx / 64] & (1 << (idx % 64)) != 0
    }

    pub fn set(&mut self, idx: usize) {
        self.words[idx / 64] |= 1 << (idx % 64);
    }

    pub fn clear(&mut self, idx: usize) {
        self.words[idx / 64] &= !(1 << (idx % 64));
    }

    pub fn intersects(&self, other: &Bitset) -> bool {
        self.words.iter().zip(&other.words).any(|(a, b)| a & b != 0)
    }

    pub fn union_with(&mut self, other: &Bitset) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= b;
        }
    }

    pub fn difference_with(&mut self, other: &Bitset) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= !b;
        }
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Occupancy of a region, one bit per cell, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    occupied: Bitset,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            occupied: Bitset::new(width * height),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.occupied.get(row * self.width + col)
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.count_ones()
    }

    /// True if every cell of `placement` is free.
    pub fn fits(&self, placement: &Placement) -> bool {
        !self.occupied.intersects(&placement.mask)
    }

    /// Commit `placement` if it is collision-free.
    ///
    /// Returns false and leaves the board untouched otherwise.
    pub fn try_place(&mut self, placement: &Placement) -> bool {
        if !self.fits(placement) {
            return false;
        }
        self.occupied.union_with(&placement.mask);
        true
    }

    /// Undo a placement committed by [`Board::try_place`].
    pub fn remove(&mut self, placement: &Placement) {
        self.occupied.difference_with(&placement.mask);
    }

    /// First free cell at or after `from`, row-major.
    pub fn first_empty_from(&self, from: usize) -> Option<usize> {
        (from..self.area()).find(|&idx| !self.occupied.get(idx))
    }

    /// Free cells not present in `coverable`.
    fn uncoverable_empty(&self, coverable: &Bitset) -> usize {
        (0..self.area())
            .filter(|&idx| !self.occupied.get(idx) && !coverable.get(idx))
            .count()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.height {
            let line: String = (0..self.width)
                .map(|col| if self.is_occupied(row, col) { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// One orientation of one shape at one offset inside a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub shape_id: usize,
    /// Row-major index of the placement's first cell
    pub first: usize,
    mask: Bitset,
}

impl Placement {
    /// Place `orientation` with its bounding box at `(row, col)`.
    ///
    /// Returns `None` if any cell falls outside the region.
    pub fn new(
        shape_id: usize,
        orientation: &Shape,
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    ) -> Option<Self> {
        let mut mask = Bitset::new(width * height);
        let mut first = None;
        for &(r, c) in orientation.cells() {
            let (r, c) = (row + r, col + c);
            if r >= height || c >= width {
                return None;
            }
            let idx = r * width + c;
            first = Some(first.map_or(idx, |f: usize| f.min(idx)));
            mask.set(idx);
        }
        Some(Self {
            shape_id,
            first: first?,
            mask,
        })
    }

    pub fn cells(&self) -> usize {
        self.mask.count_ones()
    }
}

/// A region to fill and how many of each shape it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub width: usize,
    pub height: usize,
    /// `demands[id]` is the number of copies of shape `id`
    pub demands: Vec<usize>,
}

impl Region {
    pub fn new(width: usize, height: usize, demands: Vec<usize>) -> Self {
        Self {
            width,
            height,
            demands,
        }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn piece_count(&self) -> usize {
        self.demands.iter().sum()
    }

    /// Total cells claimed by the demanded pieces, or `None` if a demanded
    /// shape is missing from the catalog.
    pub fn demanded_area(&self, catalog: &ShapeCatalog) -> Option<usize> {
        self.demands
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(id, &count)| catalog.get(id).map(|shape| shape.area() * count))
            .sum()
    }
}

/// Configuration for the packer
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Give up after this long; `None` searches to exhaustion
    pub timeout: Option<Duration>,
    /// Remember failed states for the rest of the call
    pub memoize: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            memoize: true,
        }
    }
}

/// Result of packing one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackResult {
    pub fits: bool,
    /// False only when the search was cut short by the timeout
    pub search_exhausted: bool,
    pub nodes: usize,
    pub time_elapsed_ms: u64,
}

/// All placements of one demanded shape.
struct Piece {
    remaining: usize,
    placements: Vec<Placement>,
    /// `by_anchor[cell]` lists placement indices whose first cell is `cell`
    by_anchor: Vec<Vec<usize>>,
}

impl Piece {
    fn new(shape_id: usize, shape: &Shape, count: usize, width: usize, height: usize) -> Self {
        let mut placements = Vec::new();
        for orientation in shape.orientations() {
            if orientation.height() > height || orientation.width() > width {
                continue;
            }
            for row in 0..=height - orientation.height() {
                for col in 0..=width - orientation.width() {
                    placements.extend(Placement::new(shape_id, &orientation, row, col, width, height));
                }
            }
        }

        let mut by_anchor = vec![Vec::new(); width * height];
        for (idx, placement) in placements.iter().enumerate() {
            by_anchor[placement.first].push(idx);
        }

        Self {
            remaining: count,
            placements,
            by_anchor,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct StateKey {
    anchor: usize,
    occupied: Bitset,
    remaining: SmallVec<[usize; 8]>,
}

struct Packer {
    board: Board,
    pieces: Vec<Piece>,
    slack: usize,
    nodes: usize,
    memoize: bool,
    dead: FxHashSet<StateKey>,
    deadline: Option<Instant>,
    timed_out: bool,
}

impl Packer {
    fn pieces_left(&self) -> usize {
        self.pieces.iter().map(|p| p.remaining).sum()
    }

    fn state_key(&self, anchor: usize) -> StateKey {
        StateKey {
            anchor,
            occupied: self.board.occupied.clone(),
            remaining: self.pieces.iter().map(|p| p.remaining).collect(),
        }
    }

    /// Empty cells that no remaining piece can still cover.
    fn waste(&self, anchor: usize) -> usize {
        let mut coverable = Bitset::new(self.board.area());
        for piece in self.pieces.iter().filter(|p| p.remaining > 0) {
            for indices in &piece.by_anchor[anchor..] {
                for &idx in indices {
                    let placement = &piece.placements[idx];
                    if self.board.fits(placement) {
                        coverable.union_with(&placement.mask);
                    }
                }
            }
        }
        self.board.uncoverable_empty(&coverable)
    }

    fn out_of_time(&mut self) -> bool {
        if !self.timed_out && self.nodes % DEADLINE_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                self.timed_out = Instant::now() > deadline;
            }
        }
        self.timed_out
    }

    fn search(&mut self, from: usize) -> bool {
        self.nodes += 1;
        if self.pieces_left() == 0 {
            return true;
        }
        if self.out_of_time() {
            return false;
        }

        let anchor = match self.board.first_empty_from(from) {
            Some(anchor) => anchor,
            None => return false,
        };
        if self.waste(anchor) > self.slack {
            return false;
        }

        let key = self.memoize.then(|| self.state_key(anchor));
        if let Some(key) = &key {
            if self.dead.contains(key) {
                return false;
            }
        }

        for p in 0..self.pieces.len() {
            if self.pieces[p].remaining == 0 {
                continue;
            }
            for i in 0..self.pieces[p].by_anchor[anchor].len() {
                let idx = self.pieces[p].by_anchor[anchor][i];
                if !self.board.try_place(&self.pieces[p].placements[idx]) {
                    continue;
                }
                self.pieces[p].remaining -= 1;
                let found = self.search(anchor + 1);
                self.pieces[p].remaining += 1;
                self.board.remove(&self.pieces[p].placements[idx]);

                if found {
                    return true;
                }
                if self.timed_out {
                    return false;
                }
            }
        }

        // Leave the anchor empty
        if self.slack > 0 {
            self.slack -= 1;
            self.board.occupied.set(anchor);
            let found = self.search(anchor + 1);
            self.board.occupied.clear(anchor);
            self.slack += 1;
            if found {
                return true;
            }
        }

        if let Some(key) = key {
            if !self.timed_out {
                self.dead.insert(key);
            }
        }
        false
    }
}

/// Can every demanded piece be placed in the region without overlap?
pub fn pack_region(catalog: &ShapeCatalog, region: &Region) -> bool {
    pack_region_with(catalog, region, &PackConfig::default()).fits
}

/// Pack one region, reporting search statistics.
///
/// A region demanding a shape missing from the catalog does not fit.
pub fn pack_region_with(catalog: &ShapeCatalog, region: &Region, config: &PackConfig) -> PackResult {
    let start_time = Instant::now();
    let finished = |fits: bool, search_exhausted: bool, nodes: usize| PackResult {
        fits,
        search_exhausted,
        nodes,
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    };

    let demanded = match region.demanded_area(catalog) {
        Some(area) => area,
        None => return finished(false, true, 0),
    };
    if demanded > region.area() {
        return finished(false, true, 0);
    }
    if region.piece_count() == 0 {
        return finished(true, true, 0);
    }

    let pieces = region
        .demands
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .filter_map(|(id, &count)| {
            catalog
                .get(id)
                .map(|shape| Piece::new(id, shape, count, region.width, region.height))
        })
        .collect();

    let mut packer = Packer {
        board: Board::new(region.width, region.height),
        pieces,
        slack: region.area() - demanded,
        nodes: 0,
        memoize: config.memoize,
        dead: FxHashSet::default(),
        deadline: config.timeout.map(|t| start_time + t),
        timed_out: false,
    };

    let fits = packer.search(0);
    finished(fits, !packer.timed_out, packer.nodes)
}

/// Number of regions that can hold all of their pieces.
pub fn count_packable(catalog: &ShapeCatalog, regions: &[Region]) -> usize {
    regions.iter().filter(|r| pack_region(catalog, r)).count()
}

/// A parsed packing puzzle: shape definitions followed by region lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingPuzzle {
    pub catalog: ShapeCatalog,
    pub regions: Vec<Region>,
}

impl PackingPuzzle {
    /// Parse the `id:` shape blocks and `WxH: c0 c1 ...` region lines.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut catalog = ShapeCatalog::new();
        let mut regions = Vec::new();
        // (id, line of first row, rows)
        let mut block: ShapeBlock = None;

        for (idx, raw) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                flush_block(&mut block, &mut catalog)?;
                continue;
            }
            if let Some(id) = ShapeCatalog::parse_header(line, line_no)? {
                flush_block(&mut block, &mut catalog)?;
                block = Some((id, line_no + 1, Vec::new()));
                continue;
            }
            if line.contains(':') {
                flush_block(&mut block, &mut catalog)?;
                regions.push((line_no, parse_region(line, line_no)?));
                continue;
            }
            match block.as_mut() {
                Some((_, _, rows)) => rows.push(line),
                None => return Err(ParseError::malformed(line_no, "shape row outside a shape block")),
            }
        }
        flush_block(&mut block, &mut catalog)?;

        if catalog.is_empty() && regions.is_empty() {
            return Err(ParseError::Empty);
        }

        for (line, region) in &regions {
            for (shape, &count) in region.demands.iter().enumerate() {
                if count > 0 && catalog.get(shape).is_none() {
                    return Err(ParseError::UnknownShape { line: *line, shape });
                }
            }
        }

        Ok(Self {
            catalog,
            regions: regions.into_iter().map(|(_, region)| region).collect(),
        })
    }
}

type ShapeBlock<'a> = Option<(usize, usize, Vec<&'a str>)>;

fn flush_block(block: &mut ShapeBlock<'_>, catalog: &mut ShapeCatalog) -> Result<(), ParseError> {
    if let Some((id, first_line, rows)) = block.take() {
        catalog.insert(id, Shape::from_rows(&rows, first_line)?);
    }
    Ok(())
}

fn parse_region(line: &str, line_no: usize) -> Result<Region, ParseError> {
    let (dims, counts) = line
        .split_once(':')
        .ok_or_else(|| ParseError::malformed(line_no, "region line needs ':'"))?;
    let (width, height) = dims
        .split_once('x')
        .ok_or_else(|| ParseError::malformed(line_no, "region size must be WxH"))?;
    let demands = counts
        .split_whitespace()
        .map(|count| parse_number(line_no, count))
        .collect::<Result<Vec<usize>, _>>()?;
    Ok(Region::new(
        parse_number(line_no, width)?,
        parse_number(line_no, height)?,
        demands,
    ))
}
