//! Exact solvers for grid, packing, linear-algebra and graph puzzles.
//!
//! Each module parses its own puzzle text and answers it without
//! heuristics: beam splitting on a grid, roll removal, polyomino packing,
//! minimum button presses over GF(2) and over the non-negative integers,
//! simple-path counting, closest-pair circuit building, rectangles inside
//! a tile loop, and fresh ID ranges.

pub mod beams;
pub mod circuits;
pub mod error;
pub mod gf2;
pub mod grid;
pub mod joltage;
pub mod machine;
pub mod packing;
pub mod paths;
pub mod ranges;
pub mod rolls;
pub mod shape;
pub mod tiles;

// Re-export main types
pub use beams::{count_splits, count_timelines, simulate_timelines, BeamConfig, SideExit, TimelineReport};
pub use circuits::{final_connection, largest_circuits_product, parse_points, CircuitsReport, Point, UnionFind};
pub use error::{ParseError, PathError, SolveError};
pub use gf2::{apply_presses, min_presses, LightSolution};
pub use grid::{Cell, Grid, Position};
pub use joltage::min_counter_presses;
pub use machine::Machine;
pub use packing::{count_packable, pack_region, pack_region_with, PackConfig, PackResult, PackingPuzzle, Region};
pub use paths::{count_paths, count_paths_through, Graph};
pub use ranges::{FreshReport, IdRange, Inventory, RangeSet};
pub use rolls::{accessible_rolls, removable_rolls, simulate_removal, RemovalReport};
pub use shape::{Shape, ShapeCatalog};
pub use tiles::{largest_enclosed_rectangle, largest_rectangle, parse_tiles, Floor, Tile, TilesReport};
