//! Downward beam propagation through a grid of splitters.
//!
//! A beam travels straight down one row at a time. When it enters a
//! splitter (`^`) it stops, and two new beams continue downward from the
//! cells immediately left and right of the splitter.
//!
//! Two questions are answered:
//! - how many distinct splitters are ever hit ([`count_splits`])
//! - how many timelines leave the grid when every split forks the
//!   timeline ([`count_timelines`])

use std::collections::BTreeMap;

use clap::ValueEnum;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Grid, Position};

/// What happens to a branch that a splitter pushes off the left or right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SideExit {
    /// The branch terminates and is not counted.
    #[default]
    Drop,
    /// The branch counts as a finished timeline.
    Complete,
}

/// Configuration for the timeline simulation
#[derive(Debug, Clone, Default)]
pub struct BeamConfig {
    pub side_exit: SideExit,
}

/// Outcome of the timeline simulation.
///
/// `injected` is the starting multiplicity plus the extra timeline created
/// by every split, so `exited_bottom + exited_sides == injected` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineReport {
    pub timelines: u64,
    pub injected: u64,
    pub exited_bottom: u64,
    pub exited_sides: u64,
    pub rows_simulated: usize,
}

/// Positions of every splitter reached by a beam starting at `start`,
/// sorted row-major.
pub fn split_cells(grid: &Grid, start: Position) -> Vec<Position> {
    let mut hit: FxHashSet<Position> = FxHashSet::default();
    let mut traced: FxHashSet<Position> = FxHashSet::default();
    let mut pending = vec![start];

    while let Some(origin) = pending.pop() {
        if !traced.insert(origin) {
            continue;
        }

        // Walk down until the beam leaves the grid or meets a splitter
        let mut row = origin.row + 1;
        while let Some(cell) = grid.at(Position::new(row, origin.col)) {
            if cell == Cell::Splitter {
                hit.insert(Position::new(row, origin.col));
                if origin.col > 0 {
                    pending.push(Position::new(row, origin.col - 1));
                }
                if origin.col + 1 < grid.width() {
                    pending.push(Position::new(row, origin.col + 1));
                }
                break;
            }
            row += 1;
        }
    }

    let mut cells: Vec<Position> = hit.into_iter().collect();
    cells.sort_unstable();
    cells
}

/// Number of distinct splitters hit by a beam starting at `start`.
pub fn count_splits(grid: &Grid, start: Position) -> usize {
    split_cells(grid, start).len()
}

/// Number of timelines that leave the grid, with the default side-exit rule.
pub fn count_timelines(grid: &Grid, start: Position) -> u64 {
    simulate_timelines(grid, start, &BeamConfig::default()).timelines
}

/// Advance a column → multiplicity map one row at a time.
///
/// All live beams share the same row, so the map is keyed by column only.
pub fn simulate_timelines(grid: &Grid, start: Position, config: &BeamConfig) -> TimelineReport {
    let mut report = TimelineReport {
        injected: 1,
        ..Default::default()
    };
    if grid.at(start).is_none() {
        report.injected = 0;
        return report;
    }

    let mut beams: BTreeMap<usize, u64> = BTreeMap::new();
    beams.insert(start.col, 1);
    let mut row = start.row;

    while !beams.is_empty() {
        let next_row = row + 1;
        report.rows_simulated += 1;

        if next_row >= grid.height() {
            report.exited_bottom += beams.values().sum::<u64>();
            break;
        }

        let mut next: BTreeMap<usize, u64> = BTreeMap::new();
        for (&col, &count) in &beams {
            if grid.at(Position::new(next_row, col)) != Some(Cell::Splitter) {
                *next.entry(col).or_insert(0) += count;
                continue;
            }

            report.injected += count;
            for target in [col.checked_sub(1), Some(col + 1)] {
                match target {
                    Some(c) if c < grid.width() => *next.entry(c).or_insert(0) += count,
                    _ => report.exited_sides += count,
                }
            }
        }

        beams = next;
        row = next_row;
    }

    report.timelines = match config.side_exit {
        SideExit::Drop => report.exited_bottom,
        SideExit::Complete => report.exited_bottom + report.exited_sides,
    };
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFOLD: &str = "\
.......S.......
...............
.......^.......
...............
......^.^......
...............
.....^.^.^.....
...............
....^.^...^....
...............
...^.^...^.^...
...............
..^...^.....^..
...............
.^.^.^.^.^...^.
...............";

    fn create_manifold() -> (Grid, Position) {
        let grid = Grid::parse(MANIFOLD).unwrap();
        let start = grid.find_start().unwrap();
        (grid, start)
    }

    #[test]
    fn test_example_split_count() {
        let (grid, start) = create_manifold();
        assert_eq!(count_splits(&grid, start), 21);
    }

    #[test]
    fn test_example_timelines() {
        let (grid, start) = create_manifold();
        assert_eq!(count_timelines(&grid, start), 40);
    }

    #[test]
    fn test_splits_never_exceed_splitters() {
        let (grid, start) = create_manifold();
        assert!(count_splits(&grid, start) <= grid.count(Cell::Splitter));

        let dense = Grid::parse("S..\n^^^\n^^^\n...").unwrap();
        let start = dense.find_start().unwrap();
        assert!(count_splits(&dense, start) <= dense.count(Cell::Splitter));
    }

    #[test]
    fn test_unreachable_splitter_not_counted() {
        let grid = Grid::parse(".S...\n.^..^\n.....").unwrap();
        let start = grid.find_start().unwrap();
        assert_eq!(split_cells(&grid, start), vec![Position::new(1, 1)]);
    }

    #[test]
    fn test_conservation_without_side_exits() {
        let (grid, start) = create_manifold();
        let report = simulate_timelines(&grid, start, &BeamConfig::default());
        assert_eq!(report.exited_sides, 0);
        assert_eq!(report.exited_bottom, report.injected);
        assert_eq!(report.timelines, 40);
    }

    #[test]
    fn test_side_exit_dropped_by_default() {
        // The splitter sits on the left edge, so its left branch leaves the grid
        let grid = Grid::parse("S..\n^..\n...").unwrap();
        let start = grid.find_start().unwrap();

        let report = simulate_timelines(&grid, start, &BeamConfig::default());
        assert_eq!(report.timelines, 1);
        assert_eq!(report.exited_sides, 1);
        assert_eq!(report.exited_bottom + report.exited_sides, report.injected);
        assert!(report.exited_bottom <= report.injected);
    }

    #[test]
    fn test_side_exit_completed_when_configured() {
        let grid = Grid::parse("S..\n^..\n...").unwrap();
        let start = grid.find_start().unwrap();
        let config = BeamConfig {
            side_exit: SideExit::Complete,
        };

        let report = simulate_timelines(&grid, start, &config);
        assert_eq!(report.timelines, 2);
    }

    #[test]
    fn test_merging_beams_add_multiplicity() {
        // Two splitters feed the middle column from both sides
        let grid = Grid::parse("..S..\n.....\n..^..\n.^.^.\n.....").unwrap();
        let start = grid.find_start().unwrap();
        let report = simulate_timelines(&grid, start, &BeamConfig::default());
        // Left beam -> cols 0,2; right beam -> cols 2,4
        assert_eq!(report.timelines, 4);
        assert_eq!(count_splits(&grid, start), 3);
    }

    #[test]
    fn test_start_on_last_row_exits_immediately() {
        let grid = Grid::parse("...\n.S.").unwrap();
        let start = grid.find_start().unwrap();
        assert_eq!(count_timelines(&grid, start), 1);
        assert_eq!(count_splits(&grid, start), 0);
    }
}
