//! Neighbour-count erosion of paper rolls (`@`).
//!
//! A roll is accessible when fewer than [`ACCESS_LIMIT`] of its eight
//! neighbours are also rolls. Removing accessible rolls can expose more,
//! so the removal simulation runs in rounds until nothing changes.

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Grid, Position};

/// A roll with this many neighbouring rolls or more is blocked.
pub const ACCESS_LIMIT: usize = 4;

/// Result of the iterated removal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalReport {
    pub removed: usize,
    /// Rolls removed in each round, in order
    pub rounds: Vec<usize>,
    pub remaining: usize,
}

fn accessible_positions(grid: &Grid) -> Vec<Position> {
    grid.positions_of(Cell::Roll)
        .filter(|&pos| grid.neighbour_count(pos, Cell::Roll) < ACCESS_LIMIT)
        .collect()
}

/// Number of rolls reachable right now.
pub fn accessible_rolls(grid: &Grid) -> usize {
    accessible_positions(grid).len()
}

/// Total rolls removed by repeatedly clearing every accessible roll.
pub fn removable_rolls(grid: &Grid) -> usize {
    simulate_removal(grid).removed
}

/// Run removal rounds on a private copy of `grid`.
///
/// Every accessible roll in a round is removed at once; accessibility for
/// the next round is evaluated on the updated grid.
pub fn simulate_removal(grid: &Grid) -> RemovalReport {
    let mut grid = grid.clone();
    let mut report = RemovalReport::default();

    loop {
        let round = accessible_positions(&grid);
        if round.is_empty() {
            break;
        }
        for &pos in &round {
            grid.set(pos, Cell::Empty);
        }
        report.removed += round.len();
        report.rounds.push(round.len());
    }

    report.remaining = grid.count(Cell::Roll);
    report
}
