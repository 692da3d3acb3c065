//! Minimum-weight solutions of boolean linear systems (XOR algebra).
//!
//! Each button toggles a fixed set of lights. Pressing a button twice is a
//! no-op, so a solution is a subset of buttons whose XOR-sum equals the
//! target light pattern. Elimination over GF(2) isolates the free buttons;
//! every assignment of the free buttons is then tried and the one with the
//! fewest presses kept.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::SolveError;

/// Largest free-variable count enumerated exhaustively (2^24 assignments).
pub const MAX_FREE_VARIABLES: usize = 24;

/// Outcome of a light-target search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LightSolution {
    /// `pressed` lists button indices in ascending order
    Solved { presses: usize, pressed: Vec<usize> },
    /// No combination of buttons reaches the target
    Infeasible,
}

impl LightSolution {
    pub fn presses(&self) -> Option<usize> {
        match self {
            LightSolution::Solved { presses, .. } => Some(*presses),
            LightSolution::Infeasible => None,
        }
    }
}

/// One row of the augmented matrix, one bit per column.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BitRow {
    words: SmallVec<[u64; 1]>,
}

impl BitRow {
    fn new(columns: usize) -> Self {
        Self {
            words: SmallVec::from_elem(0, columns.div_ceil(64)),
        }
    }

    fn get(&self, col: usize) -> bool {
        self.words[col / 64] & (1 << (col % 64)) != 0
    }

    fn toggle(&mut self, col: usize) {
        self.words[col / 64] ^= 1 << (col % 64);
    }

    fn xor_with(&mut self, other: &BitRow) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a ^= b;
        }
    }
}

/// Reduced form of a system: pivot column per leading row, plus the rows.
struct Reduced {
    rows: Vec<BitRow>,
    pivots: Vec<usize>,
}

fn check_indices(len: usize, buttons: &[Vec<usize>]) -> Result<(), SolveError> {
    for (button, indices) in buttons.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(SolveError::IndexOutOfRange { button, index, len });
        }
    }
    Ok(())
}

/// Eliminate column by column. Every pivot column ends up with a single 1.
fn eliminate(target: &[bool], buttons: &[Vec<usize>]) -> Reduced {
    let (n, m) = (target.len(), buttons.len());
    let mut rows: Vec<BitRow> = (0..n).map(|_| BitRow::new(m + 1)).collect();
    for (col, indices) in buttons.iter().enumerate() {
        for &light in indices {
            // Listing a light twice cancels out under XOR
            rows[light].toggle(col);
        }
    }
    for (light, &on) in target.iter().enumerate() {
        if on {
            rows[light].toggle(m);
        }
    }

    let mut pivots = Vec::new();
    let mut current = 0;
    for col in 0..m {
        let Some(found) = (current..n).find(|&r| rows[r].get(col)) else {
            continue;
        };
        rows.swap(current, found);
        let pivot_row = rows[current].clone();
        for (r, row) in rows.iter_mut().enumerate() {
            if r != current && row.get(col) {
                row.xor_with(&pivot_row);
            }
        }
        pivots.push(col);
        current += 1;
    }

    Reduced { rows, pivots }
}

/// Fewest button presses whose XOR-sum equals `target`.
pub fn min_presses(target: &[bool], buttons: &[Vec<usize>]) -> Result<LightSolution, SolveError> {
    check_indices(target.len(), buttons)?;
    let m = buttons.len();
    let Reduced { rows, pivots } = eliminate(target, buttons);

    // A zero row that still demands a 1 cannot be satisfied
    if rows[pivots.len()..].iter().any(|row| row.get(m)) {
        return Ok(LightSolution::Infeasible);
    }

    let free: Vec<usize> = (0..m).filter(|col| !pivots.contains(col)).collect();
    if free.len() > MAX_FREE_VARIABLES {
        return Err(SolveError::TooManyFreeVariables {
            free: free.len(),
            limit: MAX_FREE_VARIABLES,
        });
    }

    let mut best: Option<Vec<bool>> = None;
    let mut best_presses = usize::MAX;
    for mask in 0u32..(1 << free.len()) {
        let mut pressed = vec![false; m];
        for (bit, &col) in free.iter().enumerate() {
            pressed[col] = mask & (1 << bit) != 0;
        }
        // Pivot rows only mention their own pivot and free columns
        for (row, &col) in pivots.iter().enumerate() {
            let mut value = rows[row].get(m);
            for &f in &free {
                value ^= rows[row].get(f) & pressed[f];
            }
            pressed[col] = value;
        }

        let presses = pressed.iter().filter(|&&p| p).count();
        if presses < best_presses {
            best_presses = presses;
            best = Some(pressed);
        }
    }

    Ok(match best {
        Some(pressed) => LightSolution::Solved {
            presses: best_presses,
            pressed: (0..m).filter(|&b| pressed[b]).collect(),
        },
        None => LightSolution::Infeasible,
    })
}

/// Light state produced by pressing each button in `pressed` once,
/// starting from all lights off.
pub fn apply_presses(len: usize, buttons: &[Vec<usize>], pressed: &[usize]) -> Vec<bool> {
    let mut lights = vec![false; len];
    for &button in pressed {
        for &light in &buttons[button] {
            lights[light] ^= true;
        }
    }
    lights
}
