//! Minimum non-negative integer presses reaching joltage counter targets.
//!
//! Each press of a button adds one to every counter it lists, so the
//! problem is `A x = b` with `x >= 0` integral and `sum(x)` minimal.
//! Fraction-free integer elimination brings `A` to reduced row echelon
//! form; the free buttons are then enumerated within their natural bounds
//! (a button can never be pressed more often than the smallest target
//! among its counters) and the pivot buttons follow by exact division.

use crate::error::SolveError;

/// Free buttons enumerated at most; each ranges over its press bound.
pub const MAX_FREE_BUTTONS: usize = 8;

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Divide a row by the gcd of its entries.
fn normalize(row: &mut [i64]) {
    let divisor = row.iter().fold(0, |acc, &v| gcd(acc, v));
    if divisor > 1 {
        for v in row.iter_mut() {
            *v /= divisor;
        }
    }
}

struct System {
    /// Rows `[a_0 .. a_{m-1} | b]`, pivot rows first
    rows: Vec<Vec<i64>>,
    pivots: Vec<usize>,
    free: Vec<usize>,
    bounds: Vec<i64>,
}

impl System {
    fn build(targets: &[u64], buttons: &[Vec<usize>]) -> Option<Self> {
        let (n, m) = (targets.len(), buttons.len());
        let mut rows = vec![vec![0i64; m + 1]; n];
        for (col, counters) in buttons.iter().enumerate() {
            for &counter in counters {
                rows[counter][col] += 1;
            }
        }
        for (counter, &target) in targets.iter().enumerate() {
            rows[counter][m] = target as i64;
        }

        let mut pivots = Vec::new();
        let mut current = 0;
        for col in 0..m {
            let Some(found) = (current..n).find(|&r| rows[r][col] != 0) else {
                continue;
            };
            rows.swap(current, found);
            let pivot_row = rows[current].clone();
            let p = pivot_row[col];
            for (r, row) in rows.iter_mut().enumerate() {
                let f = row[col];
                if r == current || f == 0 {
                    continue;
                }
                for (v, &pv) in row.iter_mut().zip(&pivot_row) {
                    *v = *v * p - pv * f;
                }
                normalize(row);
            }
            pivots.push(col);
            current += 1;
        }

        // Leftover rows are all-zero on the left; a non-zero target is unreachable
        if rows[current..].iter().any(|row| row[m] != 0) {
            return None;
        }

        let free = (0..m).filter(|col| !pivots.contains(col)).collect();
        let bounds = buttons
            .iter()
            .map(|counters| {
                counters
                    .iter()
                    .map(|&c| targets[c] as i64)
                    .min()
                    .unwrap_or(0)
            })
            .collect();

        Some(Self {
            rows,
            pivots,
            free,
            bounds,
        })
    }

    /// Total presses for a full free assignment, or `None` if some pivot
    /// button would need a fractional, negative or oversized count.
    fn complete(&self, presses: &[i64]) -> Option<i64> {
        let m = presses.len();
        let mut total: i64 = self.free.iter().map(|&f| presses[f]).sum();
        for (row, &col) in self.pivots.iter().enumerate() {
            let coefficients = &self.rows[row];
            let rhs = coefficients[m]
                - self
                    .free
                    .iter()
                    .map(|&f| coefficients[f] * presses[f])
                    .sum::<i64>();
            let p = coefficients[col];
            if rhs % p != 0 {
                return None;
            }
            let value = rhs / p;
            if value < 0 || value > self.bounds[col] {
                return None;
            }
            total += value;
        }
        Some(total)
    }

    fn search(&self, depth: usize, presses: &mut [i64], partial: i64, best: &mut Option<i64>) {
        if best.is_some_and(|b| partial >= b) {
            return;
        }
        if depth == self.free.len() {
            if let Some(total) = self.complete(presses) {
                if best.map_or(true, |b| total < b) {
                    *best = Some(total);
                }
            }
            return;
        }
        let col = self.free[depth];
        for value in 0..=self.bounds[col] {
            presses[col] = value;
            self.search(depth + 1, presses, partial + value, best);
        }
        presses[col] = 0;
    }
}

/// Fewest total presses that bring every counter exactly to its target,
/// or `None` if no non-negative integer combination does.
pub fn min_counter_presses(targets: &[u64], buttons: &[Vec<usize>]) -> Result<Option<u64>, SolveError> {
    for (button, counters) in buttons.iter().enumerate() {
        if let Some(&index) = counters.iter().find(|&&c| c >= targets.len()) {
            return Err(SolveError::IndexOutOfRange {
                button,
                index,
                len: targets.len(),
            });
        }
    }

    let Some(system) = System::build(targets, buttons) else {
        return Ok(None);
    };
    if system.free.len() > MAX_FREE_BUTTONS {
        return Err(SolveError::TooManyFreeVariables {
            free: system.free.len(),
            limit: MAX_FREE_BUTTONS,
        });
    }

    let mut presses = vec![0i64; buttons.len()];
    let mut best = None;
    system.search(0, &mut presses, 0, &mut best);
    Ok(best.map(|b| b as u64))
}
