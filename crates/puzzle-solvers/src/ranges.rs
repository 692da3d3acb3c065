//! Fresh ingredient ID ranges.
//!
//! The database lists inclusive `lo-hi` ranges, a blank line, then one
//! available ingredient ID per line. An ID is fresh if any range holds it.

use serde::{Deserialize, Serialize};

use crate::error::{parse_number, ParseError};

/// Inclusive ID range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdRange {
    pub start: u64,
    pub end: u64,
}

impl IdRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of IDs in the range
    pub fn size(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn contains(&self, id: u64) -> bool {
        self.start <= id && id <= self.end
    }
}

/// Disjoint, sorted, non-adjacent ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSet {
    ranges: Vec<IdRange>,
}

impl RangeSet {
    /// Merge overlapping and touching ranges.
    pub fn new(ranges: impl IntoIterator<Item = IdRange>) -> Self {
        let mut sorted: Vec<IdRange> = ranges.into_iter().collect();
        sorted.sort_unstable();
        let mut merged: Vec<IdRange> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(last) if range.start <= last.end.saturating_add(1) => {
                    last.end = last.end.max(range.end);
                }
                _ => merged.push(range),
            }
        }
        Self { ranges: merged }
    }

    pub fn ranges(&self) -> &[IdRange] {
        &self.ranges
    }

    pub fn contains(&self, id: u64) -> bool {
        let idx = self.ranges.partition_point(|r| r.end < id);
        self.ranges.get(idx).is_some_and(|r| r.contains(id))
    }

    /// Number of distinct IDs covered.
    pub fn covered(&self) -> u64 {
        self.ranges.iter().map(IdRange::size).sum()
    }
}

/// A parsed database: fresh ranges and the IDs on hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    pub fresh: RangeSet,
    pub available: Vec<u64>,
}

impl Inventory {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut ranges = Vec::new();
        let mut available = Vec::new();
        let mut in_ids = false;

        for (idx, line) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() {
                in_ids |= !ranges.is_empty();
                continue;
            }
            if in_ids {
                available.push(parse_number(line_no, line)?);
                continue;
            }
            let (start, end) = line
                .split_once('-')
                .ok_or_else(|| ParseError::malformed(line_no, "expected `lo-hi` range"))?;
            let (start, end) = (parse_number(line_no, start)?, parse_number(line_no, end)?);
            if start > end {
                return Err(ParseError::malformed(line_no, "range ends before it starts"));
            }
            ranges.push(IdRange::new(start, end));
        }

        if ranges.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self {
            fresh: RangeSet::new(ranges),
            available,
        })
    }

    /// Available IDs that fall in some fresh range.
    pub fn count_fresh(&self) -> usize {
        self.available.iter().filter(|&&id| self.fresh.contains(id)).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreshReport {
    pub available: usize,
    pub fresh_available: usize,
    pub fresh_ids: u64,
    pub merged_ranges: Vec<IdRange>,
}

pub fn analyze(inventory: &Inventory) -> FreshReport {
    FreshReport {
        available: inventory.available.len(),
        fresh_available: inventory.count_fresh(),
        fresh_ids: inventory.fresh.covered(),
        merged_ranges: inventory.fresh.ranges().to_vec(),
    }
}
