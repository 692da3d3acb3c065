//! Error types for puzzle input parsing and solver capacity limits.

use thiserror::Error;

/// Errors that can occur while turning puzzle text into solver inputs.
///
/// Line numbers are 1-based and refer to the raw input text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input had no usable content.
    #[error("input is empty")]
    Empty,

    /// A grid row does not match the width of the first row.
    #[error("line {line}: row has width {found}, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A character outside the accepted alphabet.
    #[error("line {line}: unexpected symbol {symbol:?}")]
    UnknownSymbol { line: usize, symbol: char },

    /// A numeric field failed to parse.
    #[error("line {line}: invalid number {text:?}")]
    InvalidNumber { line: usize, text: String },

    /// A line did not have the expected structure.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// The grid has no start cell.
    #[error("grid has no start cell 'S'")]
    MissingStart,

    /// A region demands a shape that was never defined.
    #[error("line {line}: region demands unknown shape {shape}")]
    UnknownShape { line: usize, shape: usize },
}

impl ParseError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ParseError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// Parse an unsigned decimal field, attributing failures to `line`.
pub(crate) fn parse_number<T: std::str::FromStr>(line: usize, text: &str) -> Result<T, ParseError> {
    text.trim().parse().map_err(|_| ParseError::InvalidNumber {
        line,
        text: text.trim().to_string(),
    })
}

/// Errors raised when a well-formed input exceeds what a solver can search.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// Exhaustive free-variable enumeration would be too large.
    #[error("{free} free variables exceed the enumeration limit of {limit}")]
    TooManyFreeVariables { free: usize, limit: usize },

    /// A button refers to a light or counter outside the target.
    #[error("button {button} toggles index {index}, but the target has length {len}")]
    IndexOutOfRange {
        button: usize,
        index: usize,
        len: usize,
    },

    /// Consecutive loop tiles must share a row or a column.
    #[error("tiles {from} and {to} are not in the same row or column")]
    DiagonalEdge { from: usize, to: usize },
}

/// Errors raised by the path counter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The required-node bitmask only has room for 64 nodes.
    #[error("{0} required nodes exceed the limit of 64")]
    TooManyRequired(usize),

    /// The number of paths does not fit in a `u64`.
    #[error("path count overflows a 64-bit counter")]
    Overflow,
}
