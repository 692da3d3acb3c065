//! Machine descriptions: indicator lights, buttons and joltage counters.
//!
//! One machine per line:
//!
//! ```text
//! [.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
//! ```
//!
//! The bracketed pattern is the target light state, each parenthesised
//! group lists the indices one button toggles, and the braces hold the
//! joltage targets.

use serde::{Deserialize, Serialize};

use crate::error::{parse_number, ParseError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Target light state, `#` = on
    pub lights: Vec<bool>,
    /// Indices affected by each button
    pub buttons: Vec<Vec<usize>>,
    /// Joltage counter targets (may be empty)
    pub joltage: Vec<u64>,
}

/// Text between `open` and the next `close`, and the remainder after it.
fn delimited(text: &str, open: char, close: char) -> Option<(&str, &str)> {
    let start = text.find(open)?;
    let rest = &text[start + open.len_utf8()..];
    let end = rest.find(close)?;
    Some((&rest[..end], &rest[end + close.len_utf8()..]))
}

fn parse_list<T: std::str::FromStr>(line_no: usize, list: &str) -> Result<Vec<T>, ParseError> {
    list.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| parse_number(line_no, item))
        .collect()
}

impl Machine {
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self, ParseError> {
        let (pattern, mut rest) = delimited(line, '[', ']')
            .ok_or_else(|| ParseError::malformed(line_no, "missing [light pattern]"))?;

        let lights = pattern
            .chars()
            .map(|symbol| match symbol {
                '#' => Ok(true),
                '.' => Ok(false),
                _ => Err(ParseError::UnknownSymbol {
                    line: line_no,
                    symbol,
                }),
            })
            .collect::<Result<Vec<bool>, _>>()?;

        let joltage = match delimited(rest, '{', '}') {
            Some((list, _)) => {
                let values = parse_list(line_no, list)?;
                rest = &rest[..rest.find('{').unwrap_or(rest.len())];
                values
            }
            None => Vec::new(),
        };

        let mut buttons = Vec::new();
        while let Some((list, tail)) = delimited(rest, '(', ')') {
            buttons.push(parse_list(line_no, list)?);
            rest = tail;
        }

        Ok(Self {
            lights,
            buttons,
            joltage,
        })
    }

    /// Parse one machine per non-blank line.
    pub fn parse_all(input: &str) -> Result<Vec<Self>, ParseError> {
        let machines: Vec<Self> = input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| Self::parse_line(line, idx + 1))
            .collect::<Result<_, _>>()?;
        if machines.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(machines)
    }
}
