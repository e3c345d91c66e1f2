// SPDX-License-Identifier: Apache-2.0

//! Truth tables annotated with energy levels.
//!
//! The textual format is one row per line, whitespace separated Boolean
//! tokens, an optional trailing energy token (`!3` by default) and comments
//! introduced by `#`:
//!
//! ```text
//! # a b | a AND b
//! 0 0 0
//! 0 1 0
//! 1 0 0
//! 1 1 1   !0
//! ```
//!
//! Rows that do not appear are forbidden. Raw energies are compacted to dense
//! levels `0..K` preserving their order, so `!0`, `!5`, `!9` become levels 0, 1
//! and 2.

use std::collections::{BTreeMap, BTreeSet};

pub type Row = Vec<bool>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line (or row) number the error was found on.
    pub line: usize,
    pub msg: String,
}

impl ParseError {
    fn new(line: usize, msg: String) -> Self {
        Self { line, msg }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParseError: line {}: {}", self.line, self.msg)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub comment_marker: char,
    pub energy_marker: char,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            comment_marker: '#',
            energy_marker: '!',
        }
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "0" | "-1" | "f" | "false" => Some(false),
        "1" | "+1" | "t" | "true" => Some(true),
        _ => None,
    }
}

fn parse_energy(text: &str, line: usize) -> Result<u64, ParseError> {
    if let Ok(value) = text.parse::<i64>() {
        if value < 0 {
            return Err(ParseError::new(
                line,
                format!("energy level must be non-negative; got {}", value),
            ));
        }
    }
    text.parse::<u64>()
        .map_err(|_| ParseError::new(line, format!("malformed energy level '{}'", text)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    ncols: usize,
    levels: BTreeMap<Row, usize>,
    /// Distinct raw energies in ascending order; level `i` came from
    /// `raw_energies[i]`.
    raw_energies: Vec<u64>,
}

impl TruthTable {
    /// Builds a table from `(row, raw_energy)` pairs. A row given more than
    /// once keeps its last energy.
    pub fn from_rows<I>(rows: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = (Row, u64)>,
    {
        let mut ncols: Option<usize> = None;
        let mut raw: BTreeMap<Row, u64> = BTreeMap::new();
        for (i, (row, energy)) in rows.into_iter().enumerate() {
            Self::insert_row(&mut ncols, &mut raw, row, energy, i + 1)?;
        }
        Ok(Self::compact(ncols.unwrap_or(0), raw))
    }

    pub fn parse_lines<I, S>(lines: I, options: &ParseOptions) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ncols: Option<usize> = None;
        let mut raw: BTreeMap<Row, u64> = BTreeMap::new();
        for (i, line) in lines.into_iter().enumerate() {
            let lineno = i + 1;
            let line = line.as_ref();
            let content = match line.find(options.comment_marker) {
                Some(pos) => &line[..pos],
                None => line,
            };
            let mut tokens: Vec<&str> = content.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            let mut energy = 0;
            if let Some(text) = tokens
                .last()
                .and_then(|last| last.strip_prefix(options.energy_marker))
            {
                energy = parse_energy(text, lineno)?;
                tokens.pop();
            }
            let row = tokens
                .iter()
                .map(|token| {
                    parse_bool(token).ok_or_else(|| {
                        ParseError::new(lineno, format!("unrecognized Boolean token '{}'", token))
                    })
                })
                .collect::<Result<Row, ParseError>>()?;
            Self::insert_row(&mut ncols, &mut raw, row, energy, lineno)?;
        }
        let table = Self::compact(ncols.unwrap_or(0), raw);
        log::debug!(
            "parsed truth table: {} rows, {} columns, {} energy levels",
            table.levels.len(),
            table.ncols,
            table.num_levels()
        );
        Ok(table)
    }

    pub fn parse_str(text: &str, options: &ParseOptions) -> Result<Self, ParseError> {
        Self::parse_lines(text.lines(), options)
    }

    fn insert_row(
        ncols: &mut Option<usize>,
        raw: &mut BTreeMap<Row, u64>,
        row: Row,
        energy: u64,
        lineno: usize,
    ) -> Result<(), ParseError> {
        if row.is_empty() {
            return Err(ParseError::new(lineno, "row has no columns".to_string()));
        }
        match *ncols {
            None => *ncols = Some(row.len()),
            Some(n) if n != row.len() => {
                return Err(ParseError::new(
                    lineno,
                    format!("expected {} columns but found {}", n, row.len()),
                ));
            }
            Some(_) => {}
        }
        if let Some(previous) = raw.insert(row, energy) {
            log::warn!(
                "line {}: row repeated; energy {} replaces {}",
                lineno,
                energy,
                previous
            );
        }
        Ok(())
    }

    fn compact(ncols: usize, raw: BTreeMap<Row, u64>) -> Self {
        let raw_energies: Vec<u64> = raw
            .values()
            .copied()
            .collect::<BTreeSet<u64>>()
            .into_iter()
            .collect();
        let levels = raw
            .into_iter()
            .map(|(row, energy)| {
                let level = raw_energies
                    .binary_search(&energy)
                    .expect("energy was collected from these rows");
                (row, level)
            })
            .collect();
        Self {
            ncols,
            levels,
            raw_energies,
        }
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Level of `row`, or `None` if the row is forbidden.
    pub fn level(&self, row: &[bool]) -> Option<usize> {
        self.levels.get(row).copied()
    }

    /// Number of distinct levels; zero for an empty table.
    pub fn num_levels(&self) -> usize {
        self.raw_energies.len()
    }

    /// Highest compacted level; an empty table reports 0.
    pub fn max_level(&self) -> usize {
        self.num_levels().saturating_sub(1)
    }

    /// The raw input energy that was compacted to `level`.
    pub fn raw_energy(&self, level: usize) -> Option<u64> {
        self.raw_energies.get(level).copied()
    }

    /// Valid rows in ascending order with their levels.
    pub fn rows(&self) -> impl Iterator<Item = (&Row, usize)> {
        self.levels.iter().map(|(row, level)| (row, *level))
    }
}
