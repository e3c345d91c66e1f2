// SPDX-License-Identifier: Apache-2.0

//! Independent check that a QUBO solution realizes a truth table.
//!
//! This re-derives the property the search constrains, using only exhaustive
//! evaluation, so a backend bug (or a hand-edited solution) cannot slip past.

use crate::energy::{energies, index_of, MAX_VARIABLES};
use crate::rank::rank_energies;
use crate::solution::{Basis, Solution};
use crate::truth_table::{Row, TruthTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    NotQubo,
    WrongVariableCount {
        expected: usize,
        actual: usize,
    },
    TooManyVariables {
        num_vars: usize,
    },
    /// A valid row's lowest extension does not sit at its assigned rank.
    ValidRowMisranked {
        row: Row,
        level: usize,
        lowest_rank: usize,
    },
    /// More than one ancilla extension of a valid row sits at its level.
    ValidRowDegenerate {
        row: Row,
        level: usize,
        count: usize,
    },
    /// A non-ground extension of a valid row is not above the highest valid
    /// rank.
    ValidRowExtensionUnexcited {
        row: Row,
        ancillae: Row,
        rank: usize,
    },
    /// A forbidden row has an extension at or below the highest valid rank.
    ForbiddenRowReachable {
        row: Row,
        rank: usize,
    },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits = |row: &Row| -> String {
            row.iter().map(|b| if *b { '1' } else { '0' }).collect()
        };
        match self {
            Violation::NotQubo => write!(f, "solution is not in the QUBO basis"),
            Violation::WrongVariableCount { expected, actual } => write!(
                f,
                "solution has {} variables; expected {}",
                actual, expected
            ),
            Violation::TooManyVariables { num_vars } => write!(
                f,
                "{} variables cannot be enumerated; at most {} are supported",
                num_vars, MAX_VARIABLES
            ),
            Violation::ValidRowDegenerate { row, level, count } => write!(
                f,
                "valid row {} has {} ancilla extensions at rank {}; expected exactly one",
                bits(row),
                count,
                level
            ),
            Violation::ValidRowExtensionUnexcited {
                row,
                ancillae,
                rank,
            } => write!(
                f,
                "valid row {} with ancillae {} sits at rank {}, not above every valid level",
                bits(row),
                bits(ancillae),
                rank
            ),
            Violation::ValidRowMisranked {
                row,
                level,
                lowest_rank,
            } => write!(
                f,
                "valid row {} should reach rank {} but its lowest rank is {}",
                bits(row),
                level,
                lowest_rank
            ),
            Violation::ForbiddenRowReachable { row, rank } => write!(
                f,
                "forbidden row {} reaches rank {}",
                bits(row),
                rank
            ),
        }
    }
}

impl std::error::Error for Violation {}

/// Checks that every valid row of `tt` has exactly one ancilla extension at
/// its level's rank with all other extensions above the highest valid rank,
/// and that every forbidden row stays above the highest valid rank.
pub fn verify(
    tt: &TruthTable,
    solution: &Solution<i64>,
    num_ancillae: usize,
) -> Result<(), Violation> {
    if solution.basis != Basis::Qubo {
        return Err(Violation::NotQubo);
    }
    let tnc = tt.ncols() + num_ancillae;
    if solution.num_vars != tnc {
        return Err(Violation::WrongVariableCount {
            expected: tnc,
            actual: solution.num_vars,
        });
    }
    if tnc > MAX_VARIABLES {
        return Err(Violation::TooManyVariables { num_vars: tnc });
    }
    let ranking = rank_energies(&energies(tnc, solution, [0, 1]), tt.ncols(), num_ancillae);
    let extensions = 1usize << num_ancillae;
    for chunk in ranking.rows.chunks(extensions) {
        let row = &chunk[0].inputs;
        debug_assert_eq!(index_of(row), chunk[0].index >> num_ancillae);
        let lowest_rank = chunk
            .iter()
            .map(|r| r.rank)
            .min()
            .expect("every row has at least one extension");
        match tt.level(row) {
            Some(level) if lowest_rank != level => {
                return Err(Violation::ValidRowMisranked {
                    row: row.clone(),
                    level,
                    lowest_rank,
                });
            }
            Some(level) => {
                let at_level = chunk.iter().filter(|r| r.rank == level).count();
                if at_level != 1 {
                    return Err(Violation::ValidRowDegenerate {
                        row: row.clone(),
                        level,
                        count: at_level,
                    });
                }
                if let Some(unexcited) = chunk
                    .iter()
                    .find(|r| r.rank != level && r.rank <= tt.max_level())
                {
                    return Err(Violation::ValidRowExtensionUnexcited {
                        row: row.clone(),
                        ancillae: unexcited.ancillae.clone(),
                        rank: unexcited.rank,
                    });
                }
            }
            None if !tt.is_empty() && lowest_rank <= tt.max_level() => {
                return Err(Violation::ForbiddenRowReachable {
                    row: row.clone(),
                    rank: lowest_rank,
                });
            }
            None => {}
        }
    }
    Ok(())
}
