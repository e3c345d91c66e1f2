// SPDX-License-Identifier: Apache-2.0

//! Ancilla-escalating search for QUBO coefficients.
//!
//! For a fixed number of ancillae `na` we ask the solver for integer
//! coefficients over `tnc = ncols + na` variables and one integer per energy
//! level `k_0 < k_1 < ... < k_max` such that, over every input pattern:
//!
//! * a valid pattern at level `L` has exactly one ancilla assignment whose
//!   energy is `k_L` and all `2^na - 1` others strictly above `k_max`;
//! * a forbidden pattern has every ancilla assignment strictly above
//!   `k_max`.
//!
//! The constraint count is `Θ(2^(ncols + na))`, which is why `na` starts at
//! the lower bound and only grows after the solver proves the current count
//! infeasible.

use std::io;

use crate::energy::{bits_of, MAX_VARIABLES};
use crate::solution::{Basis, Solution};
use crate::solver::solver_interface::{LinearExpr, Response, Solver};
use crate::truth_table::TruthTable;

#[derive(Debug)]
pub enum EmbedError {
    /// No ancilla count in `[min_ancillae, max_ancillae)` produced a model.
    /// This is not a proof that the table is infeasible with more ancillae,
    /// nor, for a backend with bounded integers such as varisat, that wider
    /// coefficients would not succeed at the same count.
    SearchExhausted {
        min_ancillae: usize,
        max_ancillae: usize,
    },
    /// `ncols + num_ancillae` exceeds what the row enumeration can index.
    TooManyVariables { num_vars: usize, limit: usize },
    Solver(io::Error),
}

impl std::fmt::Display for EmbedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbedError::SearchExhausted {
                min_ancillae,
                max_ancillae,
            } => write!(
                f,
                "no solution found for ancilla counts in [{}, {})",
                min_ancillae, max_ancillae
            ),
            EmbedError::TooManyVariables { num_vars, limit } => write!(
                f,
                "{} variables cannot be enumerated; at most {} are supported",
                num_vars, limit
            ),
            EmbedError::Solver(e) => write!(f, "solver error: {}", e),
        }
    }
}

impl std::error::Error for EmbedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmbedError::Solver(e) => Some(e),
            EmbedError::SearchExhausted { .. } | EmbedError::TooManyVariables { .. } => None,
        }
    }
}

impl From<io::Error> for EmbedError {
    fn from(e: io::Error) -> Self {
        EmbedError::Solver(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    /// Ancilla count of the first attempt.
    pub min_ancillae: usize,
    /// Exclusive upper bound on the ancilla count; defaults to the table's
    /// column count.
    pub max_ancillae: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub num_ancillae: usize,
    /// QUBO-basis coefficients over `ncols + num_ancillae` variables.
    pub solution: Solution<i64>,
}

struct CoefficientVars<T> {
    linear: Vec<T>,
    quadratic: Vec<(usize, usize, T)>,
}

impl<T: Clone> CoefficientVars<T> {
    fn declare<S: Solver<Term = T>>(solver: &mut S, tnc: usize) -> io::Result<Self> {
        let mut linear = Vec::with_capacity(tnc);
        for i in 0..tnc {
            linear.push(solver.declare_int(&format!("h_{}", i))?);
        }
        let mut quadratic = Vec::new();
        for i in 0..tnc {
            for j in (i + 1)..tnc {
                quadratic.push((i, j, solver.declare_int(&format!("J_{}_{}", i, j))?));
            }
        }
        Ok(Self { linear, quadratic })
    }

    /// The energy of the concrete assignment `bits`: only coefficients whose
    /// variables are all set survive the substitution.
    fn energy_expr(&self, bits: &[bool]) -> LinearExpr<T> {
        let mut expr = LinearExpr::new();
        for (i, var) in self.linear.iter().enumerate() {
            if bits[i] {
                expr.add_term(1, var.clone());
            }
        }
        for (i, j, var) in &self.quadratic {
            if bits[*i] && bits[*j] {
                expr.add_term(1, var.clone());
            }
        }
        expr
    }
}

fn check_variable_count(num_vars: usize) -> Result<(), EmbedError> {
    if num_vars > MAX_VARIABLES {
        return Err(EmbedError::TooManyVariables {
            num_vars,
            limit: MAX_VARIABLES,
        });
    }
    Ok(())
}

/// Looks for coefficients embedding `tt` with exactly `num_ancillae`
/// ancillae.
///
/// Returns `Ok(None)` when the solver proves there is no such embedding. A
/// fresh solver is created from `config` for every call.
pub fn ancilla_search<S: Solver>(
    tt: &TruthTable,
    num_ancillae: usize,
    config: &S::Config,
) -> Result<Option<Solution<i64>>, EmbedError> {
    let ncols = tt.ncols();
    let tnc = ncols + num_ancillae;
    check_variable_count(tnc)?;
    let extensions = 1usize << num_ancillae;
    let mut solver = S::new(config)?;

    let coeffs = CoefficientVars::declare(&mut solver, tnc)?;

    // An empty table still gets a threshold so forbidden rows have something
    // to exceed.
    let mut levels = Vec::with_capacity(tt.num_levels().max(1));
    for level in 0..tt.num_levels().max(1) {
        levels.push(solver.declare_int(&format!("k_{}", level))?);
    }
    for pair in levels.windows(2) {
        let ascending = solver.lt(&pair[0], &pair[1]);
        solver.assert(&ascending)?;
    }
    let k_max = levels[levels.len() - 1].clone();

    for base in 0..(1usize << ncols) {
        let inputs = bits_of(base, ncols);
        let level = tt.level(&inputs);
        let mut reaches_level = Vec::with_capacity(extensions);
        let mut excited = Vec::with_capacity(extensions);
        for ancilla in 0..extensions {
            let bits = bits_of((base << num_ancillae) | ancilla, tnc);
            let expr = coeffs.energy_expr(&bits);
            let energy = solver.linear(&expr);
            let above = solver.gt(&energy, &k_max);
            match level {
                Some(l) => {
                    reaches_level.push(solver.eq(&energy, &levels[l]));
                    excited.push(above);
                }
                None => solver.assert(&above)?,
            }
        }
        if level.is_some() {
            let one_at_level = solver.exactly(1, &reaches_level);
            solver.assert(&one_at_level)?;
            let rest_excited = solver.exactly(extensions - 1, &excited);
            solver.assert(&rest_excited)?;
        }
    }

    match solver.check()? {
        Response::Unsat => {
            log::debug!(
                "no solution with {} ancillae within the backend's coefficient range",
                num_ancillae
            );
            Ok(None)
        }
        Response::Unknown => Err(EmbedError::Solver(io::Error::new(
            io::ErrorKind::Other,
            format!(
                "solver could not decide the system with {} ancillae",
                num_ancillae
            ),
        ))),
        Response::Sat => {
            let mut solution = Solution::zeros(Basis::Qubo, tnc);
            for (i, var) in coeffs.linear.iter().enumerate() {
                solution.set_linear(i, solver.get_value(var)?);
            }
            for (i, j, var) in &coeffs.quadratic {
                solution.set_quadratic(*i, *j, solver.get_value(var)?);
            }
            Ok(Some(solution))
        }
    }
}

/// Runs `ancilla_search` for increasing ancilla counts and returns the first
/// embedding found.
pub fn escalate<S: Solver>(
    tt: &TruthTable,
    options: &SearchOptions,
    config: &S::Config,
) -> Result<Embedding, EmbedError> {
    let max_ancillae = options.max_ancillae.unwrap_or(tt.ncols());
    if options.min_ancillae < max_ancillae {
        check_variable_count(tt.ncols() + max_ancillae - 1)?;
    }
    for num_ancillae in options.min_ancillae..max_ancillae {
        if num_ancillae > options.min_ancillae {
            log::info!(
                "Increasing the number of ancillae to {} ({} rows)",
                num_ancillae,
                1u128 << (tt.ncols() + num_ancillae + 1)
            );
        }
        if let Some(solution) = ancilla_search::<S>(tt, num_ancillae, config)? {
            return Ok(Embedding {
                num_ancillae,
                solution,
            });
        }
    }
    Err(EmbedError::SearchExhausted {
        min_ancillae: options.min_ancillae,
        max_ancillae,
    })
}
