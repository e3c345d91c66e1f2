// SPDX-License-Identifier: Apache-2.0

//! Backend-neutral view of the constraint solver used by the ancilla search.
//!
//! The search only ever needs integer variables, linear combinations of them
//! with constant factors, the three comparisons `<`, `==`, `>` and an
//! "exactly k of these predicates hold" cardinality constraint. Any backend
//! that can express those (a bit-blasting SAT solver, an SMT solver speaking
//! linear integer arithmetic, ...) can be dropped in.

use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Sat,
    Unsat,
    Unknown,
}

/// A linear combination `constant + sum(factor * term)` kept as plain data
/// until a backend lowers it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearExpr<T> {
    pub terms: Vec<(i64, T)>,
    pub constant: i64,
}

impl<T> Default for LinearExpr<T> {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            constant: 0,
        }
    }
}

impl<T> LinearExpr<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_constant(constant: i64) -> Self {
        Self {
            terms: Vec::new(),
            constant,
        }
    }

    pub fn add_term(&mut self, factor: i64, term: T) {
        if factor != 0 {
            self.terms.push((factor, term));
        }
    }

    pub fn add_constant(&mut self, value: i64) {
        self.constant += value;
    }
}

pub trait Solver: Sized {
    /// An integer-valued term.
    type Term: Clone;
    /// A Boolean-valued predicate over terms.
    type Pred: Clone;
    type Config;

    fn new(config: &Self::Config) -> io::Result<Self>;
    fn declare_int(&mut self, name: &str) -> io::Result<Self::Term>;
    fn constant(&mut self, value: i64) -> Self::Term;
    fn linear(&mut self, expr: &LinearExpr<Self::Term>) -> Self::Term;
    fn eq(&mut self, lhs: &Self::Term, rhs: &Self::Term) -> Self::Pred;
    fn lt(&mut self, lhs: &Self::Term, rhs: &Self::Term) -> Self::Pred;
    fn gt(&mut self, lhs: &Self::Term, rhs: &Self::Term) -> Self::Pred {
        self.lt(rhs, lhs)
    }
    /// Holds iff exactly `k` of `preds` hold.
    fn exactly(&mut self, k: usize, preds: &[Self::Pred]) -> Self::Pred;
    fn assert(&mut self, pred: &Self::Pred) -> io::Result<()>;
    fn check(&mut self) -> io::Result<Response>;
    /// Only meaningful after `check` returned `Sat`.
    fn get_value(&mut self, term: &Self::Term) -> io::Result<i64>;
}


#[cfg(test)]
#[macro_export]
macro_rules! test_solver {
    ($mod_ident:ident, $solver:expr) => {
        #[cfg(test)]
        mod $mod_ident {
            use crate::solver::solver_interface::test_utils;
            use crate::solver::solver_interface::Solver;

            #[test]
            fn test_declare_and_read_back() {
                let mut solver = $solver;
                test_utils::test_declare_and_read_back(&mut solver);
            }

            #[test]
            fn test_negative_values() {
                let mut solver = $solver;
                test_utils::test_negative_values(&mut solver);
            }

            #[test]
            fn test_linear_combination() {
                let mut solver = $solver;
                test_utils::test_linear_combination(&mut solver);
            }

            #[test]
            fn test_strict_order() {
                let mut solver = $solver;
                test_utils::test_strict_order(&mut solver);
            }

            #[test]
            fn test_contradiction_is_unsat() {
                let mut solver = $solver;
                test_utils::test_contradiction_is_unsat(&mut solver);
            }

            #[test]
            fn test_exactly_one() {
                let mut solver = $solver;
                test_utils::test_exactly_one(&mut solver);
            }

            #[test]
            fn test_exactly_k_counts() {
                let mut solver = $solver;
                test_utils::test_exactly_k_counts(&mut solver);
            }

            #[test]
            fn test_exactly_too_many_is_unsat() {
                let mut solver = $solver;
                test_utils::test_exactly_too_many_is_unsat(&mut solver);
            }
        }
    };
}
