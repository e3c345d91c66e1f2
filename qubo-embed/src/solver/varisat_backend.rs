// SPDX-License-Identifier: Apache-2.0

//! In-process backend that bit-blasts bounded integers into CNF for varisat.
//!
//! Every declared integer is an `int_width`-bit two's complement vector.
//! Intermediate terms track a conservative `[min, max]` range and are given
//! exactly enough bits to hold it, so additions never overflow: operands are
//! sign-extended (or truncated, which is sound modulo `2^w`) to the result
//! width and summed with a ripple-carry adder.
//!
//! Gates are encoded with Tseitin clauses. Bits whose value is known at
//! construction time are folded instead of producing clauses, which keeps the
//! formulas small since the search multiplies most coefficients by constant
//! 0/1 bits.

use std::collections::HashSet;
use std::io;

use varisat::{ExtendFormula, Lit};

use crate::solver::solver_interface::{LinearExpr, Response, Solver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bit {
    Const(bool),
    Lit(Lit),
}

impl std::ops::Not for Bit {
    type Output = Bit;

    fn not(self) -> Bit {
        match self {
            Bit::Const(value) => Bit::Const(!value),
            Bit::Lit(lit) => Bit::Lit(!lit),
        }
    }
}

/// Two's complement integer, least significant bit first.
#[derive(Debug, Clone)]
pub struct IntTerm {
    bits: Vec<Bit>,
    min: i128,
    max: i128,
}

impl IntTerm {
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn range(&self) -> (i128, i128) {
        (self.min, self.max)
    }

    fn sign_bit(&self) -> Bit {
        *self.bits.last().expect("integer terms are never zero-width")
    }

    /// Sign-extends or truncates to exactly `width` bits.
    fn resized(&self, width: usize) -> Vec<Bit> {
        let mut bits: Vec<Bit> = self.bits.iter().take(width).copied().collect();
        let sign = self.sign_bit();
        while bits.len() < width {
            bits.push(sign);
        }
        bits
    }
}

/// Smallest two's complement width that can represent every value in
/// `[min, max]`.
fn signed_width(min: i128, max: i128) -> usize {
    let mut width = 1usize;
    while min < -(1i128 << (width - 1)) || max > (1i128 << (width - 1)) - 1 {
        width += 1;
    }
    width
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarisatConfig {
    /// Bit width of every declared integer; values range over
    /// `[-2^(w-1), 2^(w-1) - 1]`.
    pub int_width: usize,
}

impl Default for VarisatConfig {
    fn default() -> Self {
        Self { int_width: 8 }
    }
}

pub struct VarisatSolver {
    sat: varisat::Solver<'static>,
    int_width: usize,
    model: Option<HashSet<Lit>>,
    trivially_unsat: bool,
    clause_count: usize,
}

impl VarisatSolver {
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }

    fn add_clause(&mut self, lits: &[Lit]) {
        self.clause_count += 1;
        self.sat.add_clause(lits);
    }

    // Tseitin clauses for: out <=> a AND b
    // (out | !a | !b) & (!out | a) & (!out | b)
    fn and(&mut self, a: Bit, b: Bit) -> Bit {
        match (a, b) {
            (Bit::Const(false), _) | (_, Bit::Const(false)) => Bit::Const(false),
            (Bit::Const(true), x) | (x, Bit::Const(true)) => x,
            (Bit::Lit(a), Bit::Lit(b)) => {
                if a == b {
                    return Bit::Lit(a);
                }
                if a == !b {
                    return Bit::Const(false);
                }
                let out = self.sat.new_lit();
                self.add_clause(&[!a, !b, out]);
                self.add_clause(&[a, !out]);
                self.add_clause(&[b, !out]);
                Bit::Lit(out)
            }
        }
    }

    fn or(&mut self, a: Bit, b: Bit) -> Bit {
        let nand = self.and(!a, !b);
        !nand
    }

    // Clauses for out = a XOR b are:
    // (!a | !b | !out) & (a | b | !out) & (a | !b | out) & (!a | b | out)
    fn xor(&mut self, a: Bit, b: Bit) -> Bit {
        match (a, b) {
            (Bit::Const(c), x) | (x, Bit::Const(c)) => {
                if c {
                    !x
                } else {
                    x
                }
            }
            (Bit::Lit(a), Bit::Lit(b)) => {
                if a == b {
                    return Bit::Const(false);
                }
                if a == !b {
                    return Bit::Const(true);
                }
                let out = self.sat.new_lit();
                self.add_clause(&[!a, !b, !out]);
                self.add_clause(&[a, b, !out]);
                self.add_clause(&[a, !b, out]);
                self.add_clause(&[!a, b, out]);
                Bit::Lit(out)
            }
        }
    }

    fn full_adder(&mut self, a: Bit, b: Bit, carry_in: Bit) -> (Bit, Bit) {
        let a_xor_b = self.xor(a, b);
        let sum = self.xor(a_xor_b, carry_in);
        let both = self.and(a, b);
        let propagated = self.and(a_xor_b, carry_in);
        let carry_out = self.or(both, propagated);
        (sum, carry_out)
    }

    fn const_term(&self, value: i128) -> IntTerm {
        let width = signed_width(value, value);
        let bits = (0..width)
            .map(|i| Bit::Const((value >> i) & 1 == 1))
            .collect();
        IntTerm {
            bits,
            min: value,
            max: value,
        }
    }

    fn add(&mut self, lhs: &IntTerm, rhs: &IntTerm) -> IntTerm {
        let min = lhs.min + rhs.min;
        let max = lhs.max + rhs.max;
        let width = signed_width(min, max);
        let a = lhs.resized(width);
        let b = rhs.resized(width);
        let mut carry = Bit::Const(false);
        let mut bits = Vec::with_capacity(width);
        for i in 0..width {
            let (sum, carry_out) = self.full_adder(a[i], b[i], carry);
            bits.push(sum);
            carry = carry_out;
        }
        IntTerm { bits, min, max }
    }

    fn negate(&mut self, term: &IntTerm) -> IntTerm {
        // ~x == -x - 1 holds exactly once x is wide enough to hold both.
        let width = signed_width(term.min.min(-term.max - 1), term.max.max(-term.min));
        let inverted = IntTerm {
            bits: term.resized(width).into_iter().map(|b| !b).collect(),
            min: -term.max - 1,
            max: -term.min - 1,
        };
        let one = self.const_term(1);
        self.add(&inverted, &one)
    }

    fn scale(&mut self, term: &IntTerm, factor: i64) -> IntTerm {
        if factor == 0 {
            return self.const_term(0);
        }
        if factor == 1 {
            return term.clone();
        }
        let magnitude = factor.unsigned_abs();
        let mut acc: Option<IntTerm> = None;
        for shift in 0..64 {
            if (magnitude >> shift) & 1 == 0 {
                continue;
            }
            let mut bits = vec![Bit::Const(false); shift];
            bits.extend(term.bits.iter().copied());
            let shifted = IntTerm {
                bits,
                min: term.min << shift,
                max: term.max << shift,
            };
            acc = Some(match acc {
                None => shifted,
                Some(prev) => self.add(&prev, &shifted),
            });
        }
        let scaled = acc.expect("non-zero factor has at least one set bit");
        if factor < 0 {
            self.negate(&scaled)
        } else {
            scaled
        }
    }

    fn sub(&mut self, lhs: &IntTerm, rhs: &IntTerm) -> IntTerm {
        let negated = self.negate(rhs);
        self.add(lhs, &negated)
    }

    fn is_zero(&mut self, term: &IntTerm) -> Bit {
        if term.min > 0 || term.max < 0 {
            return Bit::Const(false);
        }
        let mut any_set = Bit::Const(false);
        for &bit in &term.bits {
            any_set = self.or(any_set, bit);
        }
        !any_set
    }
}

impl Solver for VarisatSolver {
    type Term = IntTerm;
    type Pred = Bit;
    type Config = VarisatConfig;

    fn new(config: &VarisatConfig) -> io::Result<Self> {
        if config.int_width < 2 || config.int_width > 63 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "integer width must be in [2, 63]; got {}",
                    config.int_width
                ),
            ));
        }
        Ok(Self {
            sat: varisat::Solver::new(),
            int_width: config.int_width,
            model: None,
            trivially_unsat: false,
            clause_count: 0,
        })
    }

    fn declare_int(&mut self, name: &str) -> io::Result<IntTerm> {
        log::trace!("declaring {} as {} SAT variables", name, self.int_width);
        let bits = (0..self.int_width)
            .map(|_| Bit::Lit(self.sat.new_lit()))
            .collect();
        Ok(IntTerm {
            bits,
            min: -(1i128 << (self.int_width - 1)),
            max: (1i128 << (self.int_width - 1)) - 1,
        })
    }

    fn constant(&mut self, value: i64) -> IntTerm {
        self.const_term(value as i128)
    }

    fn linear(&mut self, expr: &LinearExpr<IntTerm>) -> IntTerm {
        let mut acc = self.const_term(expr.constant as i128);
        for (factor, term) in &expr.terms {
            let scaled = self.scale(term, *factor);
            acc = self.add(&acc, &scaled);
        }
        acc
    }

    fn eq(&mut self, lhs: &IntTerm, rhs: &IntTerm) -> Bit {
        let diff = self.sub(lhs, rhs);
        self.is_zero(&diff)
    }

    fn lt(&mut self, lhs: &IntTerm, rhs: &IntTerm) -> Bit {
        let diff = self.sub(lhs, rhs);
        if diff.max < 0 {
            Bit::Const(true)
        } else if diff.min >= 0 {
            Bit::Const(false)
        } else {
            diff.sign_bit()
        }
    }

    fn exactly(&mut self, k: usize, preds: &[Bit]) -> Bit {
        if k > preds.len() {
            return Bit::Const(false);
        }
        let mut count = self.const_term(0);
        for &pred in preds {
            let as_int = IntTerm {
                bits: vec![pred, Bit::Const(false)],
                min: 0,
                max: 1,
            };
            count = self.add(&count, &as_int);
        }
        let target = self.const_term(k as i128);
        self.eq(&count, &target)
    }

    fn assert(&mut self, pred: &Bit) -> io::Result<()> {
        match *pred {
            Bit::Const(true) => {}
            Bit::Const(false) => self.trivially_unsat = true,
            Bit::Lit(lit) => self.add_clause(&[lit]),
        }
        Ok(())
    }

    fn check(&mut self) -> io::Result<Response> {
        self.model = None;
        if self.trivially_unsat {
            return Ok(Response::Unsat);
        }
        log::debug!(
            "solving varisat formula with {} clauses",
            self.clause_count
        );
        match self.sat.solve() {
            Ok(true) => {
                let model = self.sat.model().ok_or_else(|| {
                    io::Error::new(io::ErrorKind::Other, "varisat reported SAT without a model")
                })?;
                self.model = Some(model.into_iter().collect());
                Ok(Response::Sat)
            }
            Ok(false) => Ok(Response::Unsat),
            Err(e) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("varisat solver error: {:?}", e),
            )),
        }
    }

    fn get_value(&mut self, term: &IntTerm) -> io::Result<i64> {
        let model = self.model.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::Other, "no model available; check() was not SAT")
        })?;
        let width = term.bits.len();
        let mut value: i128 = 0;
        for (i, bit) in term.bits.iter().enumerate() {
            let set = match bit {
                Bit::Const(b) => *b,
                Bit::Lit(lit) => model.contains(lit),
            };
            if set {
                if i + 1 == width {
                    value -= 1i128 << i;
                } else {
                    value += 1i128 << i;
                }
            }
        }
        i64::try_from(value).map_err(|_| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("model value {} does not fit in i64", value),
            )
        })
    }
}

#[cfg(test)]
use crate::test_solver;

#[cfg(test)]
test_solver!(
    varisat_tests,
    super::VarisatSolver::new(&super::VarisatConfig::default()).unwrap()
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_width() {
        assert_eq!(signed_width(0, 0), 1);
        assert_eq!(signed_width(-1, 0), 1);
        assert_eq!(signed_width(0, 1), 2);
        assert_eq!(signed_width(-128, 127), 8);
        assert_eq!(signed_width(-129, 127), 9);
        assert_eq!(signed_width(0, 128), 9);
    }

    #[test]
    fn test_constants_fold_without_clauses() {
        let mut solver = VarisatSolver::new(&VarisatConfig::default()).unwrap();
        let a = solver.constant(-3);
        let b = solver.constant(4);
        let lt = solver.lt(&a, &b);
        let eq = solver.eq(&a, &b);
        assert_eq!(lt, Bit::Const(true));
        assert_eq!(eq, Bit::Const(false));
        assert_eq!(solver.clause_count(), 0);
    }

    #[test]
    fn test_declared_range_is_bounded_by_width() {
        let mut solver = VarisatSolver::new(&VarisatConfig { int_width: 4 }).unwrap();
        let a = solver.declare_int("a").unwrap();
        assert_eq!(a.range(), (-8, 7));
        let big = solver.constant(8);
        let reaches = solver.eq(&a, &big);
        assert_eq!(reaches, Bit::Const(false));
    }

    #[test]
    fn test_wide_sum_does_not_wrap() {
        // Two 4-bit values at their maxima sum to 14, which needs 5 bits.
        let mut solver = VarisatSolver::new(&VarisatConfig { int_width: 4 }).unwrap();
        let a = solver.declare_int("a").unwrap();
        let b = solver.declare_int("b").unwrap();
        let mut expr = LinearExpr::new();
        expr.add_term(1, a.clone());
        expr.add_term(1, b.clone());
        let sum = solver.linear(&expr);
        let fourteen = solver.constant(14);
        let pred = solver.eq(&sum, &fourteen);
        solver.assert(&pred).unwrap();
        assert_eq!(solver.check().unwrap(), Response::Sat);
        assert_eq!(solver.get_value(&a).unwrap(), 7);
        assert_eq!(solver.get_value(&b).unwrap(), 7);
    }

    #[test]
    fn test_negating_minimum_value() {
        let mut solver = VarisatSolver::new(&VarisatConfig { int_width: 4 }).unwrap();
        let a = solver.declare_int("a").unwrap();
        let mut expr = LinearExpr::new();
        expr.add_term(-1, a.clone());
        let negated = solver.linear(&expr);
        let eight = solver.constant(8);
        let pred = solver.eq(&negated, &eight);
        solver.assert(&pred).unwrap();
        assert_eq!(solver.check().unwrap(), Response::Sat);
        assert_eq!(solver.get_value(&a).unwrap(), -8);
    }

    #[test]
    fn test_get_value_before_check_is_an_error() {
        let mut solver = VarisatSolver::new(&VarisatConfig::default()).unwrap();
        let a = solver.declare_int("a").unwrap();
        assert!(solver.get_value(&a).is_err());
    }

    #[test]
    fn test_rejects_degenerate_width() {
        assert!(VarisatSolver::new(&VarisatConfig { int_width: 1 }).is_err());
    }
}
