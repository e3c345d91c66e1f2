// SPDX-License-Identifier: Apache-2.0

use num_traits::{Num, Signed, Zero};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Basis {
    /// Variables take values in {0, 1}.
    Qubo,
    /// Variables are spins in {-1, +1}.
    Ising,
}

impl std::fmt::Display for Basis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Basis::Qubo => write!(f, "QUBO"),
            Basis::Ising => write!(f, "Ising"),
        }
    }
}

/// Coefficients of a quadratic energy function over `num_vars` variables.
///
/// `linear` holds one `(i, value)` entry per variable in index order and
/// `quadratic` one `(i, j, value)` entry per pair `i < j` in lexicographic
/// order, so two solutions over the same variable count always line up
/// entry-for-entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution<T = i64> {
    pub basis: Basis,
    pub num_vars: usize,
    pub linear: Vec<(usize, T)>,
    pub quadratic: Vec<(usize, usize, T)>,
}

impl<T: Copy + Zero> Solution<T> {
    pub fn zeros(basis: Basis, num_vars: usize) -> Self {
        let linear = (0..num_vars).map(|i| (i, T::zero())).collect();
        let mut quadratic = Vec::with_capacity(num_vars * num_vars.saturating_sub(1) / 2);
        for i in 0..num_vars {
            for j in (i + 1)..num_vars {
                quadratic.push((i, j, T::zero()));
            }
        }
        Self {
            basis,
            num_vars,
            linear,
            quadratic,
        }
    }

    /// Position of pair `(i, j)`, `i < j`, in `quadratic`.
    fn pair_position(&self, i: usize, j: usize) -> usize {
        let n = self.num_vars;
        i * n - i * (i + 1) / 2 + (j - i - 1)
    }

    pub fn linear_value(&self, i: usize) -> T {
        self.linear[i].1
    }

    /// Order-insensitive lookup of the coupling between `i` and `j`.
    pub fn quadratic_value(&self, i: usize, j: usize) -> T {
        assert_ne!(i, j, "no quadratic coefficient on the diagonal");
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.quadratic[self.pair_position(lo, hi)].2
    }

    pub fn set_linear(&mut self, i: usize, value: T) {
        self.linear[i].1 = value;
    }

    pub fn set_quadratic(&mut self, i: usize, j: usize, value: T) {
        assert_ne!(i, j, "no quadratic coefficient on the diagonal");
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let pos = self.pair_position(lo, hi);
        self.quadratic[pos].2 = value;
    }

    /// Every coefficient value, linear terms first.
    pub fn coefficients(&self) -> impl Iterator<Item = T> + '_ {
        self.linear
            .iter()
            .map(|(_, v)| *v)
            .chain(self.quadratic.iter().map(|(_, _, v)| *v))
    }
}

impl<T: Copy + Num + Signed + PartialOrd> Solution<T> {
    /// Largest absolute coefficient value; zero for an all-zero solution.
    pub fn max_abs(&self) -> T {
        self.coefficients()
            .map(|v| v.abs())
            .fold(T::zero(), |acc, v| if v > acc { v } else { acc })
    }
}

impl Solution<i64> {
    /// Scales every coefficient by `1 / max_abs()`, leaving an all-zero
    /// solution as zeros.
    pub fn normalize(&self) -> Solution<f64> {
        let imax = self.max_abs();
        let scale = |v: i64| {
            if imax == 0 {
                0.0
            } else {
                v as f64 / imax as f64
            }
        };
        Solution {
            basis: self.basis,
            num_vars: self.num_vars,
            linear: self.linear.iter().map(|&(i, v)| (i, scale(v))).collect(),
            quadratic: self
                .quadratic
                .iter()
                .map(|&(i, j, v)| (i, j, scale(v)))
                .collect(),
        }
    }
}
