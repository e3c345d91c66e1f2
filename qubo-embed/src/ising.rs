// SPDX-License-Identifier: Apache-2.0

//! QUBO to Ising basis change.
//!
//! Substituting `b = (s + 1) / 2` into a QUBO and multiplying through by 4
//! gives `h_i = 2 a_i + sum_j J_ij` with the couplings unchanged, plus a
//! constant that is dropped. The resulting Ising energies are therefore
//! `4 * E_qubo - c` for a single constant `c`, which preserves the ordering of
//! every row.

use num_traits::Num;

use crate::solution::{Basis, Solution};

pub fn qubo_to_ising<T: Num + Copy>(qubo: &Solution<T>) -> Solution<T> {
    assert_eq!(qubo.basis, Basis::Qubo, "expected a QUBO-basis solution");
    let mut ising = Solution::zeros(Basis::Ising, qubo.num_vars);
    for &(i, j, v) in &qubo.quadratic {
        ising.set_linear(i, ising.linear_value(i) + v);
        ising.set_linear(j, ising.linear_value(j) + v);
        ising.set_quadratic(i, j, v);
    }
    for &(i, v) in &qubo.linear {
        ising.set_linear(i, ising.linear_value(i) + v + v);
    }
    ising
}
