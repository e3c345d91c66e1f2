// SPDX-License-Identifier: Apache-2.0

//! Exhaustive evaluation of an energy function over every assignment.

use num_traits::Num;

use crate::solution::Solution;

/// Largest variable count whose `2^n` assignments can be indexed by a
/// `usize`.
pub const MAX_VARIABLES: usize = usize::BITS as usize - 1;

/// Decodes `index` as a big-endian bit vector of `width` bits, i.e. bit 0 of
/// the result is the most significant bit of `index`.
pub fn bits_of(index: usize, width: usize) -> Vec<bool> {
    (0..width)
        .map(|p| (index >> (width - 1 - p)) & 1 == 1)
        .collect()
}

/// Inverse of `bits_of`.
pub fn index_of(bits: &[bool]) -> usize {
    bits.iter().fold(0, |acc, &b| (acc << 1) | b as usize)
}

/// Energy of a single assignment, `values[i]` being the value of variable
/// `i`.
pub fn energy_of<T: Num + Copy>(solution: &Solution<T>, values: &[T]) -> T {
    let mut energy = T::zero();
    for &(i, coeff) in &solution.linear {
        energy = energy + coeff * values[i];
    }
    for &(i, j, coeff) in &solution.quadratic {
        energy = energy + coeff * values[i] * values[j];
    }
    energy
}

/// Energies of all `2^num_vars` assignments in binary counting order.
///
/// Each bit of the row index is substituted through `pair`: a 0 bit becomes
/// `pair[0]` and a 1 bit `pair[1]`. Use `[0, 1]` for a QUBO and `[-1, 1]` for
/// an Ising model.
pub fn energies<T: Num + Copy>(num_vars: usize, solution: &Solution<T>, pair: [T; 2]) -> Vec<T> {
    assert!(
        solution.num_vars <= num_vars,
        "solution has {} variables but only {} were requested",
        solution.num_vars,
        num_vars
    );
    assert!(
        num_vars <= MAX_VARIABLES,
        "cannot enumerate 2^{} assignments",
        num_vars
    );
    let mut values = vec![pair[0]; num_vars];
    (0..1usize << num_vars)
        .map(|row| {
            for (p, value) in values.iter_mut().enumerate() {
                *value = pair[(row >> (num_vars - 1 - p)) & 1];
            }
            energy_of(solution, &values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::{Basis, Solution};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bits_are_big_endian() {
        assert_eq!(bits_of(0b110, 3), vec![true, true, false]);
        assert_eq!(bits_of(1, 4), vec![false, false, false, true]);
        assert_eq!(index_of(&[true, false, true]), 5);
        assert_eq!(bits_of(0, 0), Vec::<bool>::new());
    }

    #[test]
    fn test_qubo_energies() {
        // E = x0 - 2 x1 + 3 x0 x1
        let mut s: Solution<i64> = Solution::zeros(Basis::Qubo, 2);
        s.set_linear(0, 1);
        s.set_linear(1, -2);
        s.set_quadratic(0, 1, 3);
        assert_eq!(energies(2, &s, [0, 1]), vec![0, -2, 1, 2]);
    }

    #[test]
    fn test_spin_substitution() {
        // E = h0 s0 + J s0 s1 with h0 = 1, J = 2
        let mut s: Solution<i64> = Solution::zeros(Basis::Ising, 2);
        s.set_linear(0, 1);
        s.set_quadratic(0, 1, 2);
        // rows: (-1,-1) (-1,+1) (+1,-1) (+1,+1)
        assert_eq!(energies(2, &s, [-1, 1]), vec![1, -3, -1, 3]);
    }

    #[test]
    #[should_panic(expected = "cannot enumerate")]
    fn test_oversized_enumeration_panics() {
        let s: Solution<i64> = Solution::zeros(Basis::Qubo, 0);
        energies(MAX_VARIABLES + 1, &s, [0, 1]);
    }

    #[test]
    fn test_float_energies() {
        let mut s: Solution<f64> = Solution::zeros(Basis::Ising, 1);
        s.set_linear(0, 0.5);
        assert_eq!(energies(1, &s, [-1.0, 1.0]), vec![-0.5, 0.5]);
    }
}
