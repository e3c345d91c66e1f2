// SPDX-License-Identifier: Apache-2.0

use crate::energy::energies;
use crate::solution::Solution;

/// Energies are rounded to this many decimal digits before distinct values
/// are compared, so floating point noise does not create spurious levels.
const ROUND_DIGITS: i32 = 10;

fn round_to_digits(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// Difference between the two lowest distinct energies of `ising` after its
/// coefficients are normalized to `[-1, 1]`.
///
/// Returns 0 when every coefficient is zero or when the energy function takes
/// fewer than two distinct values.
pub fn energy_gap(ising: &Solution<i64>) -> f64 {
    if ising.max_abs() == 0 {
        return 0.0;
    }
    let normalized = ising.normalize();
    let mut values: Vec<f64> = energies(normalized.num_vars, &normalized, [-1.0, 1.0])
        .into_iter()
        .map(|e| round_to_digits(e, ROUND_DIGITS))
        .collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    match values.as_slice() {
        [lowest, next, ..] => next - lowest,
        _ => 0.0,
    }
}
