// SPDX-License-Identifier: Apache-2.0

//! Ranks every row of the ancilla-extended truth table by energy.

use serde::Serialize;

use crate::energy::bits_of;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedRow {
    /// Row index in binary counting order over inputs followed by ancillae.
    pub index: usize,
    pub inputs: Vec<bool>,
    pub ancillae: Vec<bool>,
    /// Position of `energy` among the distinct energies, 0 being the minimum.
    pub rank: usize,
    pub energy: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub ncols: usize,
    pub num_ancillae: usize,
    /// Distinct energies in ascending order.
    pub distinct_energies: Vec<i64>,
    pub rows: Vec<RankedRow>,
}

/// Ranks QUBO-basis energies as produced by `energies(ncols + na, .., [0, 1])`.
pub fn rank_energies(energies: &[i64], ncols: usize, num_ancillae: usize) -> Ranking {
    let tnc = ncols + num_ancillae;
    assert_eq!(
        energies.len(),
        1usize << tnc,
        "expected one energy per extended row"
    );
    let mut distinct_energies = energies.to_vec();
    distinct_energies.sort_unstable();
    distinct_energies.dedup();

    let rows = energies
        .iter()
        .enumerate()
        .map(|(index, &energy)| {
            let mut inputs = bits_of(index, tnc);
            let ancillae = inputs.split_off(ncols);
            let rank = distinct_energies
                .binary_search(&energy)
                .expect("energy is one of the distinct energies");
            RankedRow {
                index,
                inputs,
                ancillae,
                rank,
                energy,
            }
        })
        .collect();

    Ranking {
        ncols,
        num_ancillae,
        distinct_energies,
        rows,
    }
}

fn render_bits(bits: &[bool]) -> String {
    bits.iter()
        .map(|b| if *b { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(" ")
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            write!(f, "{}", render_bits(&row.inputs))?;
            if self.num_ancillae > 0 {
                write!(f, " | {}", render_bits(&row.ancillae))?;
            }
            writeln!(f, "  rank {:>3}  energy {:>5}", row.rank, row.energy)?;
        }
        Ok(())
    }
}
