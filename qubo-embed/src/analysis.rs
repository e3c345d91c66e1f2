// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use crate::energy::energies;
use crate::gap::energy_gap;
use crate::ising::qubo_to_ising;
use crate::rank::{rank_energies, Ranking};
use crate::search::Embedding;
use crate::solution::Solution;

/// Everything reported about a successful embedding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub ncols: usize,
    pub num_ancillae: usize,
    pub qubo: Solution<i64>,
    pub ising: Solution<i64>,
    pub ranking: Ranking,
    pub gap: f64,
}

pub fn analyze(ncols: usize, embedding: &Embedding) -> Analysis {
    let tnc = ncols + embedding.num_ancillae;
    let qubo = embedding.solution.clone();
    let ising = qubo_to_ising(&qubo);
    let ranking = rank_energies(
        &energies(tnc, &qubo, [0, 1]),
        ncols,
        embedding.num_ancillae,
    );
    let gap = energy_gap(&ising);
    Analysis {
        ncols,
        num_ancillae: embedding.num_ancillae,
        qubo,
        ising,
        ranking,
        gap,
    }
}
