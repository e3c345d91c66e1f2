// SPDX-License-Identifier: Apache-2.0

//! Embeds Boolean truth tables into the ground states of quadratic
//! pseudo-Boolean (QUBO) and Ising energy functions.
//!
//! The typical flow is parse, search, analyze:
//!
//! ```no_run
//! use qubo_embed::search::{escalate, SearchOptions};
//! use qubo_embed::solver::varisat_backend::{VarisatConfig, VarisatSolver};
//! use qubo_embed::truth_table::{ParseOptions, TruthTable};
//!
//! let tt = TruthTable::parse_str("0 0 0\n0 1 1\n1 0 1\n1 1 0\n", &ParseOptions::default())
//!     .unwrap();
//! let embedding =
//!     escalate::<VarisatSolver>(&tt, &SearchOptions::default(), &VarisatConfig::default())
//!         .unwrap();
//! let analysis = qubo_embed::analysis::analyze(tt.ncols(), &embedding);
//! println!("{}", analysis.ranking);
//! ```

pub mod analysis;
pub mod energy;
pub mod gap;
pub mod ising;
pub mod rank;
pub mod search;
pub mod solution;
pub mod solver;
pub mod truth_table;
pub mod verify;
