// SPDX-License-Identifier: Apache-2.0

//! Command line driver for `qubo-embed`: reads a truth table file, searches
//! for the smallest ancilla count that embeds it, and reports the result.

pub mod driver_config;
pub mod report;
pub mod report_cli_error;
pub mod run;
pub mod solver_choice;
