// SPDX-License-Identifier: Apache-2.0

use qubo_embed::search::{escalate, EmbedError, Embedding};
use qubo_embed::solver::varisat_backend::VarisatSolver;
use qubo_embed::truth_table::TruthTable;

use crate::driver_config::Settings;
use crate::solver_choice::SolverChoice;

#[cfg(feature = "has-easy-smt")]
fn easy_smt_config(
    base: qubo_embed::solver::easy_smt_backend::EasySmtConfig,
    settings: &Settings,
) -> qubo_embed::solver::easy_smt_backend::EasySmtConfig {
    let mut config = base;
    config.solver_args.extend(settings.solver_args.iter().cloned());
    config.replay_file = settings.smt_replay.clone();
    config
}

/// Runs the escalation loop with the backend named in `settings`.
pub fn embed_table(tt: &TruthTable, settings: &Settings) -> Result<Embedding, EmbedError> {
    log::info!(
        "embedding {} rows over {} columns with {}",
        tt.len(),
        tt.ncols(),
        settings.solver
    );
    match settings.solver {
        SolverChoice::Varisat => {
            if !settings.solver_args.is_empty() || settings.smt_replay.is_some() {
                log::warn!("solver arguments and SMT replay are ignored by the varisat backend");
            }
            escalate::<VarisatSolver>(tt, &settings.search, &settings.varisat)
        }
        #[cfg(feature = "has-easy-smt")]
        SolverChoice::Z3Binary => {
            use qubo_embed::solver::easy_smt_backend::{EasySmtConfig, EasySmtSolver};
            let config = easy_smt_config(EasySmtConfig::z3(), settings);
            escalate::<EasySmtSolver>(tt, &settings.search, &config)
        }
        #[cfg(feature = "has-easy-smt")]
        SolverChoice::Cvc5Binary => {
            use qubo_embed::solver::easy_smt_backend::{EasySmtConfig, EasySmtSolver};
            let config = easy_smt_config(EasySmtConfig::cvc5(), settings);
            escalate::<EasySmtSolver>(tt, &settings.search, &config)
        }
    }
}
