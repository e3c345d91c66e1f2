// SPDX-License-Identifier: Apache-2.0

//! Finds a QUBO/Ising energy function whose ground states are exactly the
//! valid rows of a truth table.
//!
//! Sample usage:
//!
//! ```shell
//! $ cargo run -- xor.txt
//! $ cargo run -- --format=json --max-ancillae=3 table.txt
//! $ cargo run -- --quiet table.txt && echo embeddable
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use qubo_embed::analysis::analyze;
use qubo_embed::truth_table::TruthTable;
use qubo_embed::verify::verify;
use qubo_embed_driver::driver_config::{find_config, CliOverrides, Settings};
use qubo_embed_driver::report::{render, ReportFormat};
use qubo_embed_driver::report_cli_error::report_cli_error_and_exit;
use qubo_embed_driver::solver_choice::SolverChoice;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Truth table file: one row per line, optional `!N` energy suffix.
    input: PathBuf,

    /// Constraint solver backend.
    #[arg(long)]
    solver: Option<SolverChoice>,

    /// Bit width of coefficients for the varisat backend.
    #[arg(long)]
    int_width: Option<usize>,

    #[arg(long)]
    min_ancillae: Option<usize>,

    /// Exclusive upper bound on the ancilla count (default: number of columns).
    #[arg(long)]
    max_ancillae: Option<usize>,

    #[arg(long)]
    comment_marker: Option<char>,

    #[arg(long)]
    energy_marker: Option<char>,

    /// Writes the SMT-LIB conversation with an external solver to this path.
    #[arg(long)]
    smt_replay: Option<PathBuf>,

    /// Extra argument for an external solver binary; may be repeated.
    #[arg(long = "solver-arg", allow_hyphen_values = true)]
    solver_args: Vec<String>,

    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Prints nothing; success is reported by exit status alone.
    #[arg(long, short = 'q', default_value_t = false)]
    quiet: bool,

    /// Whether to re-check the found solution by exhaustive evaluation.
    #[arg(long, default_value_t = true)]
    #[arg(action = clap::ArgAction::Set)]
    verify: bool,

    /// Config file; defaults to `qubo-embed.toml` in the working directory.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            solver: self.solver,
            int_width: self.int_width,
            min_ancillae: self.min_ancillae,
            max_ancillae: self.max_ancillae,
            comment_marker: self.comment_marker,
            energy_marker: self.energy_marker,
            solver_args: self.solver_args.clone(),
            smt_replay: self.smt_replay.clone(),
        }
    }
}

fn run(args: &Args) -> anyhow::Result<Option<String>> {
    let config = find_config(args.config.as_deref())?;
    let settings = Settings::resolve(&args.overrides(), config.as_ref());
    log::debug!("resolved settings: {:?}", settings);

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("read truth table {}", args.input.display()))?;
    let tt = TruthTable::parse_str(&text, &settings.parse)
        .with_context(|| format!("parse truth table {}", args.input.display()))?;

    let embedding = qubo_embed_driver::run::embed_table(&tt, &settings)?;
    if args.verify {
        verify(&tt, &embedding.solution, embedding.num_ancillae)
            .context("found solution failed verification")?;
    }
    if args.quiet {
        return Ok(None);
    }
    let analysis = analyze(tt.ncols(), &embedding);
    render(&analysis, args.format).map(Some)
}

fn main() {
    let args = Args::parse();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.quiet {
        logger.filter_level(log::LevelFilter::Off);
    }
    let _ = logger.try_init();

    match run(&args) {
        Ok(Some(report)) => print!("{}", report),
        Ok(None) => {}
        Err(e) => {
            if args.quiet {
                std::process::exit(1);
            }
            let cause = format!("{:#}", e);
            let input = args.input.display().to_string();
            report_cli_error_and_exit(
                "embedding failed",
                vec![("input", &input), ("cause", &cause)],
            );
        }
    }
}
