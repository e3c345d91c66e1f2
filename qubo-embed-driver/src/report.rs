// SPDX-License-Identifier: Apache-2.0

use std::fmt::Write;

use qubo_embed::analysis::Analysis;
use qubo_embed::solution::Solution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

fn render_coefficients(out: &mut String, solution: &Solution<i64>) {
    writeln!(out, "{} coefficients:", solution.basis).unwrap();
    for &(i, v) in &solution.linear {
        writeln!(out, "  h{} = {}", i, v).unwrap();
    }
    for &(i, j, v) in &solution.quadratic {
        writeln!(out, "  J{}_{} = {}", i, j, v).unwrap();
    }
}

pub fn render_text(analysis: &Analysis) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "Embedded {} columns with {} ancillae ({} rows)",
        analysis.ncols,
        analysis.num_ancillae,
        analysis.ranking.rows.len()
    )
    .unwrap();
    out.push('\n');
    render_coefficients(&mut out, &analysis.qubo);
    out.push('\n');
    render_coefficients(&mut out, &analysis.ising);
    out.push('\n');
    writeln!(out, "Truth table:").unwrap();
    out.push_str(&analysis.ranking.to_string());
    out.push('\n');
    writeln!(out, "Normalized gap: {}", analysis.gap).unwrap();
    out
}

pub fn render_json(analysis: &Analysis) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

pub fn render(analysis: &Analysis, format: ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(analysis)),
        ReportFormat::Json => render_json(analysis),
    }
}
