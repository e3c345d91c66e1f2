// SPDX-License-Identifier: Apache-2.0

//! Settings for a run, merged from command line flags, an optional
//! `qubo-embed.toml` and built-in defaults, in that order of precedence.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use qubo_embed::search::SearchOptions;
use qubo_embed::solver::varisat_backend::VarisatConfig;
use qubo_embed::truth_table::ParseOptions;

use crate::solver_choice::SolverChoice;

pub const DEFAULT_CONFIG_FILENAME: &str = "qubo-embed.toml";

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    pub solver: Option<SolverChoice>,

    /// Bit width of coefficients for the varisat backend.
    pub int_width: Option<usize>,

    pub min_ancillae: Option<usize>,

    /// Exclusive bound on the ancilla count; defaults to the number of
    /// columns in the table.
    pub max_ancillae: Option<usize>,

    pub comment_marker: Option<char>,
    pub energy_marker: Option<char>,

    /// Extra arguments passed to an external SMT solver binary, e.g. a
    /// timeout flag.
    pub solver_args: Option<Vec<String>>,
}

impl DriverConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("parse qubo-embed config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in config file {}", path.display()))
    }
}

/// Loads the config named on the command line, or `qubo-embed.toml` from the
/// working directory if that exists. An explicitly named file must exist.
pub fn find_config(explicit: Option<&Path>) -> anyhow::Result<Option<DriverConfig>> {
    if let Some(path) = explicit {
        return DriverConfig::load(path).map(Some);
    }
    let cwd_path = Path::new(DEFAULT_CONFIG_FILENAME);
    if cwd_path.exists() {
        log::info!("using config file {}", cwd_path.display());
        return DriverConfig::load(cwd_path).map(Some);
    }
    Ok(None)
}

/// The command line's view of the same knobs; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub solver: Option<SolverChoice>,
    pub int_width: Option<usize>,
    pub min_ancillae: Option<usize>,
    pub max_ancillae: Option<usize>,
    pub comment_marker: Option<char>,
    pub energy_marker: Option<char>,
    pub solver_args: Vec<String>,
    pub smt_replay: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub solver: SolverChoice,
    pub varisat: VarisatConfig,
    pub search: SearchOptions,
    pub parse: ParseOptions,
    pub solver_args: Vec<String>,
    pub smt_replay: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(cli: &CliOverrides, config: Option<&DriverConfig>) -> Self {
        let file = config.cloned().unwrap_or_default();
        let defaults = ParseOptions::default();
        let solver_args = if cli.solver_args.is_empty() {
            file.solver_args.unwrap_or_default()
        } else {
            cli.solver_args.clone()
        };
        Settings {
            solver: cli.solver.or(file.solver).unwrap_or_default(),
            varisat: VarisatConfig {
                int_width: cli
                    .int_width
                    .or(file.int_width)
                    .unwrap_or(VarisatConfig::default().int_width),
            },
            search: SearchOptions {
                min_ancillae: cli.min_ancillae.or(file.min_ancillae).unwrap_or(0),
                max_ancillae: cli.max_ancillae.or(file.max_ancillae),
            },
            parse: ParseOptions {
                comment_marker: cli
                    .comment_marker
                    .or(file.comment_marker)
                    .unwrap_or(defaults.comment_marker),
                energy_marker: cli
                    .energy_marker
                    .or(file.energy_marker)
                    .unwrap_or(defaults.energy_marker),
            },
            solver_args,
            smt_replay: cli.smt_replay.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&CliOverrides::default(), None);
        assert_eq!(settings.solver, SolverChoice::Varisat);
        assert_eq!(settings.varisat.int_width, 8);
        assert_eq!(settings.search, SearchOptions::default());
        assert_eq!(settings.parse, ParseOptions::default());
        assert!(settings.solver_args.is_empty());
    }

    #[test]
    fn test_config_file_values_apply() {
        let config = DriverConfig::from_toml_str(
            r#"
solver = "varisat"
int_width = 6
max_ancillae = 2
comment_marker = ";"
solver_args = ["-T:10"]
"#,
        )
        .unwrap();
        let settings = Settings::resolve(&CliOverrides::default(), Some(&config));
        assert_eq!(settings.varisat.int_width, 6);
        assert_eq!(settings.search.max_ancillae, Some(2));
        assert_eq!(settings.parse.comment_marker, ';');
        assert_eq!(settings.parse.energy_marker, '!');
        assert_eq!(settings.solver_args, vec!["-T:10".to_string()]);
    }

    #[test]
    fn test_command_line_wins() {
        let config = DriverConfig::from_toml_str("int_width = 6\nmin_ancillae = 1\n").unwrap();
        let cli = CliOverrides {
            int_width: Some(10),
            solver_args: vec!["-v".to_string()],
            ..CliOverrides::default()
        };
        let settings = Settings::resolve(&cli, Some(&config));
        assert_eq!(settings.varisat.int_width, 10);
        assert_eq!(settings.search.min_ancillae, 1);
        assert_eq!(settings.solver_args, vec!["-v".to_string()]);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(DriverConfig::from_toml_str("int_wdth = 6\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"energy_marker = \"@\"\n").unwrap();
        let config = find_config(Some(file.path())).unwrap().unwrap();
        assert_eq!(config.energy_marker, Some('@'));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        assert!(find_config(Some(Path::new("/nonexistent/qubo-embed.toml"))).is_err());
    }
}
