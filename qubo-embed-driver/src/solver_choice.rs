// SPDX-License-Identifier: Apache-2.0

//! Selects the constraint solver backend from the command line or config
//! file.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverChoice {
    /// In-process SAT solver over bit-blasted bounded integers.
    Varisat,
    #[cfg(feature = "has-easy-smt")]
    Z3Binary,
    #[cfg(feature = "has-easy-smt")]
    Cvc5Binary,
}

impl Default for SolverChoice {
    fn default() -> Self {
        SolverChoice::Varisat
    }
}

impl fmt::Display for SolverChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolverChoice::Varisat => "varisat",
            #[cfg(feature = "has-easy-smt")]
            SolverChoice::Z3Binary => "z3-binary",
            #[cfg(feature = "has-easy-smt")]
            SolverChoice::Cvc5Binary => "cvc5-binary",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for SolverChoice {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "varisat" => Ok(Self::Varisat),
            #[cfg(feature = "has-easy-smt")]
            "z3-binary" => Ok(Self::Z3Binary),
            #[cfg(feature = "has-easy-smt")]
            "cvc5-binary" => Ok(Self::Cvc5Binary),
            _ => Err(format!("invalid solver: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        let choice: SolverChoice = "varisat".parse().unwrap();
        assert_eq!(choice, SolverChoice::Varisat);
        assert_eq!(choice.to_string(), "varisat");
        assert!("minisat".parse::<SolverChoice>().is_err());
    }
}
