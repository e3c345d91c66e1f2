// SPDX-License-Identifier: Apache-2.0

#![cfg(feature = "has-easy-smt")]

//! Backend that drives an external SMT-LIB solver process via `easy-smt`.
//!
//! Integers are unbounded SMT `Int`s, so this backend never rejects a model
//! for lack of coefficient range; the cost is the serialization overhead of
//! talking to a child process over stdin/stdout.

use std::io;
use std::path::PathBuf;

use easy_smt::{Context, ContextBuilder, SExpr};

use crate::solver::solver_interface::{LinearExpr, Response, Solver};

/// Configuration for executable solver backends using the `easy-smt` crate.
///
/// Any SMT-LIB 2 compliant solver that supports `QF_LIA` and model
/// production can be used.
#[derive(Debug, Clone)]
pub struct EasySmtConfig {
    pub solver_path: PathBuf,
    pub solver_args: Vec<String>,
    pub replay_file: Option<PathBuf>,
}

impl EasySmtConfig {
    pub fn z3() -> Self {
        Self {
            solver_path: PathBuf::from("z3"),
            solver_args: [
                "-nw",   // No warnings
                "-smt2", // Use SMT2
                "-in",   // Read from stdin
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            replay_file: None,
        }
    }

    pub fn cvc5() -> Self {
        Self {
            solver_path: PathBuf::from("cvc5"),
            solver_args: ["--produce-models", "--incremental", "--lang=smt2"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            replay_file: None,
        }
    }
}

pub struct EasySmtSolver {
    context: Context,
    next_name_index: usize,
}

impl EasySmtSolver {
    fn int(&self, value: i64) -> SExpr {
        // SMT-LIB has no negative literals; `-5` is spelled `(- 5)`.
        let magnitude = self.context.numeral(value.unsigned_abs());
        if value < 0 {
            self.context.negate(magnitude)
        } else {
            magnitude
        }
    }

    fn parse_int(&self, value: SExpr) -> io::Result<i64> {
        let text = self.context.display(value).to_string();
        let trimmed = text.trim();
        let (negative, digits) = match trimmed
            .strip_prefix("(-")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(inner) => (true, inner.trim()),
            None => (false, trimmed),
        };
        let magnitude: i64 = digits.parse().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("solver returned non-integer model value: {}", text),
            )
        })?;
        Ok(if negative { -magnitude } else { magnitude })
    }
}

impl Solver for EasySmtSolver {
    type Term = SExpr;
    type Pred = SExpr;
    type Config = EasySmtConfig;

    fn new(config: &EasySmtConfig) -> io::Result<Self> {
        let mut builder = ContextBuilder::new();
        if let Some(ref replay_file) = config.replay_file {
            builder.replay_file(Some(std::fs::File::create(replay_file)?));
        }
        builder.solver(&config.solver_path);
        builder.solver_args(&config.solver_args);
        let mut context = builder.build()?;
        context.set_logic("QF_LIA")?;
        Ok(Self {
            context,
            next_name_index: 0,
        })
    }

    fn declare_int(&mut self, name: &str) -> io::Result<SExpr> {
        // Prefix with an index so user-facing names can never collide.
        let symbol = format!("_{}_{}", self.next_name_index, name);
        self.next_name_index += 1;
        let sort = self.context.int_sort();
        self.context.declare_const(symbol, sort)
    }

    fn constant(&mut self, value: i64) -> SExpr {
        self.int(value)
    }

    fn linear(&mut self, expr: &LinearExpr<SExpr>) -> SExpr {
        let mut acc = self.int(expr.constant);
        for (factor, term) in &expr.terms {
            let scaled = if *factor == 1 {
                *term
            } else {
                self.context.times(self.int(*factor), *term)
            };
            acc = self.context.plus(acc, scaled);
        }
        acc
    }

    fn eq(&mut self, lhs: &SExpr, rhs: &SExpr) -> SExpr {
        self.context.eq(*lhs, *rhs)
    }

    fn lt(&mut self, lhs: &SExpr, rhs: &SExpr) -> SExpr {
        self.context.lt(*lhs, *rhs)
    }

    fn gt(&mut self, lhs: &SExpr, rhs: &SExpr) -> SExpr {
        self.context.gt(*lhs, *rhs)
    }

    fn exactly(&mut self, k: usize, preds: &[SExpr]) -> SExpr {
        let mut count = self.int(0);
        for pred in preds {
            let as_int = self.context.ite(*pred, self.int(1), self.int(0));
            count = self.context.plus(count, as_int);
        }
        self.context.eq(count, self.int(k as i64))
    }

    fn assert(&mut self, pred: &SExpr) -> io::Result<()> {
        self.context.assert(*pred)
    }

    fn check(&mut self) -> io::Result<Response> {
        match self.context.check()? {
            easy_smt::Response::Sat => Ok(Response::Sat),
            easy_smt::Response::Unsat => Ok(Response::Unsat),
            easy_smt::Response::Unknown => Ok(Response::Unknown),
        }
    }

    fn get_value(&mut self, term: &SExpr) -> io::Result<i64> {
        let values = self.context.get_value(vec![*term])?;
        let (_, value) = values.into_iter().next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "solver returned an empty model")
        })?;
        self.parse_int(value)
    }
}

#[cfg(test)]
use crate::test_solver;

#[cfg(test)]
#[cfg(feature = "with-z3-binary-test")]
test_solver!(
    z3_tests,
    super::EasySmtSolver::new(&super::EasySmtConfig::z3()).unwrap()
);
