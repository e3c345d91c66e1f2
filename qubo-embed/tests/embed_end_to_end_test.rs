// SPDX-License-Identifier: Apache-2.0

use pretty_assertions::assert_eq;
use test_case::test_case;

use qubo_embed::analysis::analyze;
use qubo_embed::energy::energies;
use qubo_embed::ising::qubo_to_ising;
use qubo_embed::rank::rank_energies;
use qubo_embed::search::{ancilla_search, escalate, EmbedError, Embedding, SearchOptions};
use qubo_embed::solver::varisat_backend::{VarisatConfig, VarisatSolver};
use qubo_embed::truth_table::{ParseOptions, TruthTable};
use qubo_embed::verify::verify;

const XOR: &str = "\
# a b | a XOR b
0 0 0
0 1 1
1 0 1
1 1 0
";

const AND: &str = "\
0 0 0
0 1 0
1 0 0
1 1 1
";

const HALF_ADDER: &str = "\
# a b | carry sum
0 0 0 0
0 1 0 1
1 0 0 1
1 1 1 0
";

const PRIORITIZED: &str = "\
# excited states are allowed but ordered
0 0 !0
0 1 !4
1 1 !9
";

fn table(text: &str) -> TruthTable {
    let _ = env_logger::builder().is_test(true).try_init();
    TruthTable::parse_str(text, &ParseOptions::default()).unwrap()
}

fn embed(tt: &TruthTable) -> Embedding {
    escalate::<VarisatSolver>(tt, &SearchOptions::default(), &VarisatConfig::default())
        .unwrap_or_else(|e| panic!("embedding failed: {}", e))
}

/// Lowest rank reached by each input pattern over all of its ancilla
/// extensions.
fn lowest_ranks(tt: &TruthTable, embedding: &Embedding) -> Vec<usize> {
    let na = embedding.num_ancillae;
    let tnc = tt.ncols() + na;
    let ranking = rank_energies(&energies(tnc, &embedding.solution, [0, 1]), tt.ncols(), na);
    ranking
        .rows
        .chunks(1 << na)
        .map(|chunk| chunk.iter().map(|r| r.rank).min().unwrap())
        .collect()
}

#[test]
fn test_xor_needs_one_ancilla() {
    let tt = table(XOR);
    let at_zero = ancilla_search::<VarisatSolver>(&tt, 0, &VarisatConfig::default()).unwrap();
    assert!(at_zero.is_none(), "XOR is not expressible without ancillae");

    let only_zero = SearchOptions {
        min_ancillae: 0,
        max_ancillae: Some(1),
    };
    assert!(matches!(
        escalate::<VarisatSolver>(&tt, &only_zero, &VarisatConfig::default()),
        Err(EmbedError::SearchExhausted { .. })
    ));

    let embedding = embed(&tt);
    assert_eq!(embedding.num_ancillae, 1);
    assert_eq!(embedding.solution.num_vars, 4);
    assert_eq!(verify(&tt, &embedding.solution, 1), Ok(()));
}

#[test]
fn test_single_valid_row_is_unique_minimum() {
    let tt = table("1 1 !0\n");
    let embedding = embed(&tt);
    assert_eq!(embedding.num_ancillae, 0);
    let ranking = rank_energies(&energies(2, &embedding.solution, [0, 1]), 2, 0);
    let minima: Vec<usize> = ranking
        .rows
        .iter()
        .filter(|r| r.rank == 0)
        .map(|r| r.index)
        .collect();
    assert_eq!(minima, vec![0b11]);
}

#[test_case(AND, 0; "and gate")]
#[test_case(HALF_ADDER, 0; "half adder")]
#[test_case(PRIORITIZED, 0; "ordered levels")]
fn test_embedding_is_valid(text: &str, expected_ancillae: usize) {
    let tt = table(text);
    let embedding = embed(&tt);
    assert_eq!(embedding.num_ancillae, expected_ancillae);
    assert_eq!(
        verify(&tt, &embedding.solution, embedding.num_ancillae),
        Ok(())
    );
}

#[test]
fn test_levels_are_reached_in_order() {
    let tt = table(PRIORITIZED);
    let embedding = embed(&tt);
    let ranks = lowest_ranks(&tt, &embedding);
    // Rows 00, 01, 11 carry levels 0, 1, 2; the forbidden row 10 sits above.
    assert_eq!(&ranks[0..2], &[0, 1]);
    assert_eq!(ranks[3], 2);
    assert!(ranks[2] > 2);
}

#[test]
fn test_xor_other_extensions_are_excited() {
    let tt = table(XOR);
    let embedding = embed(&tt);
    let na = embedding.num_ancillae;
    let ranking = rank_energies(
        &energies(tt.ncols() + na, &embedding.solution, [0, 1]),
        tt.ncols(),
        na,
    );
    for chunk in ranking.rows.chunks(1 << na) {
        let Some(level) = tt.level(&chunk[0].inputs) else {
            continue;
        };
        let at_level = chunk.iter().filter(|r| r.rank == level).count();
        assert_eq!(at_level, 1, "row {:?}", chunk[0].inputs);
        for r in chunk.iter().filter(|r| r.rank != level) {
            assert!(
                r.rank > tt.max_level(),
                "row {:?} ancillae {:?} at rank {}",
                r.inputs,
                r.ancillae,
                r.rank
            );
        }
    }
}

#[test]
fn test_repeated_searches_agree_on_ranks() {
    let tt = table(XOR);
    let first = embed(&tt);
    let second = embed(&tt);
    assert_eq!(first.num_ancillae, second.num_ancillae);
    let first_ranks = lowest_ranks(&tt, &first);
    let second_ranks = lowest_ranks(&tt, &second);
    for (index, (row, level)) in tt.rows().enumerate() {
        let pattern = qubo_embed::energy::index_of(row);
        assert_eq!(first_ranks[pattern], level, "row #{}", index);
        assert_eq!(second_ranks[pattern], level, "row #{}", index);
    }
}

#[test]
fn test_ising_transform_of_found_solution() {
    let tt = table(XOR);
    let embedding = embed(&tt);
    let tnc = tt.ncols() + embedding.num_ancillae;
    let ising = qubo_to_ising(&embedding.solution);
    let q = energies(tnc, &embedding.solution, [0, 1]);
    let s = energies(tnc, &ising, [-1, 1]);
    let offset = 4 * q[0] - s[0];
    for (row, (q, s)) in q.iter().zip(&s).enumerate() {
        assert_eq!(4 * q - s, offset, "row {}", row);
    }
}

#[test]
fn test_analysis_gap_is_positive_for_real_tables() {
    for text in [AND, XOR, PRIORITIZED] {
        let tt = table(text);
        let analysis = analyze(tt.ncols(), &embed(&tt));
        assert!(analysis.gap > 0.0, "gap {} for\n{}", analysis.gap, text);
        assert_eq!(
            analysis.ranking.rows.len(),
            1 << (tt.ncols() + analysis.num_ancillae)
        );
    }
}

#[test]
fn test_single_level_table_has_zero_gap() {
    // Both rows sit at level 0, so the field on the only variable must vanish.
    let tt = table("0\n1\n");
    let analysis = analyze(tt.ncols(), &embed(&tt));
    assert_eq!(analysis.num_ancillae, 0);
    assert_eq!(analysis.ranking.distinct_energies.len(), 1);
    assert_eq!(analysis.gap, 0.0);
}

#[test]
fn test_narrow_integers_can_make_a_table_infeasible() {
    // Four strictly ordered levels use up every value of a 2-bit integer,
    // forcing k_0 = -2, while the all-zero row always has energy 0.
    let tt = table("0 0 !0\n0 1 !1\n1 0 !2\n1 1 !3\n");
    let narrow = VarisatConfig { int_width: 2 };
    let result = escalate::<VarisatSolver>(&tt, &SearchOptions::default(), &narrow);
    assert!(matches!(result, Err(EmbedError::SearchExhausted { .. })));

    // The same table needs no ancillae once coefficients have room, e.g.
    // h0 = 2, h1 = 1, J01 = 1.
    let wide = embed(&tt);
    assert_eq!(wide.num_ancillae, 0);
    assert_eq!(verify(&tt, &wide.solution, 0), Ok(()));
}

#[cfg(feature = "with-z3-binary-test")]
#[test]
fn test_xor_with_z3_binary() {
    use qubo_embed::solver::easy_smt_backend::{EasySmtConfig, EasySmtSolver};

    let tt = table(XOR);
    let embedding = escalate::<EasySmtSolver>(&tt, &SearchOptions::default(), &EasySmtConfig::z3())
        .unwrap_or_else(|e| panic!("embedding failed: {}", e));
    assert_eq!(embedding.num_ancillae, 1);
    assert_eq!(verify(&tt, &embedding.solution, 1), Ok(()));
}
