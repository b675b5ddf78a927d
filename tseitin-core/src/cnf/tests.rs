//! Unit tests for the Tseitin encoder and DIMACS output.

use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};
use rstest::rstest;
use tseitin_test_support::tracing::RecordingLayer;

use crate::{
    charges::{ChargeParity, random_charges, single_charge},
    error::EncodeError,
    graph::{Graph, GraphMode, generate},
    parity::predict_satisfiable,
    test_utils::{exhaustively_satisfiable, extend_edge_assignment, suite_proptest_config},
};

use super::{CnfFormula, TseitinEncoder, encode, write_dimacs, write_dimacs_file};

const FOUR_CYCLE_DIMACS: &str = "\
p cnf 8 20
-1 -2 -5 0
-1 2 5 0
1 -2 5 0
1 2 -5 0
-5 0
-1 -3 -6 0
-1 3 6 0
1 -3 6 0
1 3 -6 0
-6 0
-3 -4 -7 0
-3 4 7 0
3 -4 7 0
3 4 -7 0
-7 0
-2 -4 -8 0
-2 4 8 0
2 -4 8 0
2 4 -8 0
-8 0
";

#[test]
fn four_cycle_serializes_exactly() {
    let graph = Graph::circulant(4, 2).expect("4-cycle is valid");
    let formula = encode(&graph, &[false; 4]).expect("charges match");
    assert_eq!(formula.to_dimacs_string(), FOUR_CYCLE_DIMACS);
}

#[test]
fn display_and_writer_render_the_same_text() {
    let graph = Graph::circulant(4, 2).expect("4-cycle is valid");
    let formula = encode(&graph, &[true, false, false, false]).expect("charges match");

    let mut bytes = Vec::new();
    write_dimacs(&formula, &mut bytes).expect("writing to a Vec succeeds");
    let written = String::from_utf8(bytes).expect("DIMACS is ASCII");

    assert_eq!(formula.to_string(), written);
    assert_eq!(formula.to_dimacs_string(), written);
    assert!(written.starts_with("p cnf 8 20\n"));
}

#[test]
fn charged_vertex_gets_positive_unit() {
    let graph = Graph::circulant(4, 2).expect("4-cycle is valid");
    let charges = single_charge(4, 2).expect("vertex 2 exists");
    let formula = encode(&graph, &charges).expect("charges match");
    let units: Vec<_> = formula
        .clauses()
        .iter()
        .filter(|clause| clause.len() == 1)
        .map(|clause| clause[0])
        .collect();
    assert_eq!(units, vec![-5, -6, 7, -8]);
}

#[rstest]
#[case::cycle(6, 2)]
#[case::cubic(8, 3)]
#[case::quartic(9, 4)]
fn sizes_follow_degree(#[case] vertices: usize, #[case] degree: usize) {
    let graph = Graph::circulant(vertices, degree).expect("valid parameters");
    let formula = encode(&graph, &vec![false; vertices]).expect("charges match");
    let edges = vertices * degree / 2;
    assert_eq!(formula.variable_count(), edges + vertices * (degree - 1));
    assert_eq!(formula.clause_count(), vertices * (4 * (degree - 1) + 1));
    assert_eq!(
        formula.literal_count(),
        vertices * (12 * (degree - 1) + 1)
    );
}

#[test]
fn all_false_assignment_satisfies_uncharged_cycle() {
    let graph = Graph::circulant(6, 2).expect("6-cycle is valid");
    let formula = encode(&graph, &[false; 6]).expect("charges match");
    assert_eq!(formula.variable_count(), 12);
    assert_eq!(formula.clause_count(), 30);
    assert!(formula.evaluate(&[false; 12]));
}

#[test]
fn single_charge_on_cycle_is_unsatisfiable() {
    let graph = Graph::circulant(6, 2).expect("6-cycle is valid");
    let charges = single_charge(6, 0).expect("vertex 0 exists");
    let formula = encode(&graph, &charges).expect("charges match");
    assert!(!exhaustively_satisfiable(&graph, &formula));
    assert_eq!(predict_satisfiable(&graph, &charges), Ok(false));
}

#[test]
fn two_charges_on_cycle_are_satisfiable() {
    let graph = Graph::circulant(6, 2).expect("6-cycle is valid");
    let mut charges = [false; 6];
    charges[1] = true;
    charges[4] = true;
    let formula = encode(&graph, &charges).expect("charges match");
    assert!(exhaustively_satisfiable(&graph, &formula));
}

#[test]
fn circulant_cubic_graph_with_one_charge_is_unsatisfiable() {
    let graph = Graph::circulant(8, 3).expect("8-vertex cubic circulant is valid");
    let charges = single_charge(8, 0).expect("vertex 0 exists");

    let formula = encode(&graph, &charges).expect("charges match");
    assert_eq!(formula.variable_count(), 28);
    assert_eq!(formula.clause_count(), 72);
    assert_eq!(predict_satisfiable(&graph, &charges), Ok(false));
    assert!(!exhaustively_satisfiable(&graph, &formula));
}

#[test]
fn cubic_graph_with_odd_charges_is_unsatisfiable() {
    let mut rng = SmallRng::seed_from_u64(8);
    let graph = generate(8, 3, GraphMode::ConfigurationModel, &mut rng).expect("valid graph");
    let charges = random_charges(8, ChargeParity::Odd, &mut rng);

    let formula = encode(&graph, &charges).expect("charges match");
    assert_eq!(formula.variable_count(), 28);
    assert_eq!(formula.clause_count(), 72);
    assert_eq!(predict_satisfiable(&graph, &charges), Ok(false));
    assert!(!exhaustively_satisfiable(&graph, &formula));
}

#[test]
fn rejects_mismatched_charge_length() {
    let graph = Graph::circulant(6, 2).expect("6-cycle is valid");
    let err = encode(&graph, &[false; 5]).expect_err("one charge is missing");
    assert_eq!(
        err,
        EncodeError::ChargeLengthMismatch {
            charges: 5,
            vertices: 6,
        }
    );
}

#[test]
fn isolated_vertices_add_nothing() {
    let graph = Graph::circulant(3, 0).expect("edgeless graph is valid");
    let formula = encode(&graph, &[true, false, true]).expect("charges match");
    assert_eq!(formula, CnfFormula::default());
    assert_eq!(formula.to_dimacs_string(), "p cnf 0 0\n");
    assert_eq!(predict_satisfiable(&graph, &[true, false, true]), Ok(true));
}

#[test]
fn encoder_can_be_reused() {
    let cycle = Graph::circulant(6, 2).expect("6-cycle is valid");
    let cubic = Graph::circulant(8, 3).expect("cubic graph is valid");
    let mut encoder = TseitinEncoder::new();

    let first = encoder.build(&cubic, &[false; 8]).expect("charges match");
    let second = encoder.build(&cycle, &[false; 6]).expect("charges match");
    assert_eq!(first.variable_count(), 28);
    assert_eq!(second, encode(&cycle, &[false; 6]).expect("charges match"));
}

#[test]
fn evaluate_treats_missing_variables_as_false() {
    let formula = CnfFormula::new(3, vec![vec![-1, 2], vec![-3]]);
    assert!(formula.evaluate(&[]));
    assert!(formula.evaluate(&[true, true]));
    assert!(!formula.evaluate(&[true]));
    assert!(!formula.evaluate(&[false, false, true]));
}

#[test]
fn writes_dimacs_file() {
    let graph = Graph::circulant(4, 2).expect("4-cycle is valid");
    let formula = encode(&graph, &[false; 4]).expect("charges match");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cycle.cnf");

    write_dimacs_file(&formula, &path).expect("file is writable");
    let written = std::fs::read_to_string(&path).expect("file is readable");
    assert_eq!(written, FOUR_CYCLE_DIMACS);
}

#[test]
fn write_dimacs_propagates_writer_errors() {
    struct Broken;

    impl std::io::Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let graph = Graph::circulant(4, 2).expect("4-cycle is valid");
    let formula = encode(&graph, &[false; 4]).expect("charges match");
    let err = write_dimacs(&formula, Broken).expect_err("writer fails");
    assert_eq!(err.to_string(), "disk full");
}

#[test]
fn encode_and_generate_emit_spans() {
    let layer = RecordingLayer::default();
    let (result, recorded) = layer.capture(|| -> Result<usize, String> {
        let mut rng = SmallRng::seed_from_u64(3);
        let graph = generate(10, 3, GraphMode::ConfigurationModel, &mut rng)
            .map_err(|err| err.to_string())?;
        let formula = encode(&graph, &[false; 10]).map_err(|err| err.to_string())?;
        Ok(formula.variable_count())
    });
    assert_eq!(result, Ok(35));

    let generate_span = recorded.span_named("graph.generate").expect("generate span");
    assert_eq!(generate_span.field("vertices"), Some("10"));
    assert_eq!(generate_span.field("degree"), Some("3"));
    assert_eq!(generate_span.field("mode"), Some("config_model"));

    let encode_span = recorded.span_named("cnf.encode").expect("encode span");
    assert_eq!(encode_span.field("edges"), Some("15"));
    assert_eq!(recorded.events_with_message("tseitin formula built").len(), 1);
}

#[test]
fn encode_error_is_recorded_on_span() {
    let layer = RecordingLayer::default();
    let graph = Graph::circulant(4, 2).expect("4-cycle is valid");
    let (result, recorded) = layer.capture(|| encode(&graph, &[true]));
    assert!(result.is_err());
    let errors: Vec<_> = recorded
        .events()
        .into_iter()
        .filter(|event| event.level == tracing::Level::ERROR)
        .collect();
    assert_eq!(errors.len(), 1);
}

proptest! {
    #![proptest_config(suite_proptest_config(48))]

    #[test]
    fn prediction_matches_exhaustive_search(
        half in 2_usize..6,
        degree in 2_usize..4,
        seed in any::<u64>(),
        odd in any::<bool>(),
    ) {
        let vertices = half * 2;
        let mut rng = SmallRng::seed_from_u64(seed);
        let graph = generate(vertices, degree, GraphMode::Circulant { relabel: true }, &mut rng)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let parity = if odd { ChargeParity::Odd } else { ChargeParity::Even };
        let charges = random_charges(vertices, parity, &mut rng);
        let formula = encode(&graph, &charges)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assume!(graph.edges().len() < 16);
        let predicted = predict_satisfiable(&graph, &charges)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(predicted, exhaustively_satisfiable(&graph, &formula));
    }

    #[test]
    fn aux_chain_satisfies_gate_clauses(
        vertices in 4_usize..12,
        seed in any::<u64>(),
    ) {
        // Any edge assignment extended with its forced chain values satisfies
        // every gate clause, so only the unit clauses decide the outcome.
        let graph = Graph::circulant(vertices, 2)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let formula = encode(&graph, &vec![false; vertices])
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let edge_values: Vec<bool> = (0..graph.edges().len())
            .map(|_| rand::Rng::gen_bool(&mut rng, 0.5))
            .collect();
        let assignment = extend_edge_assignment(&graph, &edge_values);
        prop_assert_eq!(assignment.len(), formula.variable_count());
        let gates_hold = formula
            .clauses()
            .iter()
            .filter(|clause| clause.len() == 3)
            .all(|clause| CnfFormula::new(formula.variable_count(), vec![clause.clone()])
                .evaluate(&assignment));
        prop_assert!(gates_hold);
    }
}
