//! End-to-end checks of the generate, charge, encode and write pipeline.

use rand::{SeedableRng, rngs::SmallRng};
use rstest::rstest;
use tseitin_core::{
    ChargeParity, GraphMode, charge_parity, connected_components, derive_seed, encode,
    generate, predict_satisfiable, random_charges, write_dimacs_file,
};

fn build_instance(
    base_seed: u64,
    vertices: usize,
    degree: usize,
    trial: u64,
    mode: GraphMode,
) -> (Vec<bool>, String) {
    let mut rng = SmallRng::seed_from_u64(derive_seed(base_seed, vertices, degree, trial));
    let graph = generate(vertices, degree, mode, &mut rng).expect("instance must generate");
    let charges = random_charges(vertices, ChargeParity::Odd, &mut rng);
    let formula = encode(&graph, &charges).expect("charges match");
    (charges, formula.to_dimacs_string())
}

#[test]
fn cubic_instance_writes_expected_header() {
    let mut rng = SmallRng::seed_from_u64(derive_seed(1, 8, 3, 0));
    let graph = generate(8, 3, GraphMode::ConfigurationModel, &mut rng).expect("valid graph");
    let charges = random_charges(8, ChargeParity::Odd, &mut rng);
    assert_eq!(charge_parity(&charges), ChargeParity::Odd);

    let formula = encode(&graph, &charges).expect("charges match");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("n8_d3_trial0.cnf");
    write_dimacs_file(&formula, &path).expect("file is writable");

    let text = std::fs::read_to_string(&path).expect("file is readable");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("p cnf 28 72"));
    assert_eq!(lines.clone().count(), 72);
    assert!(lines.all(|line| line.ends_with(" 0")));
    assert_eq!(predict_satisfiable(&graph, &charges), Ok(false));
}

#[rstest]
#[case::circulant(GraphMode::Circulant { relabel: true })]
#[case::config_model(GraphMode::ConfigurationModel)]
#[case::watts_strogatz(GraphMode::WattsStrogatz { rewire_probability: 0.3 })]
fn instances_are_reproducible_from_coordinates(#[case] mode: GraphMode) {
    let first = build_instance(42, 30, 4, 2, mode);
    let again = build_instance(42, 30, 4, 2, mode);
    let next_trial = build_instance(42, 30, 4, 3, mode);
    assert_eq!(first, again);
    assert_ne!(first, next_trial);
}

#[test]
fn odd_charges_on_connected_graph_are_unsatisfiable() {
    let mut rng = SmallRng::seed_from_u64(17);
    for _ in 0..20 {
        let graph = generate(24, 3, GraphMode::ConfigurationModel, &mut rng).expect("valid graph");
        let charges = random_charges(24, ChargeParity::Odd, &mut rng);
        let components = connected_components(&graph);
        if components.iter().all(|&component| component == 0) {
            assert_eq!(predict_satisfiable(&graph, &charges), Ok(false));
        }
    }
}

#[test]
fn disconnected_perfect_matching_depends_on_every_component() {
    // A 1-regular graph is a perfect matching: each edge is its own component.
    let mut rng = SmallRng::seed_from_u64(5);
    let graph = generate(6, 1, GraphMode::ConfigurationModel, &mut rng).expect("valid graph");
    assert_eq!(connected_components(&graph).iter().max(), Some(&2));

    let even_everywhere = vec![false; 6];
    assert_eq!(predict_satisfiable(&graph, &even_everywhere), Ok(true));

    let first = graph.edges()[0];
    let second = graph.edges()[1];
    let mut charges = vec![false; 6];
    charges[first.source()] = true;
    charges[second.source()] = true;
    assert_eq!(charge_parity(&charges), ChargeParity::Even);
    assert_eq!(predict_satisfiable(&graph, &charges), Ok(false));
}
