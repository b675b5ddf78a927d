//! Shared test utilities for `tseitin-core`.

use proptest::test_runner::Config as ProptestConfig;
use tseitin_test_support::ci::property_test_profile::ProptestRunProfile;

use crate::{cnf::CnfFormula, graph::Graph};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `TSEITIN_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Extends an edge assignment with the auxiliary chain values the encoder
/// would force, in the encoder's allocation order.
pub(crate) fn extend_edge_assignment(graph: &Graph, edge_values: &[bool]) -> Vec<bool> {
    let mut assignment = edge_values.to_vec();
    for vertex in 0..graph.vertex_count() {
        let mut incident = graph
            .incident_edges(vertex)
            .iter()
            .map(|&edge| edge_values[edge]);
        let Some(mut current) = incident.next() else {
            continue;
        };
        for value in incident {
            current ^= value;
            assignment.push(current);
        }
    }
    assignment
}

/// Decides satisfiability of a Tseitin formula by enumerating every edge
/// assignment. Auxiliary variables are functionally determined by the edge
/// variables, so this search is exhaustive. Only usable for small graphs.
pub(crate) fn exhaustively_satisfiable(graph: &Graph, formula: &CnfFormula) -> bool {
    let edge_count = graph.edges().len();
    assert!(edge_count < 24, "exhaustive search is limited to small graphs");
    (0_u32..(1 << edge_count)).any(|mask| {
        let edge_values: Vec<bool> = (0..edge_count).map(|bit| mask & (1 << bit) != 0).collect();
        formula.evaluate(&extend_edge_assignment(graph, &edge_values))
    })
}
