//! Configuration-model sampling with whole-attempt rejection.

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};
use tracing::debug;

use crate::error::GraphError;

use super::Edge;

/// Pairs shuffled vertex stubs until an attempt yields a simple graph.
///
/// Each attempt starts from the same ordered stub list (vertex `v` repeated
/// `degree` times) so the random stream alone decides the outcome. Any loop
/// or repeated pair discards the whole attempt.
pub(super) fn pair_stubs<R: Rng + ?Sized>(
    vertex_count: usize,
    degree: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<Edge>, GraphError> {
    let stub_count = vertex_count * degree;
    let mut stubs = Vec::with_capacity(stub_count);
    let mut seen = HashSet::with_capacity(stub_count / 2);

    for attempt in 1..=max_attempts {
        stubs.clear();
        for vertex in 0..vertex_count {
            stubs.extend(std::iter::repeat_n(vertex, degree));
        }
        stubs.shuffle(rng);

        seen.clear();
        if let Some(edges) = try_pairing(&stubs, &mut seen) {
            debug!(attempt, "configuration model accepted pairing");
            return Ok(edges);
        }
    }

    Err(GraphError::ConfigurationExhausted {
        vertices: vertex_count,
        degree,
        attempts: max_attempts,
    })
}

fn try_pairing(stubs: &[usize], seen: &mut HashSet<Edge>) -> Option<Vec<Edge>> {
    let mut edges = Vec::with_capacity(stubs.len() / 2);
    for pair in stubs.chunks_exact(2) {
        let &[u, v] = pair else {
            return None;
        };
        let edge = Edge::between(u, v)?;
        if !seen.insert(edge) {
            return None;
        }
        edges.push(edge);
    }
    Some(edges)
}
