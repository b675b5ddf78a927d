//! Degree-preserving double-edge swaps for the small-world model.

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::error::GraphError;

use super::{Edge, GenerationLimits};

/// Parameters of one rewiring run.
#[derive(Clone, Copy, Debug)]
pub(super) struct RewireRequest {
    pub(super) vertex_count: usize,
    pub(super) degree: usize,
    pub(super) probability: f64,
}

/// Live adjacency used to reject swaps that would create a multi-edge.
struct Adjacency {
    neighbours: Vec<HashSet<usize>>,
}

impl Adjacency {
    fn from_edges(vertex_count: usize, degree: usize, edges: &[Edge]) -> Self {
        let mut neighbours = vec![HashSet::with_capacity(degree); vertex_count];
        for edge in edges {
            neighbours[edge.source].insert(edge.target);
            neighbours[edge.target].insert(edge.source);
        }
        Self { neighbours }
    }

    fn contains(&self, edge: Edge) -> bool {
        self.neighbours
            .get(edge.source)
            .is_some_and(|set| set.contains(&edge.target))
    }

    fn remove(&mut self, edge: Edge) {
        self.neighbours[edge.source].remove(&edge.target);
        self.neighbours[edge.target].remove(&edge.source);
    }

    fn insert(&mut self, edge: Edge) {
        self.neighbours[edge.source].insert(edge.target);
        self.neighbours[edge.target].insert(edge.source);
    }
}

/// Number of swaps requested for `edge_count` edges at `probability`.
pub(super) fn target_swaps(edge_count: usize, probability: f64, swaps_per_edge: usize) -> usize {
    let max_swaps = edge_count.saturating_mul(swaps_per_edge);
    (probability * max_swaps as f64).round() as usize
}

/// Applies `round(p * swaps_per_edge * |E|)` accepted double-edge swaps.
///
/// Each attempt draws two edge indices and, when the edges are disjoint, a
/// pattern bit choosing between `{(a, c), (b, d)}` and `{(a, d), (b, c)}`.
/// A swap is accepted only when neither replacement edge already exists.
/// Replacements are written back at the original indices.
pub(super) fn rewire<R: Rng + ?Sized>(
    request: RewireRequest,
    mut edges: Vec<Edge>,
    limits: &GenerationLimits,
    rng: &mut R,
) -> Result<Vec<Edge>, GraphError> {
    let target = target_swaps(edges.len(), request.probability, limits.swaps_per_edge());
    if target == 0 {
        debug!("rewiring target is zero, keeping lattice");
        return Ok(edges);
    }

    let max_attempts = limits.rewire_attempts(target);
    let mut adjacency = Adjacency::from_edges(request.vertex_count, request.degree, &edges);
    let mut swaps = 0_usize;
    let mut attempts = 0_usize;

    while attempts < max_attempts && swaps < target {
        attempts += 1;
        let first = rng.gen_range(0..edges.len());
        let second = rng.gen_range(0..edges.len());
        if first == second {
            continue;
        }

        let Edge {
            source: a,
            target: b,
        } = edges[first];
        let Edge {
            source: c,
            target: d,
        } = edges[second];
        if a == c || a == d || b == c || b == d {
            continue;
        }

        let (left, right) = if rng.gen_bool(0.5) {
            (Edge::between(a, d), Edge::between(b, c))
        } else {
            (Edge::between(a, c), Edge::between(b, d))
        };
        let (Some(left), Some(right)) = (left, right) else {
            continue;
        };
        if left == right || adjacency.contains(left) || adjacency.contains(right) {
            continue;
        }

        adjacency.remove(edges[first]);
        adjacency.remove(edges[second]);
        adjacency.insert(left);
        adjacency.insert(right);
        edges[first] = left;
        edges[second] = right;
        swaps += 1;
    }

    if swaps < target {
        return Err(GraphError::RewiringExhausted {
            vertices: request.vertex_count,
            degree: request.degree,
            probability: request.probability,
            edges: edges.len(),
            target_swaps: target,
            performed_swaps: swaps,
            attempts,
        });
    }

    debug!(swaps, attempts, "rewiring reached target");
    Ok(edges)
}
