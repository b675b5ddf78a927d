//! Ring-lattice construction and vertex relabeling.

use rand::{Rng, seq::SliceRandom};

use crate::error::GraphInvariantViolation;

use super::Edge;

/// Connects every vertex to the next `degree / 2` vertices around the ring
/// and, for odd `degree`, to its antipode.
///
/// Callers must have rejected `degree >= vertex_count` and the odd/odd case;
/// under those preconditions no offset collides with its mirror image, so the
/// lattice is simple and regular.
pub(super) fn ring_lattice(vertex_count: usize, degree: usize) -> Vec<Edge> {
    let half = degree / 2;
    let mut edges = Vec::with_capacity(vertex_count * degree / 2);
    for offset in 1..=half {
        for u in 0..vertex_count {
            let v = (u + offset) % vertex_count;
            edges.extend(Edge::between(u, v));
        }
    }

    if degree % 2 == 1 {
        let offset = vertex_count / 2;
        for u in 0..vertex_count {
            let v = (u + offset) % vertex_count;
            if u < v {
                edges.extend(Edge::between(u, v));
            }
        }
    }
    edges
}

/// Draws a uniformly random permutation of `0..vertex_count`.
pub(super) fn random_permutation<R: Rng + ?Sized>(vertex_count: usize, rng: &mut R) -> Vec<usize> {
    let mut permutation: Vec<usize> = (0..vertex_count).collect();
    permutation.shuffle(rng);
    permutation
}

/// Maps every endpoint through `permutation`, keeping edge order.
///
/// A permutation cannot merge two distinct endpoints, so a self-loop here
/// means the permutation itself is broken.
pub(super) fn relabel(
    edges: &[Edge],
    permutation: &[usize],
) -> Result<Vec<Edge>, GraphInvariantViolation> {
    edges
        .iter()
        .map(|edge| {
            let (Some(&u), Some(&v)) = (permutation.get(edge.source), permutation.get(edge.target))
            else {
                return Err(GraphInvariantViolation::VertexOutOfRange {
                    first: edge.source,
                    second: edge.target,
                    vertex_count: permutation.len(),
                });
            };
            Edge::between(u, v).ok_or(GraphInvariantViolation::SelfLoop { vertex: u })
        })
        .collect()
}
