//! Structural checks run on every finished graph.

use std::collections::HashSet;

use crate::error::GraphInvariantViolation;

use super::Edge;

/// Verifies that `edges` and `incidence` describe a simple `degree`-regular
/// graph on `vertex_count` vertices, returning the first violation found.
///
/// Checks run in a fixed order: edge count, then per-edge range, loop,
/// orientation and uniqueness, then per-vertex degree and incidence.
pub(super) fn check_simple_regular(
    vertex_count: usize,
    degree: usize,
    edges: &[Edge],
    incidence: &[Vec<usize>],
) -> Result<(), GraphInvariantViolation> {
    let expected = vertex_count.saturating_mul(degree) / 2;
    if edges.len() != expected {
        return Err(GraphInvariantViolation::EdgeCount {
            expected,
            actual: edges.len(),
        });
    }

    let mut degrees = vec![0_usize; vertex_count];
    let mut seen = HashSet::with_capacity(edges.len());
    for edge in edges {
        check_edge(vertex_count, *edge)?;
        if !seen.insert(*edge) {
            return Err(GraphInvariantViolation::DuplicateEdge {
                first: edge.source,
                second: edge.target,
            });
        }
        degrees[edge.source] += 1;
        degrees[edge.target] += 1;
    }

    for (vertex, &actual) in degrees.iter().enumerate() {
        if actual != degree {
            return Err(GraphInvariantViolation::DegreeMismatch {
                vertex,
                expected: degree,
                actual,
            });
        }
    }

    check_incidence(degree, edges, incidence)
}

fn check_edge(vertex_count: usize, edge: Edge) -> Result<(), GraphInvariantViolation> {
    if edge.source >= vertex_count || edge.target >= vertex_count {
        return Err(GraphInvariantViolation::VertexOutOfRange {
            first: edge.source,
            second: edge.target,
            vertex_count,
        });
    }
    if edge.source == edge.target {
        return Err(GraphInvariantViolation::SelfLoop {
            vertex: edge.source,
        });
    }
    if edge.source > edge.target {
        return Err(GraphInvariantViolation::NonCanonicalEdge {
            first: edge.source,
            second: edge.target,
        });
    }
    Ok(())
}

fn check_incidence(
    degree: usize,
    edges: &[Edge],
    incidence: &[Vec<usize>],
) -> Result<(), GraphInvariantViolation> {
    for (vertex, listed) in incidence.iter().enumerate() {
        if listed.len() != degree {
            return Err(GraphInvariantViolation::DegreeMismatch {
                vertex,
                expected: degree,
                actual: listed.len(),
            });
        }
        for &index in listed {
            let touches = edges.get(index).is_some_and(|edge| edge.touches(vertex));
            if !touches {
                return Err(GraphInvariantViolation::IncidenceMismatch {
                    vertex,
                    edge: index,
                });
            }
        }
    }
    Ok(())
}
