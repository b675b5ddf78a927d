//! Satisfiability prediction from the Tseitin parity argument.
//!
//! Summing every vertex constraint of one connected component counts each
//! internal edge twice, so the left-hand side cancels and the component is
//! consistent only if its charges sum to zero modulo two. The converse also
//! holds, which makes the prediction exact.

use crate::{error::EncodeError, graph::Graph};

/// Sequential union-find with path halving and union by size.
struct DisjointSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSets {
    fn new(count: usize) -> Self {
        Self {
            parent: (0..count).collect(),
            size: vec![1; count],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            let grandparent = self.parent[self.parent[node]];
            self.parent[node] = grandparent;
            node = grandparent;
        }
        node
    }

    fn union(&mut self, left: usize, right: usize) {
        let mut left_root = self.find(left);
        let mut right_root = self.find(right);
        if left_root == right_root {
            return;
        }
        if self.size[left_root] < self.size[right_root] {
            std::mem::swap(&mut left_root, &mut right_root);
        }
        self.parent[right_root] = left_root;
        self.size[left_root] += self.size[right_root];
    }
}

/// Labels every vertex with the index of its connected component.
///
/// Component indices are dense and assigned in order of each component's
/// smallest vertex.
///
/// # Examples
/// ```
/// use tseitin_core::{Graph, connected_components};
///
/// let graph = Graph::circulant(4, 2)?;
/// assert_eq!(connected_components(&graph), vec![0, 0, 0, 0]);
/// # Ok::<(), tseitin_core::GraphError>(())
/// ```
#[must_use]
pub fn connected_components(graph: &Graph) -> Vec<usize> {
    let mut sets = DisjointSets::new(graph.vertex_count());
    for edge in graph.edges() {
        sets.union(edge.source(), edge.target());
    }

    let mut labels = vec![usize::MAX; graph.vertex_count()];
    let mut component_of_root = vec![usize::MAX; graph.vertex_count()];
    let mut next = 0;
    for vertex in 0..graph.vertex_count() {
        let root = sets.find(vertex);
        if component_of_root[root] == usize::MAX {
            component_of_root[root] = next;
            next += 1;
        }
        labels[vertex] = component_of_root[root];
    }
    labels
}

/// Predicts whether the Tseitin formula of `graph` and `charges` is
/// satisfiable: it is iff every connected component has an even charge sum.
///
/// Isolated vertices carry no constraint in the encoding, so their charges
/// are ignored.
///
/// # Errors
/// Returns [`EncodeError::ChargeLengthMismatch`] when `charges` does not
/// hold one entry per vertex.
///
/// # Examples
/// ```
/// use tseitin_core::{Graph, predict_satisfiable};
///
/// let graph = Graph::circulant(6, 2)?;
/// assert!(predict_satisfiable(&graph, &[false; 6])?);
/// assert!(!predict_satisfiable(&graph, &[true, false, false, false, false, false])?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn predict_satisfiable(graph: &Graph, charges: &[bool]) -> Result<bool, EncodeError> {
    if charges.len() != graph.vertex_count() {
        return Err(EncodeError::ChargeLengthMismatch {
            charges: charges.len(),
            vertices: graph.vertex_count(),
        });
    }

    let labels = connected_components(graph);
    let components = labels.iter().max().map_or(0, |max| max + 1);
    let mut odd = vec![false; components];
    for (vertex, (&label, &charge)) in labels.iter().zip(charges).enumerate() {
        if !graph.incident_edges(vertex).is_empty() {
            odd[label] ^= charge;
        }
    }
    Ok(odd.iter().all(|&is_odd| !is_odd))
}
