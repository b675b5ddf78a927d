//! Simple d-regular graphs and the randomized models that generate them.
//!
//! Graphs are stored as an arena of canonically oriented edges plus a
//! per-vertex incidence index into that arena. Every construction mode ends
//! in the same finalization step: sort the edges, rebuild the incidence index
//! and run the structural validator. A [`Graph`] handed out by this module
//! therefore always satisfies:
//!
//! - `edges().len() == n * d / 2`;
//! - every edge has `source() < target() < n`;
//! - no edge appears twice;
//! - every vertex touches exactly `d` edges.

mod circulant;
mod configuration;
mod limits;
mod rewire;
mod validate;


use std::fmt;

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::error::{GraphError, GraphInvariantViolation};

pub use self::limits::GenerationLimits;

/// An undirected edge stored with its smaller endpoint first.
///
/// Edges order lexicographically by `(source, target)`, which is the
/// canonical order of [`Graph::edges`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Edge {
    source: usize,
    target: usize,
}

impl Edge {
    /// Builds the canonical edge between `left` and `right`.
    ///
    /// Returns `None` for a self-loop.
    ///
    /// # Examples
    /// ```
    /// use tseitin_core::Edge;
    ///
    /// let edge = Edge::between(4, 1).expect("distinct endpoints");
    /// assert_eq!((edge.source(), edge.target()), (1, 4));
    /// assert!(Edge::between(2, 2).is_none());
    /// ```
    #[must_use]
    pub fn between(left: usize, right: usize) -> Option<Self> {
        match left.cmp(&right) {
            std::cmp::Ordering::Less => Some(Self {
                source: left,
                target: right,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                source: right,
                target: left,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Returns the smaller endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> usize { self.source }

    /// Returns the larger endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> usize { self.target }

    /// Returns `true` when `vertex` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, vertex: usize) -> bool {
        self.source == vertex || self.target == vertex
    }
}

/// Construction strategy used by [`generate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GraphMode {
    /// Ring lattice: vertex `u` joins `u + 1 ..= u + d/2` (mod `n`), plus its
    /// antipode when `d` is odd. With `relabel` set, a uniformly random
    /// permutation is applied to the vertex labels afterwards.
    Circulant {
        /// Apply a random vertex permutation after construction.
        relabel: bool,
    },
    /// Uniform stub pairing, rejecting any attempt that yields a loop or a
    /// multi-edge.
    ConfigurationModel,
    /// Relabeled ring lattice followed by degree-preserving double-edge
    /// swaps. At `rewire_probability == 1.0` the generator targets ten swaps
    /// per edge.
    WattsStrogatz {
        /// Fraction of the maximum swap budget to perform, in `[0, 1]`.
        rewire_probability: f64,
    },
}

impl GraphMode {
    /// Returns the stable label used in logs and file names.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Circulant { .. } => "circulant",
            Self::ConfigurationModel => "config_model",
            Self::WattsStrogatz { .. } => "watts_strogatz",
        }
    }

    /// Returns `true` when the mode draws from the random source.
    #[must_use]
    pub const fn is_randomized(&self) -> bool {
        !matches!(self, Self::Circulant { relabel: false })
    }
}

impl fmt::Display for GraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WattsStrogatz { rewire_probability } => {
                write!(f, "{}(p={rewire_probability})", self.label())
            }
            _ => f.write_str(self.label()),
        }
    }
}

/// A validated simple d-regular graph.
///
/// # Examples
/// ```
/// use tseitin_core::Graph;
///
/// let graph = Graph::circulant(6, 2).expect("6-cycle is valid");
/// assert_eq!(graph.edges().len(), 6);
/// assert_eq!(graph.incident_edges(0).len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    vertex_count: usize,
    degree: usize,
    mode: GraphMode,
    edges: Vec<Edge>,
    incidence: Vec<Vec<usize>>,
}

impl Graph {
    /// Builds the deterministic circulant graph without consuming randomness.
    ///
    /// # Errors
    /// Returns [`GraphError`] when `(n, d)` admits no simple d-regular graph.
    pub fn circulant(vertex_count: usize, degree: usize) -> Result<Self, GraphError> {
        let mode = GraphMode::Circulant { relabel: false };
        check_parameters(vertex_count, degree, mode)?;
        let edges = circulant::ring_lattice(vertex_count, degree);
        Self::finalize(vertex_count, degree, mode, edges)
    }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_count(&self) -> usize { self.vertex_count }

    /// Returns the common degree of every vertex.
    #[must_use]
    #[rustfmt::skip]
    pub fn degree(&self) -> usize { self.degree }

    /// Returns the mode that produced the graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn mode(&self) -> GraphMode { self.mode }

    /// Returns the edges in canonical order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Returns the indices into [`Graph::edges`] of the edges touching
    /// `vertex`, in ascending order. Unknown vertices have no edges.
    #[must_use]
    pub fn incident_edges(&self, vertex: usize) -> &[usize] {
        self.incidence.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// Returns the degree of every vertex as recorded by the incidence index.
    #[must_use]
    pub fn degree_sequence(&self) -> Vec<usize> {
        self.incidence.iter().map(Vec::len).collect()
    }

    /// Returns `true` when the graph contains the undirected edge `{u, v}`.
    #[must_use]
    pub fn contains_edge(&self, u: usize, v: usize) -> bool {
        Edge::between(u, v).is_some_and(|edge| self.edges.binary_search(&edge).is_ok())
    }

    /// Re-runs the structural validator against the stored graph.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] encountered.
    pub fn validate(&self) -> Result<(), GraphInvariantViolation> {
        validate::check_simple_regular(
            self.vertex_count,
            self.degree,
            &self.edges,
            &self.incidence,
        )
    }

    fn finalize(
        vertex_count: usize,
        degree: usize,
        mode: GraphMode,
        mut edges: Vec<Edge>,
    ) -> Result<Self, GraphError> {
        edges.sort_unstable();
        let incidence = build_incidence(vertex_count, &edges);
        validate::check_simple_regular(vertex_count, degree, &edges, &incidence).map_err(
            |violation| GraphError::InvariantViolation {
                vertices: vertex_count,
                degree,
                mode,
                violation,
            },
        )?;
        Ok(Self {
            vertex_count,
            degree,
            mode,
            edges,
            incidence,
        })
    }
}

/// Generates graphs with a configurable set of retry limits.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use tseitin_core::{GenerationLimits, GraphMode, RegularGraphGenerator};
///
/// let generator = RegularGraphGenerator::new(
///     GenerationLimits::default().with_configuration_attempts(50),
/// );
/// let mut rng = SmallRng::seed_from_u64(7);
/// let graph = generator
///     .generate(10, 3, GraphMode::ConfigurationModel, &mut rng)
///     .expect("a 3-regular graph on 10 vertices is easy to sample");
/// assert_eq!(graph.edges().len(), 15);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegularGraphGenerator {
    limits: GenerationLimits,
}

impl RegularGraphGenerator {
    /// Creates a generator that uses `limits` for its randomized modes.
    #[must_use]
    pub const fn new(limits: GenerationLimits) -> Self {
        Self { limits }
    }

    /// Returns the configured limits.
    #[must_use]
    pub const fn limits(&self) -> &GenerationLimits {
        &self.limits
    }

    /// Builds a simple `degree`-regular graph on `vertex_count` vertices.
    ///
    /// # Errors
    /// - [`ErrorKind::InvalidParameter`](crate::ErrorKind::InvalidParameter)
    ///   variants when `(n, d)` or the mode parameters are unusable;
    /// - [`GraphError::ConfigurationExhausted`] or
    ///   [`GraphError::RewiringExhausted`] when a randomized mode runs out of
    ///   attempts;
    /// - [`GraphError::InvariantViolation`] when the finished graph fails
    ///   validation.
    #[instrument(
        name = "graph.generate",
        err,
        skip_all,
        fields(vertices = vertex_count, degree = degree, mode = %mode),
    )]
    pub fn generate<R: Rng + ?Sized>(
        &self,
        vertex_count: usize,
        degree: usize,
        mode: GraphMode,
        rng: &mut R,
    ) -> Result<Graph, GraphError> {
        self.limits.check()?;
        check_parameters(vertex_count, degree, mode)?;

        let edges = match mode {
            GraphMode::Circulant { relabel } => {
                let lattice = circulant::ring_lattice(vertex_count, degree);
                if relabel {
                    let permutation = circulant::random_permutation(vertex_count, rng);
                    relabel_or_fail(vertex_count, degree, mode, &lattice, &permutation)?
                } else {
                    lattice
                }
            }
            GraphMode::ConfigurationModel => configuration::pair_stubs(
                vertex_count,
                degree,
                self.limits.configuration_attempts(),
                rng,
            )?,
            GraphMode::WattsStrogatz { rewire_probability } => {
                let lattice = circulant::ring_lattice(vertex_count, degree);
                if lattice.is_empty() {
                    debug!("empty lattice, skipping rewiring");
                    lattice
                } else {
                    let permutation = circulant::random_permutation(vertex_count, rng);
                    let relabeled =
                        relabel_or_fail(vertex_count, degree, mode, &lattice, &permutation)?;
                    rewire::rewire(
                        rewire::RewireRequest {
                            vertex_count,
                            degree,
                            probability: rewire_probability,
                        },
                        relabeled,
                        &self.limits,
                        rng,
                    )?
                }
            }
        };

        let graph = Graph::finalize(vertex_count, degree, mode, edges)?;
        info!(edges = graph.edges.len(), "graph generated");
        Ok(graph)
    }
}

/// Builds a simple `degree`-regular graph with the default limits.
///
/// # Errors
/// See [`RegularGraphGenerator::generate`].
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use tseitin_core::{GraphMode, generate};
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let graph = generate(12, 4, GraphMode::WattsStrogatz { rewire_probability: 0.5 }, &mut rng)
///     .expect("rewiring a 4-regular lattice on 12 vertices succeeds");
/// assert!(graph.degree_sequence().iter().all(|&d| d == 4));
/// ```
pub fn generate<R: Rng + ?Sized>(
    vertex_count: usize,
    degree: usize,
    mode: GraphMode,
    rng: &mut R,
) -> Result<Graph, GraphError> {
    RegularGraphGenerator::default().generate(vertex_count, degree, mode, rng)
}

fn check_parameters(vertex_count: usize, degree: usize, mode: GraphMode) -> Result<(), GraphError> {
    if vertex_count == 0 {
        return Err(GraphError::NoVertices);
    }
    if degree >= vertex_count {
        return Err(GraphError::DegreeOutOfRange {
            degree,
            vertices: vertex_count,
        });
    }
    if degree % 2 == 1 && vertex_count % 2 == 1 {
        return Err(GraphError::OddStubCount {
            vertices: vertex_count,
            degree,
        });
    }
    if let GraphMode::WattsStrogatz { rewire_probability } = mode {
        if degree % 2 != 0 {
            return Err(GraphError::OddRewiringDegree { degree });
        }
        if !(0.0..=1.0).contains(&rewire_probability) {
            return Err(GraphError::InvalidRewireProbability {
                probability: rewire_probability,
            });
        }
    }
    Ok(())
}

fn relabel_or_fail(
    vertex_count: usize,
    degree: usize,
    mode: GraphMode,
    edges: &[Edge],
    permutation: &[usize],
) -> Result<Vec<Edge>, GraphError> {
    circulant::relabel(edges, permutation).map_err(|violation| GraphError::InvariantViolation {
        vertices: vertex_count,
        degree,
        mode,
        violation,
    })
}

fn build_incidence(vertex_count: usize, edges: &[Edge]) -> Vec<Vec<usize>> {
    let mut incidence = vec![Vec::new(); vertex_count];
    for (index, edge) in edges.iter().enumerate() {
        for endpoint in [edge.source, edge.target] {
            if let Some(list) = incidence.get_mut(endpoint) {
                list.push(index);
            }
        }
    }
    incidence
}
