//! Error types for the Tseitin core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and the coarse [`ErrorKind`] taxonomy callers use
//! to decide whether a failure is their fault, a statistical dead end, or a
//! generator defect.

use std::fmt;

use thiserror::Error;

use crate::graph::GraphMode;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Coarse classification shared by every error in the crate.
///
/// `InvalidParameter` is the caller's fault and is never retried.
/// `ConstructionFailure` means a randomized model ran out of attempts; a
/// caller may skip the instance or pick different parameters.
/// `InternalConsistency` means the generator produced something it must
/// never produce and should be treated as a fatal defect.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// Caller-supplied arguments violate a precondition.
    InvalidParameter,
    /// A randomized construction exhausted its attempt budget.
    ConstructionFailure,
    /// A post-construction invariant check failed.
    InternalConsistency,
}

impl ErrorKind {
    /// Returns a lowercase label suitable for structured logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParameter => "invalid_parameter",
            Self::ConstructionFailure => "construction_failure",
            Self::InternalConsistency => "internal_consistency",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural invariant of a regular graph that failed validation.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum GraphInvariantViolation {
    /// The edge list does not contain `n * d / 2` edges.
    #[error("expected {expected} edges but found {actual}")]
    EdgeCount {
        /// Edge count implied by the vertex count and degree.
        expected: usize,
        /// Edge count actually present.
        actual: usize,
    },
    /// An edge references a vertex outside `[0, n)`.
    #[error("edge ({first}, {second}) references a vertex outside 0..{vertex_count}")]
    VertexOutOfRange {
        /// Smaller endpoint as stored.
        first: usize,
        /// Larger endpoint as stored.
        second: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// An edge connects a vertex to itself.
    #[error("self-loop at vertex {vertex}")]
    SelfLoop {
        /// Vertex carrying the loop.
        vertex: usize,
    },
    /// An edge is not stored with its smaller endpoint first.
    #[error("edge ({first}, {second}) is not stored with its smaller endpoint first")]
    NonCanonicalEdge {
        /// First endpoint as stored.
        first: usize,
        /// Second endpoint as stored.
        second: usize,
    },
    /// The same undirected edge appears more than once.
    #[error("duplicate edge ({first}, {second})")]
    DuplicateEdge {
        /// Smaller endpoint of the repeated edge.
        first: usize,
        /// Larger endpoint of the repeated edge.
        second: usize,
    },
    /// A vertex does not touch exactly `d` edges.
    #[error("vertex {vertex} has degree {actual}, expected {expected}")]
    DegreeMismatch {
        /// Offending vertex.
        vertex: usize,
        /// Degree the graph was built for.
        expected: usize,
        /// Degree observed in the edge list.
        actual: usize,
    },
    /// The incidence index disagrees with the edge list.
    #[error("incidence list of vertex {vertex} references edge {edge} which does not touch it")]
    IncidenceMismatch {
        /// Vertex whose incidence list is wrong.
        vertex: usize,
        /// Edge index listed for the vertex.
        edge: usize,
    },
}

/// Errors produced while generating a regular graph.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum GraphError {
    /// A graph needs at least one vertex.
    #[error("number of vertices must be positive")]
    NoVertices,
    /// The requested degree is not below the vertex count.
    #[error("degree {degree} must be less than the number of vertices ({vertices})")]
    DegreeOutOfRange {
        /// Requested degree.
        degree: usize,
        /// Requested vertex count.
        vertices: usize,
    },
    /// `n * d` is odd, so no d-regular graph exists on `n` vertices.
    #[error(
        "n * d must be even: degree {degree} is odd and requires an even vertex count (got {vertices})"
    )]
    OddStubCount {
        /// Requested vertex count.
        vertices: usize,
        /// Requested degree.
        degree: usize,
    },
    /// Degree-preserving rewiring starts from a ring lattice and needs even `d`.
    #[error("watts_strogatz mode requires an even degree (got {degree})")]
    OddRewiringDegree {
        /// Requested degree.
        degree: usize,
    },
    /// The rewiring probability fell outside `[0, 1]`.
    #[error("rewiring probability must lie in [0, 1] (got {probability})")]
    InvalidRewireProbability {
        /// Supplied probability.
        probability: f64,
    },
    /// A retry limit was configured as zero.
    #[error("invalid generation limit: {reason}")]
    InvalidLimits {
        /// Which limit was rejected.
        reason: &'static str,
    },
    /// Every configuration-model attempt produced a loop or a multi-edge.
    #[error(
        "failed to generate a simple {degree}-regular graph on {vertices} vertices with the configuration model after {attempts} attempts"
    )]
    ConfigurationExhausted {
        /// Requested vertex count.
        vertices: usize,
        /// Requested degree.
        degree: usize,
        /// Attempts made before giving up.
        attempts: usize,
    },
    /// Rewiring could not reach its swap target within the attempt budget.
    #[error(
        "failed to rewire (n={vertices}, d={degree}, p={probability}, edges={edges}): performed {performed_swaps} of {target_swaps} swaps in {attempts} attempts"
    )]
    RewiringExhausted {
        /// Requested vertex count.
        vertices: usize,
        /// Requested degree.
        degree: usize,
        /// Requested rewiring probability.
        probability: f64,
        /// Number of edges in the lattice being rewired.
        edges: usize,
        /// Swaps the probability asked for.
        target_swaps: usize,
        /// Swaps actually accepted.
        performed_swaps: usize,
        /// Attempts made before giving up.
        attempts: usize,
    },
    /// The finished graph failed validation; this is a generator bug.
    #[error("graph validation failed (n={vertices}, d={degree}, mode={mode}): {violation}")]
    InvariantViolation {
        /// Vertex count of the rejected graph.
        vertices: usize,
        /// Degree of the rejected graph.
        degree: usize,
        /// Mode that produced the graph.
        mode: GraphMode,
        /// The first violated invariant.
        #[source]
        violation: GraphInvariantViolation,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// A graph needs at least one vertex.
        NoVertices => NoVertices => "GRAPH_NO_VERTICES",
        /// The requested degree is not below the vertex count.
        DegreeOutOfRange => DegreeOutOfRange { .. } => "GRAPH_DEGREE_OUT_OF_RANGE",
        /// `n * d` is odd.
        OddStubCount => OddStubCount { .. } => "GRAPH_ODD_STUB_COUNT",
        /// Rewiring needs an even degree.
        OddRewiringDegree => OddRewiringDegree { .. } => "GRAPH_ODD_REWIRING_DEGREE",
        /// The rewiring probability fell outside `[0, 1]`.
        InvalidRewireProbability => InvalidRewireProbability { .. } => "GRAPH_INVALID_REWIRE_PROBABILITY",
        /// A retry limit was configured as zero.
        InvalidLimits => InvalidLimits { .. } => "GRAPH_INVALID_LIMITS",
        /// Configuration-model attempts were exhausted.
        ConfigurationExhausted => ConfigurationExhausted { .. } => "GRAPH_CONFIGURATION_EXHAUSTED",
        /// Rewiring attempts were exhausted.
        RewiringExhausted => RewiringExhausted { .. } => "GRAPH_REWIRING_EXHAUSTED",
        /// The finished graph failed validation.
        InvariantViolation => InvariantViolation { .. } => "GRAPH_INVARIANT_VIOLATION",
    }
}

impl GraphError {
    /// Classifies the error for callers that only need to branch on blame.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoVertices
            | Self::DegreeOutOfRange { .. }
            | Self::OddStubCount { .. }
            | Self::OddRewiringDegree { .. }
            | Self::InvalidRewireProbability { .. }
            | Self::InvalidLimits { .. } => ErrorKind::InvalidParameter,
            Self::ConfigurationExhausted { .. } | Self::RewiringExhausted { .. } => {
                ErrorKind::ConstructionFailure
            }
            Self::InvariantViolation { .. } => ErrorKind::InternalConsistency,
        }
    }
}

/// Errors produced while building charge vectors or Tseitin formulas.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum EncodeError {
    /// The charge vector must hold exactly one entry per vertex.
    #[error("charge vector has {charges} entries but the graph has {vertices} vertices")]
    ChargeLengthMismatch {
        /// Length of the supplied charge vector.
        charges: usize,
        /// Vertex count of the graph.
        vertices: usize,
    },
    /// A charge was requested on a vertex the graph does not have.
    #[error("vertex {vertex} is out of range for {vertices} vertices")]
    ChargeVertexOutOfRange {
        /// Requested vertex.
        vertex: usize,
        /// Number of vertices available.
        vertices: usize,
    },
    /// Variable ids no longer fit in a signed DIMACS literal.
    #[error("variable id {requested} does not fit in a DIMACS literal")]
    VariableOverflow {
        /// The id that could not be represented.
        requested: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`EncodeError`] variants.
    enum EncodeErrorCode for EncodeError {
        /// The charge vector length differs from the vertex count.
        ChargeLengthMismatch => ChargeLengthMismatch { .. } => "ENCODE_CHARGE_LENGTH_MISMATCH",
        /// A charge was requested on a missing vertex.
        ChargeVertexOutOfRange => ChargeVertexOutOfRange { .. } => "ENCODE_CHARGE_VERTEX_OUT_OF_RANGE",
        /// Variable ids overflowed the literal type.
        VariableOverflow => VariableOverflow { .. } => "ENCODE_VARIABLE_OVERFLOW",
    }
}

impl EncodeError {
    /// Classifies the error; every encoder failure is a caller input problem.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ChargeLengthMismatch { .. }
            | Self::ChargeVertexOutOfRange { .. }
            | Self::VariableOverflow { .. } => ErrorKind::InvalidParameter,
        }
    }
}
