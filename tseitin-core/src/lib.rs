//! Tseitin core library.
//!
//! Generates simple d-regular graphs under three models (circulant lattice,
//! configuration model, small-world rewiring), encodes per-vertex parity
//! constraints over their edges as CNF, and serializes the result as DIMACS.
//!
//! ```
//! use rand::{SeedableRng, rngs::SmallRng};
//! use tseitin_core::{ChargeParity, GraphMode, encode, generate, random_charges};
//!
//! let mut rng = SmallRng::seed_from_u64(1);
//! let graph = generate(20, 3, GraphMode::ConfigurationModel, &mut rng)?;
//! let charges = random_charges(graph.vertex_count(), ChargeParity::Odd, &mut rng);
//! let formula = encode(&graph, &charges)?;
//! assert_eq!(formula.variable_count(), 30 + 20 * 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod charges;
mod cnf;
mod error;
mod graph;
mod parity;
mod seed;

#[cfg(test)]
mod test_utils;

pub use crate::{
    charges::{ChargeParity, charge_parity, random_charges, single_charge},
    cnf::{CnfFormula, Literal, TseitinEncoder, encode, write_dimacs, write_dimacs_file},
    error::{
        EncodeError, EncodeErrorCode, ErrorKind, GraphError, GraphErrorCode,
        GraphInvariantViolation,
    },
    graph::{Edge, GenerationLimits, Graph, GraphMode, RegularGraphGenerator, generate},
    parity::{connected_components, predict_satisfiable},
    seed::derive_seed,
};
