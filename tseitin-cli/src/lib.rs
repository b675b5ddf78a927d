//! Support library for the `tseitin` binary.
//!
//! Exposes the command pipeline, logging setup and solver runner so tests can
//! drive them without spawning the binary.

pub mod cli;
pub mod logging;
pub mod solver;
