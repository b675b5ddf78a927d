//! Vertex charge assignments for Tseitin formulas.

use std::fmt;

use rand::Rng;

use crate::error::EncodeError;

/// Parity of the number of true charges.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ChargeParity {
    /// An even number of charged vertices.
    Even,
    /// An odd number of charged vertices; on a connected graph this makes the
    /// Tseitin formula unsatisfiable.
    Odd,
}

impl fmt::Display for ChargeParity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Even => "even",
            Self::Odd => "odd",
        })
    }
}

/// Returns the parity of the number of `true` entries.
///
/// # Examples
/// ```
/// use tseitin_core::{ChargeParity, charge_parity};
///
/// assert_eq!(charge_parity(&[true, false, true]), ChargeParity::Even);
/// assert_eq!(charge_parity(&[true]), ChargeParity::Odd);
/// ```
#[must_use]
pub fn charge_parity(charges: &[bool]) -> ChargeParity {
    let odd = charges.iter().fold(false, |acc, &charge| acc ^ charge);
    if odd { ChargeParity::Odd } else { ChargeParity::Even }
}

/// Draws a fair coin per vertex, then flips vertex 0 if needed so the total
/// matches `parity`.
///
/// An empty vector is returned unchanged for `vertex_count == 0`, even when
/// odd parity was requested.
pub fn random_charges<R: Rng + ?Sized>(
    vertex_count: usize,
    parity: ChargeParity,
    rng: &mut R,
) -> Vec<bool> {
    let mut charges: Vec<bool> = (0..vertex_count).map(|_| rng.gen_bool(0.5)).collect();
    if charge_parity(&charges) != parity {
        if let Some(first) = charges.first_mut() {
            *first = !*first;
        }
    }
    charges
}

/// Returns all-false charges except for `vertex`.
///
/// # Errors
/// Returns [`EncodeError::ChargeVertexOutOfRange`] when `vertex >= vertex_count`.
///
/// # Examples
/// ```
/// use tseitin_core::single_charge;
///
/// assert_eq!(single_charge(3, 1)?, vec![false, true, false]);
/// assert!(single_charge(3, 3).is_err());
/// # Ok::<(), tseitin_core::EncodeError>(())
/// ```
pub fn single_charge(vertex_count: usize, vertex: usize) -> Result<Vec<bool>, EncodeError> {
    let mut charges = vec![false; vertex_count];
    let slot = charges
        .get_mut(vertex)
        .ok_or(EncodeError::ChargeVertexOutOfRange {
            vertex,
            vertices: vertex_count,
        })?;
    *slot = true;
    Ok(charges)
}
