//! CNF formulas, the Tseitin parity encoder and DIMACS serialization.

mod dimacs;
mod tseitin;

#[cfg(test)]
mod tests;

pub use self::{
    dimacs::{write_dimacs, write_dimacs_file},
    tseitin::{TseitinEncoder, encode},
};

/// A signed DIMACS literal: the magnitude is a 1-based variable id and the
/// sign is the polarity.
pub type Literal = i64;

/// A formula in conjunctive normal form.
///
/// Every literal references a variable in `1..=variable_count`, and no clause
/// is empty.
///
/// # Examples
/// ```
/// use tseitin_core::{Graph, encode};
///
/// let graph = Graph::circulant(4, 2)?;
/// let formula = encode(&graph, &[false; 4])?;
/// assert_eq!(formula.variable_count(), 8);
/// assert!(formula.evaluate(&[false; 8]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CnfFormula {
    variable_count: usize,
    clauses: Vec<Vec<Literal>>,
}

impl CnfFormula {
    pub(crate) fn new(variable_count: usize, clauses: Vec<Vec<Literal>>) -> Self {
        Self {
            variable_count,
            clauses,
        }
    }

    /// Returns the number of allocated variables.
    #[must_use]
    #[rustfmt::skip]
    pub fn variable_count(&self) -> usize { self.variable_count }

    /// Returns the clauses in emission order.
    #[must_use]
    #[rustfmt::skip]
    pub fn clauses(&self) -> &[Vec<Literal>] { &self.clauses }

    /// Returns the number of clauses.
    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Returns the total number of literal occurrences.
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(Vec::len).sum()
    }

    /// Checks whether `assignment` satisfies every clause.
    ///
    /// `assignment[i]` is the value of variable `i + 1`. Variables beyond the
    /// end of the slice read as `false`.
    #[must_use]
    pub fn evaluate(&self, assignment: &[bool]) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|&literal| {
                let value = usize::try_from(literal.unsigned_abs())
                    .ok()
                    .and_then(|var| var.checked_sub(1))
                    .and_then(|index| assignment.get(index).copied())
                    .unwrap_or(false);
                value == (literal > 0)
            })
        })
    }

    /// Renders the formula as DIMACS text.
    #[must_use]
    pub fn to_dimacs_string(&self) -> String {
        self.to_string()
    }
}
