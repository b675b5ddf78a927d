//! Tseitin parity formulas over graph edges.
//!
//! Each edge becomes a boolean variable and each vertex asserts that the XOR
//! of its incident edge variables equals its charge. The XOR is expanded as a
//! left-associative chain of three-variable gates, so a vertex of degree `k`
//! costs `k - 1` auxiliary variables and `4 (k - 1) + 1` clauses.
//!
//! The resulting formula is unsatisfiable exactly when some connected
//! component carries an odd number of true charges.

use tracing::{debug, instrument};

use crate::{error::EncodeError, graph::Graph};

use super::{CnfFormula, Literal};

/// Incremental builder for Tseitin parity formulas.
///
/// Variable ids are allocated sequentially from 1: all edge variables first
/// (in edge order), then auxiliary chain variables vertex by vertex.
#[derive(Debug)]
pub struct TseitinEncoder {
    next_variable: Literal,
    clauses: Vec<Vec<Literal>>,
}

impl Default for TseitinEncoder {
    fn default() -> Self {
        Self {
            next_variable: 1,
            clauses: Vec::new(),
        }
    }
}

impl TseitinEncoder {
    /// Creates an encoder with no allocated variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the parity formula for `graph` with one charge per vertex.
    ///
    /// The encoder is reset first, so one instance can be reused.
    ///
    /// # Errors
    /// Returns [`EncodeError::ChargeLengthMismatch`] when `charges` does not
    /// hold one entry per vertex, and [`EncodeError::VariableOverflow`] if the
    /// variable count exceeds the literal range.
    ///
    /// # Examples
    /// ```
    /// use tseitin_core::{Graph, TseitinEncoder};
    ///
    /// let graph = Graph::circulant(6, 2)?;
    /// let mut encoder = TseitinEncoder::new();
    /// let formula = encoder.build(&graph, &[false; 6])?;
    /// assert_eq!(formula.variable_count(), 12);
    /// assert_eq!(formula.clause_count(), 30);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[instrument(
        name = "cnf.encode",
        err,
        skip_all,
        fields(vertices = graph.vertex_count(), edges = graph.edges().len()),
    )]
    pub fn build(&mut self, graph: &Graph, charges: &[bool]) -> Result<CnfFormula, EncodeError> {
        if charges.len() != graph.vertex_count() {
            return Err(EncodeError::ChargeLengthMismatch {
                charges: charges.len(),
                vertices: graph.vertex_count(),
            });
        }

        self.next_variable = 1;
        self.clauses.clear();

        let edge_variables = (0..graph.edges().len())
            .map(|_| self.new_variable())
            .collect::<Result<Vec<_>, _>>()?;

        for (vertex, &charge) in charges.iter().enumerate() {
            let mut incident = graph
                .incident_edges(vertex)
                .iter()
                .map(|&edge| edge_variables[edge]);
            let Some(first) = incident.next() else {
                continue;
            };

            let mut current = first;
            for operand in incident {
                let gate = self.new_variable()?;
                self.add_xor(current, operand, gate);
                current = gate;
            }
            self.clauses.push(vec![if charge { current } else { -current }]);
        }

        let variable_count = usize::try_from(self.next_variable - 1).map_err(|_| {
            EncodeError::VariableOverflow {
                requested: usize::MAX,
            }
        })?;
        debug!(
            variables = variable_count,
            clauses = self.clauses.len(),
            "tseitin formula built"
        );
        Ok(CnfFormula::new(variable_count, std::mem::take(&mut self.clauses)))
    }

    fn new_variable(&mut self) -> Result<Literal, EncodeError> {
        let variable = self.next_variable;
        self.next_variable = variable
            .checked_add(1)
            .ok_or(EncodeError::VariableOverflow {
                requested: usize::try_from(variable).unwrap_or(usize::MAX),
            })?;
        Ok(variable)
    }

    /// Adds the four clauses forcing `z = x XOR y`.
    fn add_xor(&mut self, x: Literal, y: Literal, z: Literal) {
        self.clauses.push(vec![-x, -y, -z]);
        self.clauses.push(vec![-x, y, z]);
        self.clauses.push(vec![x, -y, z]);
        self.clauses.push(vec![x, y, -z]);
    }
}

/// Builds the parity formula for `graph` with a fresh encoder.
///
/// # Errors
/// See [`TseitinEncoder::build`].
pub fn encode(graph: &Graph, charges: &[bool]) -> Result<CnfFormula, EncodeError> {
    TseitinEncoder::new().build(graph, charges)
}
