//! DIMACS CNF serialization.

use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use super::CnfFormula;

/// Writes `formula` in DIMACS CNF format.
///
/// The header is `p cnf <variables> <clauses>`; each clause follows on its
/// own line as space-separated literals terminated by `0`.
///
/// # Errors
/// Returns any [`io::Error`] raised by `writer`.
///
/// # Examples
/// ```
/// use tseitin_core::{Graph, encode, write_dimacs};
///
/// let graph = Graph::circulant(2, 1)?;
/// let formula = encode(&graph, &[true, false])?;
/// let mut out = Vec::new();
/// write_dimacs(&formula, &mut out)?;
/// assert_eq!(String::from_utf8(out)?, "p cnf 1 2\n1 0\n-1 0\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_dimacs(formula: &CnfFormula, mut writer: impl Write) -> io::Result<()> {
    write!(writer, "{formula}")?;
    writer.flush()
}

impl fmt::Display for CnfFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.variable_count(), self.clause_count())?;
        for clause in self.clauses() {
            for literal in clause {
                write!(f, "{literal} ")?;
            }
            f.write_str("0\n")?;
        }
        Ok(())
    }
}

/// Creates (or truncates) `path` and writes `formula` to it.
///
/// # Errors
/// Returns any [`io::Error`] raised while creating or writing the file.
pub fn write_dimacs_file(formula: &CnfFormula, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_dimacs(formula, BufWriter::new(file))
}
