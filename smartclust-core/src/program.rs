//! Set-partition integer program over the nodes of a cluster tree.
//!
//! Every node is a 0/1 variable. A point is covered by the nodes on its path
//! to the root, and a valid flat clustering selects exactly one of them for
//! every point. Minimising the negated node scores under those constraints
//! finds the globally best partition. No solver is bundled: the program can be
//! evaluated against a candidate selection or exported in CPLEX LP format for
//! an external solver.

use std::io::{self, Write};

use crate::{scoring::ScoreTable, tree::ClusterTree};

const TERMS_PER_LINE: usize = 8;

/// `minimise c·x subject to A x = 1, x ∈ {0, 1}` for one cluster tree.
///
/// # Examples
/// ```
/// use smartclust_core::{ClusterTree, LinkageRecord, NodeScorer, ScoreTable, SetPartitionProgram};
///
/// let tree = ClusterTree::build(&[LinkageRecord::new(0, 1, 2.0, 2)])?;
/// let program = SetPartitionProgram::from_tree(&tree, &ScoreTable::compute(&tree, &NodeScorer::default()));
/// assert_eq!(program.rows(), &[vec![0, 2], vec![1, 2]]);
/// assert!(program.is_feasible(&[true, true, false]));
/// assert!(!program.is_feasible(&[true, false, true]));
/// # Ok::<(), smartclust_core::MalformedTreeError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SetPartitionProgram {
    objective: Vec<f64>,
    rows: Vec<Vec<usize>>,
}

impl SetPartitionProgram {
    /// Builds the program for `tree` from its node scores.
    #[must_use]
    pub fn from_tree(tree: &ClusterTree, scores: &ScoreTable) -> Self {
        let objective = (0..tree.len())
            .map(|id| -scores.get(id).unwrap_or(0.0))
            .collect();
        let rows = (0..tree.n_points())
            .map(|point| {
                std::iter::successors(Some(point), |&id| tree.parent(id)).collect()
            })
            .collect();
        Self { objective, rows }
    }

    /// Objective coefficient of every variable, indexed by node id.
    #[must_use]
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// Covering variables of every point, leaf first and root last.
    #[must_use]
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Number of variables.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.objective.len()
    }

    /// Whether `selection` covers every point exactly once.
    #[must_use]
    pub fn is_feasible(&self, selection: &[bool]) -> bool {
        selection.len() == self.objective.len()
            && self.rows.iter().all(|row| {
                row.iter()
                    .filter(|&&var| selection.get(var).copied().unwrap_or(false))
                    .count()
                    == 1
            })
    }

    /// Objective value of a feasible `selection`, `None` when infeasible.
    #[must_use]
    pub fn evaluate(&self, selection: &[bool]) -> Option<f64> {
        if !self.is_feasible(selection) {
            return None;
        }
        Some(
            self.objective
                .iter()
                .zip(selection)
                .filter_map(|(coefficient, &chosen)| chosen.then_some(*coefficient))
                .sum(),
        )
    }

    /// Writes the program in CPLEX LP format.
    ///
    /// Variables are named `clust_<node id>` and constraints `_C<point + 1>`.
    ///
    /// # Errors
    /// Returns any error raised by `writer`.
    pub fn write_lp(&self, mut writer: impl Write) -> io::Result<()> {
        writeln!(writer, "\\* SmartClust *\\")?;
        writeln!(writer, "Minimize")?;
        write!(writer, "OBJ:")?;
        for (index, coefficient) in self.objective.iter().enumerate() {
            wrap_line(&mut writer, index)?;
            let sign = if coefficient.is_sign_negative() { '-' } else { '+' };
            write!(writer, " {sign} {} clust_{index}", coefficient.abs())?;
        }
        writeln!(writer)?;

        writeln!(writer, "Subject To")?;
        for (point, row) in self.rows.iter().enumerate() {
            write!(writer, "_C{}:", point + 1)?;
            for (position, var) in row.iter().enumerate() {
                wrap_line(&mut writer, position)?;
                let joiner = if position == 0 { "" } else { " +" };
                write!(writer, "{joiner} clust_{var}")?;
            }
            writeln!(writer, " = 1")?;
        }

        writeln!(writer, "Binaries")?;
        for index in 0..self.objective.len() {
            writeln!(writer, "clust_{index}")?;
        }
        writeln!(writer, "End")
    }
}

fn wrap_line(writer: &mut impl Write, position: usize) -> io::Result<()> {
    if position > 0 && position % TERMS_PER_LINE == 0 {
        writeln!(writer)?;
    }
    Ok(())
}
