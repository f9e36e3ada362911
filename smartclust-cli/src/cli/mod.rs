//! Command-line interface orchestration for smartclust.
//!
//! The `flatten` command reads a linkage file, selects its flat clusters and
//! reports them as text or JSON, optionally exporting the equivalent
//! set-partition program for an external solver.

mod commands;
mod linkage_file;

pub use commands::{
    BaselineArg, Cli, CliError, ClusterSummary, Command, ExecutionSummary, FlattenCommand,
    OutputFormat, render_summary, run_cli,
};
pub use linkage_file::{LinkageFileError, parse_linkage};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
