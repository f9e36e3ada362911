//! Command implementations and argument parsing for the smartclust CLI.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use smartclust_core::{
    ClusterTree, DEFAULT_STIFFNESS, FlatClustering, LinkageRecord, NodeId, RootBaseline,
    Smartclust, SmartclustBuilder, SmartclustError, colouring,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::linkage_file::{LinkageFileError, parse_linkage};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "smartclust",
    about = "Flatten a hierarchical clustering tree into plausible flat clusters."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Output format requested by the command.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        match &self.command {
            Command::Flatten(flatten) => flatten.format,
        }
    }
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Select flat clusters from a linkage file.
    Flatten(FlattenCommand),
}

/// Options accepted by the `flatten` command.
#[derive(Debug, Args, Clone)]
pub struct FlattenCommand {
    /// Linkage file with one `left right distance count` record per line.
    pub path: PathBuf,

    /// Exponent rewarding clusters that hold about half of the points.
    #[arg(long, default_value_t = DEFAULT_STIFFNESS, allow_negative_numbers = true)]
    pub stiffness: f64,

    /// Distance standing in for the root's missing parent merge.
    #[arg(long = "root-baseline", value_enum, default_value_t = BaselineArg::MaxDistance)]
    pub root_baseline: BaselineArg,

    /// Root distance used with `--root-baseline fixed`.
    #[arg(
        long = "root-distance",
        required_if_eq("root_baseline", "fixed"),
        allow_negative_numbers = true
    )]
    pub root_distance: Option<f64>,

    /// Summary format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the set-partition program in CPLEX LP format to this path.
    #[arg(long = "lp-output")]
    pub lp_output: Option<PathBuf>,
}

/// Root baselines selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BaselineArg {
    /// Largest merge distance in the tree.
    MaxDistance,
    /// Zero, which always prefers at least two clusters.
    Zero,
    /// The value of `--root-distance`.
    Fixed,
}

/// Summary formats written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the linkage file or writing the LP file failed.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The linkage file was not in the expected text layout.
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        /// Linkage file being parsed.
        path: PathBuf,
        /// Line-level parse failure.
        #[source]
        source: LinkageFileError,
    },
    /// `--root-baseline fixed` was given without `--root-distance`.
    #[error("`--root-baseline fixed` requires `--root-distance`")]
    MissingRootDistance,
    /// Flattening failed.
    #[error(transparent)]
    Core(#[from] SmartclustError),
    /// Writing the summary failed.
    #[error("failed to write summary: {0}")]
    Output(#[source] io::Error),
    /// Serialising the JSON summary failed.
    #[error("failed to serialise summary: {0}")]
    Serialise(#[from] serde_json::Error),
}

/// One flat cluster in an [`ExecutionSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    /// Tree node heading the cluster.
    pub head: usize,
    /// Dendrogram colour assigned to the cluster.
    pub colour: &'static str,
    /// Number of points in the cluster.
    pub size: usize,
}

/// Outcome of a `flatten` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionSummary {
    /// Name derived from the linkage file.
    pub source: String,
    /// Number of points in the tree.
    pub points: usize,
    /// Sum of the selected clusters' scores.
    pub total_score: f64,
    /// Clusters in left-to-right tree order.
    pub clusters: Vec<ClusterSummary>,
    /// Cluster head of every point.
    pub assignments: Vec<usize>,
    /// Where the LP program was written, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lp_output: Option<PathBuf>,
}

impl ExecutionSummary {
    /// Summarises `clustering` of the linkage read from `source`.
    #[must_use]
    pub fn from_clustering(source: String, clustering: &FlatClustering) -> Self {
        let mut sizes: BTreeMap<NodeId, usize> = BTreeMap::new();
        for head in clustering.assignments() {
            *sizes.entry(*head).or_default() += 1;
        }
        let clusters = clustering
            .cluster_heads()
            .iter()
            .enumerate()
            .map(|(index, head)| ClusterSummary {
                head: head.get(),
                colour: colouring::head_colour(index),
                size: sizes.get(head).copied().unwrap_or_default(),
            })
            .collect();
        Self {
            source,
            points: clustering.assignments().len(),
            total_score: clustering.total_score(),
            clusters,
            assignments: clustering.assignments().iter().map(|id| id.get()).collect(),
            lp_output: None,
        }
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading, parsing or flattening fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use smartclust_cli::cli::{BaselineArg, Cli, Command, FlattenCommand, OutputFormat, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0 1 1.0 2\n2 3 1.0 2\n4 5 5.0 4\n")?;
/// let cli = Cli {
///     command: Command::Flatten(FlattenCommand {
///         path: file.path().to_path_buf(),
///         stiffness: 1.0,
///         root_baseline: BaselineArg::MaxDistance,
///         root_distance: None,
///         format: OutputFormat::Text,
///         lp_output: None,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.assignments, vec![4, 4, 5, 5]);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Flatten(flatten) => {
            Span::current().record("command", field::display("flatten"));
            run_flatten(flatten)
        }
    }
}

#[instrument(
    name = "cli.flatten",
    err,
    skip(command),
    fields(path = %command.path.display(), stiffness = command.stiffness, root_baseline = ?command.root_baseline),
)]
pub(super) fn run_flatten(command: FlattenCommand) -> Result<ExecutionSummary, CliError> {
    let smartclust = build_smartclust(&command)?;
    let records = read_linkage_file(&command.path)?;
    let (tree, clustering) = smartclust.flatten_with_tree(&records)?;

    let mut summary =
        ExecutionSummary::from_clustering(derive_source_name(&command.path), &clustering);
    if let Some(path) = command.lp_output {
        write_program(&smartclust, &tree, &path)?;
        summary.lp_output = Some(path);
    }

    info!(
        source = summary.source.as_str(),
        clusters = summary.clusters.len(),
        total_score = summary.total_score,
        "command completed"
    );
    Ok(summary)
}

pub(super) fn build_smartclust(command: &FlattenCommand) -> Result<Smartclust, CliError> {
    let baseline = match (command.root_baseline, command.root_distance) {
        (BaselineArg::MaxDistance, _) => RootBaseline::MaxDistance,
        (BaselineArg::Zero, _) => RootBaseline::Zero,
        (BaselineArg::Fixed, Some(distance)) => RootBaseline::Fixed(distance),
        (BaselineArg::Fixed, None) => return Err(CliError::MissingRootDistance),
    };
    Ok(SmartclustBuilder::new()
        .with_stiffness(command.stiffness)
        .with_root_baseline(baseline)
        .build()?)
}

#[instrument(name = "cli.read_linkage", err, fields(records = field::Empty))]
pub(super) fn read_linkage_file(path: &Path) -> Result<Vec<LinkageRecord>, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_linkage(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Span::current().record("records", records.len());
    Ok(records)
}

#[instrument(name = "cli.write_lp", err, skip(smartclust, tree))]
fn write_program(smartclust: &Smartclust, tree: &ClusterTree, path: &Path) -> Result<(), CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    smartclust.program(tree).write_lp(&mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)
}

pub(super) fn derive_source_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "linkage".to_owned(), ToOwned::to_owned)
}

/// Renders `summary` to `writer` in the requested `format`.
///
/// # Errors
/// Returns [`CliError::Output`] or [`CliError::Serialise`] when writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use smartclust_cli::cli::{ClusterSummary, ExecutionSummary, OutputFormat, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     source: "demo".into(),
///     points: 2,
///     total_score: 0.0,
///     clusters: vec![ClusterSummary { head: 2, colour: "#FFC312", size: 2 }],
///     assignments: vec![2, 2],
///     lp_output: None,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, OutputFormat::Text, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.contains("clusters: 1"));
/// assert!(text.ends_with("1\t2\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(
    summary: &ExecutionSummary,
    format: OutputFormat,
    mut writer: impl Write,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => render_text(summary, &mut writer).map_err(CliError::Output),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, summary)?;
            writeln!(writer).map_err(CliError::Output)
        }
    }
}

fn render_text(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "source: {}", summary.source)?;
    writeln!(writer, "points: {}", summary.points)?;
    writeln!(writer, "clusters: {}", summary.clusters.len())?;
    writeln!(writer, "total score: {}", summary.total_score)?;
    if let Some(path) = &summary.lp_output {
        writeln!(writer, "lp program: {}", path.display())?;
    }
    for cluster in &summary.clusters {
        writeln!(
            writer,
            "head {}\t{}\t{} points",
            cluster.head, cluster.colour, cluster.size
        )?;
    }
    for (point, head) in summary.assignments.iter().enumerate() {
        writeln!(writer, "{point}\t{head}")?;
    }
    Ok(())
}
