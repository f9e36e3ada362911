//! Unit tests for the CLI commands and summary rendering.

use super::commands::{build_smartclust, derive_source_name, read_linkage_file, run_flatten};
use super::test_helpers::{
    TWO_PAIRS, create_linkage_file, flatten_command, run_flatten_expecting_error, temp_dir,
};
use super::{
    BaselineArg, Cli, CliError, Command, ExecutionSummary, LinkageFileError, OutputFormat,
    render_summary, run_cli,
};

use std::fs;
use std::path::Path;

use clap::Parser;
use rstest::rstest;
use smartclust_core::{MalformedTreeErrorCode, RootBaseline, SmartclustError, colouring};
use smartclust_test_support::tracing::RecordingLayer;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
#[case::stem_with_extension("/tmp/tree.linkage", "tree")]
#[case::stem_without_extension("/tmp/tree", "tree")]
#[case::missing_stem("", "linkage")]
fn derive_source_name_uses_the_file_stem(#[case] raw_path: &str, #[case] expected: &str) {
    assert_eq!(derive_source_name(Path::new(raw_path)), expected);
}

#[rstest]
fn flatten_splits_two_tight_pairs() -> TestResult {
    let dir = temp_dir();
    let path = create_linkage_file(&dir, "pairs.txt", TWO_PAIRS)?;
    let cli = Cli {
        command: Command::Flatten(flatten_command(&path)),
    };
    let summary = run_cli(cli)?;
    assert_eq!(summary.source, "pairs");
    assert_eq!(summary.points, 4);
    assert_eq!(summary.assignments, vec![4, 4, 5, 5]);
    assert_eq!(summary.total_score, 16.0);
    let heads: Vec<(usize, usize)> = summary
        .clusters
        .iter()
        .map(|cluster| (cluster.head, cluster.size))
        .collect();
    assert_eq!(heads, vec![(4, 2), (5, 2)]);
    assert_eq!(summary.clusters[1].colour, colouring::PALETTE[1]);
    Ok(())
}

#[rstest]
fn flatten_reads_savetxt_layout() -> TestResult {
    let dir = temp_dir();
    let contents = "0.000000000000000000e+00 1.000000000000000000e+00 1.000000000000000000e+00 2.000000000000000000e+00\n\
                    3.000000000000000000e+00 2.000000000000000000e+00 3.500000000000000000e+00 3.000000000000000000e+00\n";
    let path = create_linkage_file(&dir, "scipy.txt", contents)?;
    let mut command = flatten_command(&path);
    command.stiffness = 0.0;
    let summary = run_flatten(command)?;
    assert_eq!(summary.assignments, vec![3, 3, 2]);
    Ok(())
}

#[rstest]
fn empty_file_flattens_a_single_point() -> TestResult {
    let dir = temp_dir();
    let path = create_linkage_file(&dir, "empty.txt", "# no merges\n")?;
    let summary = run_flatten(flatten_command(&path))?;
    assert_eq!(summary.assignments, vec![0]);
    assert_eq!(summary.total_score, 0.0);
    Ok(())
}

#[rstest]
#[case::max_distance(BaselineArg::MaxDistance, None, RootBaseline::MaxDistance)]
#[case::zero(BaselineArg::Zero, Some(7.0), RootBaseline::Zero)]
#[case::fixed(BaselineArg::Fixed, Some(7.0), RootBaseline::Fixed(7.0))]
fn baseline_flags_map_onto_the_builder(
    #[case] baseline: BaselineArg,
    #[case] root_distance: Option<f64>,
    #[case] expected: RootBaseline,
) -> TestResult {
    let mut command = flatten_command(Path::new("unused.txt"));
    command.root_baseline = baseline;
    command.root_distance = root_distance;
    assert_eq!(build_smartclust(&command)?.root_baseline(), expected);
    Ok(())
}

#[rstest]
fn fixed_baseline_requires_a_distance() {
    let mut command = flatten_command(Path::new("unused.txt"));
    command.root_baseline = BaselineArg::Fixed;
    let err = run_flatten_expecting_error(command, "missing root distance must fail");
    assert!(matches!(err, CliError::MissingRootDistance));
}

#[rstest]
fn negative_stiffness_is_rejected_before_reading() {
    let mut command = flatten_command(Path::new("does-not-exist.txt"));
    command.stiffness = -1.0;
    let err = run_flatten_expecting_error(command, "negative stiffness must fail");
    assert!(matches!(
        err,
        CliError::Core(SmartclustError::InvalidConfiguration(_))
    ));
}

#[rstest]
fn missing_file_is_an_io_error() {
    let dir = temp_dir();
    let command = flatten_command(&dir.path().join("missing.txt"));
    let err = run_flatten_expecting_error(command, "missing file must fail");
    assert!(matches!(err, CliError::Io { .. }));
}

#[rstest]
fn parse_errors_carry_the_line_number() -> TestResult {
    let dir = temp_dir();
    let path = create_linkage_file(&dir, "broken.txt", "0 1 1.0 2\n2 x 1.0 2\n")?;
    let err = read_linkage_file(&path).expect_err("column 2 is not a number");
    match err {
        CliError::Parse { source, .. } => assert_eq!(
            source,
            LinkageFileError::InvalidNumber {
                line: 2,
                column: 2,
                value: "x".to_owned(),
            }
        ),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[rstest]
fn malformed_tree_surfaces_the_core_code() -> TestResult {
    let dir = temp_dir();
    let path = create_linkage_file(&dir, "cycle.txt", "0 1 1.0 2\n1 2 2.0 2\n")?;
    let err = run_flatten_expecting_error(flatten_command(&path), "shared child must fail");
    match err {
        CliError::Core(core) => {
            assert_eq!(core.tree_code(), Some(MalformedTreeErrorCode::DuplicateChild));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[rstest]
fn lp_output_is_written_next_to_the_summary() -> TestResult {
    let dir = temp_dir();
    let path = create_linkage_file(&dir, "pairs.txt", TWO_PAIRS)?;
    let lp_path = dir.path().join("pairs.lp");
    let mut command = flatten_command(&path);
    command.lp_output = Some(lp_path.clone());

    let summary = run_flatten(command)?;
    assert_eq!(summary.lp_output.as_deref(), Some(lp_path.as_path()));

    let program = fs::read_to_string(&lp_path)?;
    assert!(program.starts_with("\\* SmartClust *\\\nMinimize\n"));
    assert!(program.contains("_C1: clust_0 + clust_4 + clust_6 = 1"));
    assert!(program.contains("Binaries\n"));
    assert!(program.ends_with("End\n"));
    Ok(())
}

#[rstest]
fn lp_output_reuses_the_flattened_tree() -> TestResult {
    let dir = temp_dir();
    let path = create_linkage_file(&dir, "pairs.txt", TWO_PAIRS)?;
    let mut command = flatten_command(&path);
    command.lp_output = Some(dir.path().join("pairs.lp"));
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || run_flatten(command))?;

    let builds = layer
        .spans()
        .iter()
        .filter(|span| span.name == "core.tree.build")
        .count();
    assert_eq!(builds, 1);
    assert!(layer.span_named("cli.write_lp").is_some());
    Ok(())
}

fn two_pair_summary() -> Result<ExecutionSummary, Box<dyn std::error::Error>> {
    let dir = temp_dir();
    let path = create_linkage_file(&dir, "pairs.txt", TWO_PAIRS)?;
    Ok(run_flatten(flatten_command(&path))?)
}

#[rstest]
fn render_text_lists_heads_then_points() -> TestResult {
    let summary = two_pair_summary()?;
    let mut buffer = Vec::new();
    render_summary(&summary, OutputFormat::Text, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    let expected = "source: pairs\n\
                    points: 4\n\
                    clusters: 2\n\
                    total score: 16\n\
                    head 4\t#FFC312\t2 points\n\
                    head 5\t#C4E538\t2 points\n\
                    0\t4\n\
                    1\t4\n\
                    2\t5\n\
                    3\t5\n";
    assert_eq!(text, expected);
    Ok(())
}

#[rstest]
fn render_json_serialises_the_summary() -> TestResult {
    let summary = two_pair_summary()?;
    let mut buffer = Vec::new();
    render_summary(&summary, OutputFormat::Json, &mut buffer)?;
    let value: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(value["source"], "pairs");
    assert_eq!(value["assignments"], serde_json::json!([4, 4, 5, 5]));
    assert_eq!(value["clusters"][0]["colour"], "#FFC312");
    assert_eq!(value["clusters"][1]["size"], 2);
    assert!(value.get("lp_output").is_none());
    Ok(())
}

#[rstest]
#[case::defaults(&["smartclust", "flatten", "tree.txt"], true)]
#[case::all_flags(
    &[
        "smartclust", "flatten", "tree.txt", "--stiffness", "2.5", "--root-baseline", "fixed",
        "--root-distance", "9", "--format", "json", "--lp-output", "tree.lp",
    ],
    true,
)]
#[case::fixed_without_distance(
    &["smartclust", "flatten", "tree.txt", "--root-baseline", "fixed"],
    false,
)]
#[case::unknown_baseline(
    &["smartclust", "flatten", "tree.txt", "--root-baseline", "median"],
    false,
)]
#[case::unknown_format(&["smartclust", "flatten", "tree.txt", "--format", "xml"], false)]
#[case::negative_root_distance(
    &["smartclust", "flatten", "tree.txt", "--root-baseline", "fixed", "--root-distance", "-3"],
    true,
)]
#[case::negative_stiffness(&["smartclust", "flatten", "tree.txt", "--stiffness", "-1"], true)]
fn clap_validates_flatten_flags(#[case] args: &[&str], #[case] accepted: bool) {
    assert_eq!(Cli::try_parse_from(args).is_ok(), accepted);
}

#[rstest]
fn negative_root_distance_reaches_the_builder() -> TestResult {
    let cli = Cli::try_parse_from([
        "smartclust",
        "flatten",
        "tree.txt",
        "--root-baseline",
        "fixed",
        "--root-distance",
        "-3",
    ])?;
    let Command::Flatten(command) = cli.command;
    assert_eq!(command.root_distance, Some(-3.0));
    assert_eq!(build_smartclust(&command)?.root_baseline(), RootBaseline::Fixed(-3.0));
    Ok(())
}

#[rstest]
fn negative_stiffness_flag_reports_the_configuration_code() -> TestResult {
    let cli = Cli::try_parse_from(["smartclust", "flatten", "tree.txt", "--stiffness", "-1"])?;
    let Command::Flatten(command) = cli.command;
    let err = run_flatten_expecting_error(command, "negative stiffness must fail");
    match err {
        CliError::Core(SmartclustError::InvalidConfiguration(inner)) => {
            assert_eq!(inner.code().as_str(), "CONFIG_INVALID_STIFFNESS");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[rstest]
fn clap_defaults_match_the_library() -> TestResult {
    let cli = Cli::try_parse_from(["smartclust", "flatten", "tree.txt"])?;
    assert_eq!(cli.output_format(), OutputFormat::Text);
    let Command::Flatten(command) = cli.command;
    assert_eq!(command.stiffness, smartclust_core::DEFAULT_STIFFNESS);
    assert_eq!(command.root_baseline, BaselineArg::MaxDistance);
    assert!(command.lp_output.is_none());
    Ok(())
}

#[rstest]
fn run_flatten_emits_tracing_fields() -> TestResult {
    let dir = temp_dir();
    let path = create_linkage_file(&dir, "pairs.txt", TWO_PAIRS)?;
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let summary =
        tracing::subscriber::with_default(subscriber, || run_flatten(flatten_command(&path)))?;
    assert_eq!(summary.clusters.len(), 2);

    let flatten = layer.span_named("cli.flatten").expect("cli.flatten span must exist");
    assert!(
        flatten
            .fields
            .get("path")
            .is_some_and(|value| value.ends_with("pairs.txt"))
    );
    assert_eq!(flatten.fields.get("root_baseline"), Some(&"MaxDistance".to_owned()));

    let read = layer.span_named("cli.read_linkage").expect("cli.read_linkage span must exist");
    assert_eq!(read.fields.get("records"), Some(&"3".to_owned()));
    assert!(layer.span_named("core.flatten").is_some());

    let completed = layer.events_with_message("command completed");
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].level, Level::INFO);
    assert_eq!(completed[0].fields.get("source"), Some(&"pairs".to_owned()));
    assert_eq!(completed[0].fields.get("clusters"), Some(&"2".to_owned()));
    Ok(())
}

#[rstest]
fn failed_read_is_logged_as_an_error() -> TestResult {
    let dir = temp_dir();
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let command = flatten_command(&dir.path().join("missing.txt"));

    let err = tracing::subscriber::with_default(subscriber, || run_flatten(command))
        .expect_err("missing file must fail");
    assert!(matches!(err, CliError::Io { .. }));
    assert!(layer.events().iter().any(|event| event.level == Level::ERROR));
    assert!(layer.events_with_message("command completed").is_empty());
    Ok(())
}
