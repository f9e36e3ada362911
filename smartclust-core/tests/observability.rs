mod common;

use common::records;
use rstest::rstest;
use smartclust_core::{LinkageRecord, SmartclustBuilder};
use smartclust_test_support::tracing::RecordingLayer;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
fn flatten_records_spans_and_summary_event() -> TestResult {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let smartclust = SmartclustBuilder::new().build()?;
    let rows = records(&[(0, 1, 1.0, 2), (2, 3, 1.0, 2), (4, 5, 5.0, 4)]);

    let clustering = tracing::subscriber::with_default(subscriber, || smartclust.flatten(&rows))?;
    assert_eq!(clustering.cluster_count(), 2);

    let flatten = layer.span_named("core.flatten").expect("flatten span recorded");
    assert_eq!(flatten.fields.get("links").map(String::as_str), Some("3"));
    assert_eq!(flatten.fields.get("stiffness").map(String::as_str), Some("1"));
    assert_eq!(
        flatten.fields.get("root_baseline").map(String::as_str),
        Some("MaxDistance")
    );

    let build = layer.span_named("core.tree.build").expect("build span recorded");
    assert_eq!(build.fields.get("links").map(String::as_str), Some("3"));
    let score = layer.span_named("core.score").expect("score span recorded");
    assert_eq!(score.fields.get("nodes").map(String::as_str), Some("7"));

    let events = layer.events_with_message("flattened linkage tree");
    assert_eq!(events.len(), 1);
    let summary = &events[0];
    assert_eq!(summary.level, Level::INFO);
    assert_eq!(summary.fields.get("points").map(String::as_str), Some("4"));
    assert_eq!(summary.fields.get("clusters").map(String::as_str), Some("2"));
    assert_eq!(summary.fields.get("total_score").map(String::as_str), Some("16"));
    Ok(())
}

#[rstest]
fn decreasing_distances_are_warned_about() -> TestResult {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let smartclust = SmartclustBuilder::new().build()?;
    let rows = [
        LinkageRecord::new(0, 1, 3.0, 2),
        LinkageRecord::new(3, 2, 1.0, 3),
    ];

    tracing::subscriber::with_default(subscriber, || smartclust.flatten(&rows))?;

    assert!(
        layer
            .events()
            .iter()
            .any(|event| event.level == Level::WARN
                && event
                    .message()
                    .is_some_and(|message| message.contains("merge distances decrease")))
    );
    Ok(())
}

#[rstest]
fn rejected_linkage_emits_an_error_event() -> TestResult {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let smartclust = SmartclustBuilder::new().build()?;
    let rows = [LinkageRecord::new(0, 1, 1.0, 5)];

    let result = tracing::subscriber::with_default(subscriber, || smartclust.flatten(&rows));
    assert!(result.is_err());

    assert!(layer.events().iter().any(|event| event.level == Level::ERROR));
    assert!(layer.events_with_message("flattened linkage tree").is_empty());
    Ok(())
}
