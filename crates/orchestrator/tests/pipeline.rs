use std::time::Duration;

use analyzer::{Sentiment, SentimentResult, SUMMARY_FAILED};
use common::config::{HackerNewsConfig, LlmConfig, OutputConfig};
use common::Config;
use hacker_news::Topic;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, data_dir: &std::path::Path, limit: usize) -> Config {
    Config {
        hacker_news: HackerNewsConfig {
            base_url: server.uri(),
            story_limit: limit,
            request_delay: Duration::ZERO,
            request_timeout: Duration::from_secs(5),
        },
        llm: LlmConfig {
            base_url: format!("{}/v1", server.uri()),
            request_timeout: Duration::from_secs(5),
            ..LlmConfig::default()
        },
        output: OutputConfig {
            data_dir: data_dir.to_path_buf(),
        },
    }
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

async fn mount_stories(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/item/1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "type": "story", "title": "Rust 2.0 released", "score": 920,
            "descendants": 456, "url": "https://blog.rust-lang.org"
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/item/2.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/item/3.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "type": "story", "title": "YC W25 startups announced", "score": 450,
            "descendants": 123
        })))
        .mount(server)
        .await;
}

async fn mount_model(server: &MockServer, categorize: &str, sentiment: &str, summary: &str) {
    for (marker, reply) in [
        ("tech categorizer", categorize),
        ("sentiment analyst", sentiment),
        ("tech journalist", summary),
    ] {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains(marker))
            .respond_with(chat_reply(reply))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_full_run_with_dropped_story_and_bad_sentiment() {
    let server = MockServer::start().await;
    mount_stories(&server).await;
    mount_model(
        &server,
        r#"{"Programming": [1], "Startups": [2], "Other": [3]}"#,
        "I think people are mostly happy.",
        "Rust and YC dominate today.",
    )
    .await;
    let dir = tempfile::tempdir().unwrap();

    let outcome = hn_trends::run_pipeline(&config_for(&server, dir.path(), 3), None)
        .await
        .unwrap();

    let ids: Vec<u64> = outcome.batch.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 3]);

    // Ordinal 2 is the second fetched story (id 3); ordinal 3 is out of range.
    assert_eq!(outcome.analysis.categories.get("Programming"), Some(&[1][..]));
    assert_eq!(outcome.analysis.categories.get("Startups"), Some(&[3][..]));
    assert!(outcome.analysis.categories.get("Other").is_none());
    assert_eq!(outcome.analysis.sentiment, SentimentResult::default());
    assert_eq!(outcome.analysis.summary, "Rust and YC dominate today.");

    assert!(outcome.report.contains("Programming: 1 stories"));
    assert!(outcome.report.contains("Overall Sentiment: unknown"));
    assert!(outcome.report.contains("Score: 920 | Comments: 456"));

    assert!(outcome.artifact.raw_path.starts_with(dir.path().join("raw")));
    assert!(outcome.artifact.analysis_path.starts_with(dir.path().join("processed")));
    let saved_report = std::fs::read_to_string(&outcome.artifact.report_path).unwrap();
    assert_eq!(saved_report, outcome.report);
}

#[tokio::test]
async fn test_topic_filter_narrows_the_batch() {
    let server = MockServer::start().await;
    mount_stories(&server).await;
    mount_model(
        &server,
        r#"{"Startups": [1]}"#,
        r#"{"overall_sentiment": "positive", "confidence": "medium"}"#,
        "Funding news.",
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let topic = Topic::preset("startups").unwrap();

    let outcome = hn_trends::run_pipeline(&config_for(&server, dir.path(), 3), Some(&topic))
        .await
        .unwrap();

    assert_eq!(outcome.batch.len(), 1);
    assert_eq!(outcome.batch.stories()[0].id, 3);
    assert_eq!(outcome.analysis.categories.get("Startups"), Some(&[3][..]));
    assert_eq!(outcome.analysis.sentiment.overall, Sentiment::Positive);
}

#[tokio::test]
async fn test_model_down_still_completes() {
    let server = MockServer::start().await;
    mount_stories(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let outcome = hn_trends::run_pipeline(&config_for(&server, dir.path(), 3), None)
        .await
        .unwrap();

    assert_eq!(outcome.analysis.story_count, 2);
    assert!(outcome.analysis.categories.is_empty());
    assert_eq!(outcome.analysis.summary, SUMMARY_FAILED);
    assert!(outcome.artifact.report_path.exists());
}

#[tokio::test]
async fn test_listing_failure_aborts_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topstories.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let result = hn_trends::run_pipeline(&config_for(&server, dir.path(), 3), None).await;

    assert!(result.is_err());
    assert!(!dir.path().join("raw").exists());
}

#[tokio::test]
async fn test_unwritable_output_aborts_the_run() {
    let server = MockServer::start().await;
    mount_stories(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("data");
    std::fs::write(&blocked, "not a directory").unwrap();

    let result = hn_trends::run_pipeline(&config_for(&server, &blocked, 3), None).await;

    assert!(result.is_err());
}
