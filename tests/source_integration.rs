//! Integration tests for pulling reports over HTTP
//!
//! These tests run the source against a mock One Click Retail API.

use ocr_connector::etl::{Extractor, Fetcher, Pipeline};
use ocr_connector::storage::{NdjsonReader, NdjsonWriter};
use ocr_connector::{OcrClient, OcrSource, Resource, Row, SourceConfig, SourceError};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLIENT: &str = "testUUID";
const API_KEY: &str = "testKey";

fn csv(body: impl Into<Vec<u8>>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/csv")
}

fn config(server: &MockServer, resources: Vec<Resource>) -> SourceConfig {
    SourceConfig::new(CLIENT, API_KEY, resources).with_base_url(server.uri())
}

fn reports() -> Resource {
    Resource::new("reports csv", "v5/clients/%s/reports/export")
}

fn values<'a>(batch: &'a [Row], column: &str) -> Vec<&'a str> {
    batch.iter().map(|row| row.get(column).unwrap()).collect()
}

#[tokio::test]
async fn test_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v5/clients/testUUID/reports/export"))
        .and(query_param("meta", "false"))
        .and(query_param("X-API-KEY", API_KEY))
        .and(query_param("weeks_back", "2"))
        .respond_with(csv("v\n1\n"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server, vec![reports()]).with_weeks(2);
    let mut source = OcrSource::try_new(config).unwrap();

    let batch = source.pull().await.unwrap().unwrap();
    assert_eq!(values(&batch, "v"), vec!["1"]);
    assert!(source.pull().await.unwrap().is_none());
}

#[tokio::test]
async fn test_batches_across_resources() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/testUUID/a"))
        .respond_with(csv("v\n1\n2\n3\n"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/testUUID/b"))
        .respond_with(csv("v\n4\n5\n"))
        .expect(1)
        .mount(&server)
        .await;

    let resources = vec![Resource::new("A", "r/%s/a"), Resource::new("B", "r/%s/b")];
    let mut source = OcrSource::try_new(config(&server, resources).with_batch_size(2)).unwrap();

    let mut batches = Vec::new();
    while let Some(batch) = source.pull().await.unwrap() {
        assert!(!batch.is_empty() && batch.len() <= 2);
        batches.push(values(&batch, "v").join(","));
    }

    // B was configured last and is processed first
    assert_eq!(batches, vec!["4,5", "1,2", "3"]);
    assert_eq!(source.processed(), 2);
    assert_eq!(source.processed(), source.total());
}

#[tokio::test]
async fn test_empty_report_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/testUUID/a"))
        .respond_with(csv("v\n1\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/testUUID/b"))
        .respond_with(csv("v\n"))
        .mount(&server)
        .await;

    let resources = vec![Resource::new("A", "r/%s/a"), Resource::new("B", "r/%s/b")];
    let mut source = OcrSource::try_new(config(&server, resources)).unwrap();

    let batch = source.pull().await.unwrap().unwrap();
    assert_eq!(values(&batch, "v"), vec!["1"]);
    assert!(source.pull().await.unwrap().is_none());
}

#[tokio::test]
async fn test_raises_for_non_csv() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"error":"nope"}"#, "application/json"))
        .mount(&server)
        .await;

    let mut source = OcrSource::try_new(config(&server, vec![reports()])).unwrap();

    let err = source.pull().await.unwrap_err();
    assert!(matches!(err, SourceError::InvalidResponse(_)));
    assert!(err.to_string().contains("Non CSV response."));
}

#[tokio::test]
async fn test_handles_unencodable_strings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(csv(b"title,val\n1st,\xc2\xae\n2nd,\xae".to_vec()))
        .mount(&server)
        .await;

    let mut source = OcrSource::try_new(config(&server, vec![reports()])).unwrap();

    let batch = source.pull().await.unwrap().unwrap();
    // A valid registered sign survives, the lone continuation byte does not
    assert_eq!(batch[0].get("val"), Some("®"));
    assert_eq!(batch[1].get("val"), Some("\u{FFFD}"));
}

#[tokio::test]
async fn test_error_status_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let mut source = OcrSource::try_new(config(&server, vec![reports()])).unwrap();

    let err = source.pull().await.unwrap_err();
    assert!(matches!(err, SourceError::Protocol(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_protocol_error() {
    let config = SourceConfig::new(CLIENT, API_KEY, vec![reports()])
        .with_base_url("http://127.0.0.1:1");
    let mut source = OcrSource::try_new(config).unwrap();

    let err = source.pull().await.unwrap_err();
    assert!(matches!(err, SourceError::Protocol(_)));
}

#[tokio::test]
async fn test_large_report_decodes_every_row() {
    let server = MockServer::start().await;
    let mut body = String::from("week_asin,units\n");
    for i in 0..500 {
        body.push_str(&format!("2024-W01-B{:05},{}\n", i, i));
    }
    Mock::given(method("GET"))
        .respond_with(csv(body))
        .mount(&server)
        .await;

    let config = config(&server, vec![reports()]).with_max_spool_size(64);
    let client = OcrClient::try_new(&config).unwrap();

    let rows: Vec<Row> = client
        .fetch(&reports())
        .await
        .unwrap()
        .collect::<ocr_connector::Result<_>>()
        .unwrap();
    assert_eq!(rows.len(), 500);
    assert_eq!(rows[499].get("week_asin"), Some("2024-W01-B00499"));
    assert_eq!(rows[499].get("units"), Some("499"));
}

#[tokio::test]
async fn test_pipeline_writes_ndjson() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v5/clients/testUUID/reports/export"))
        .respond_with(csv("week_asin,units\nW1-A,3\nW1-B,5\nW2-A,\"1,000\"\n"))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("reports.ndjson");

    let source = OcrSource::try_new(config(&server, vec![reports()]).with_batch_size(2)).unwrap();
    let writer = NdjsonWriter::create(&output).unwrap();
    let mut pipeline = Pipeline::new(source, writer);

    let count = pipeline.run().await.unwrap();
    assert_eq!(count, 3);

    let data = NdjsonReader::new(&output).read().unwrap();
    assert_eq!(
        data,
        vec![
            json!({"week_asin": "W1-A", "units": "3"}),
            json!({"week_asin": "W1-B", "units": "5"}),
            json!({"week_asin": "W2-A", "units": "1,000"}),
        ]
    );
}

#[test]
fn test_resources_required() {
    let config = SourceConfig::new(CLIENT, API_KEY, vec![]);
    let err = OcrSource::try_new(config).err().unwrap();
    assert!(matches!(err, SourceError::Configuration(_)));
}
