//! Command clients against a stand-in server.

use std::time::Duration;

use raml_tester::client::{CommandClient, RequestOptions, TesterClient, TesterConfig};
use raml_tester::error::ClientError;
use raml_tester::matchers::{FullyUsed, Matcher, NoViolations};
use raml_tester::report::UsagePayload;
use raml_tester::{ClientOptions, Command};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tester(server: &MockServer) -> TesterClient {
    TesterClient::new(TesterConfig {
        host: "127.0.0.1".to_string(),
        port: server.address().port(),
        ..TesterConfig::default()
    })
}

#[tokio::test]
async fn ping_with_clear_flags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@@@proxy/ping"))
        .and(query_param("clear-reports", "true"))
        .and(query_param("clear-usage", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Pong"))
        .expect(1)
        .mount(&server)
        .await;

    let client = CommandClient::new("127.0.0.1");
    let mut opts = ClientOptions::new(Command::Ping).with_port(server.address().port());
    opts.clear_reports = true;
    opts.clear_usage = true;

    assert_eq!(client.ping(&opts).await.unwrap(), "Pong");
}

#[tokio::test]
async fn native_client_leaves_reports_unparsed() {
    let server = MockServer::start().await;
    let body = json!([{"requestViolations": ["X"], "responseViolations": []}]).to_string();
    Mock::given(path("/@@@proxy/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
        .mount(&server)
        .await;

    let client = CommandClient::new("127.0.0.1");
    let opts = ClientOptions::new(Command::Reports).with_port(server.address().port());
    assert_eq!(client.reports(&opts).await.unwrap(), body);
}

#[tokio::test]
async fn native_client_reports_refused_connection() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = CommandClient::new("127.0.0.1");
    let err = client
        .stop(&ClientOptions::new(Command::Stop).with_port(port))
        .await
        .unwrap_err();
    assert!(err.is_connect(), "unexpected error: {}", err);
}

#[tokio::test]
async fn tester_reports_feed_the_violation_matcher() {
    let server = MockServer::start().await;
    Mock::given(path("/@@@proxy/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "api.raml": [
                {"id": 0, "request": "GET /ok", "requestViolations": [], "responseViolations": []},
                {"id": 1, "request": "GET /bad", "requestViolations": [], "responseViolations": ["Response code 500 not defined"]},
            ]
        })))
        .mount(&server)
        .await;

    let reports = tester(&server).reports().await.unwrap();
    let result = NoViolations.compare(Some(reports.as_slice()));
    assert!(!result.pass);
    assert!(result.message.contains("Request number 2"));
    assert!(result.message.contains("Response code 500 not defined"));
    assert!(!result.message.contains("Request number 1"));
}

#[tokio::test]
async fn tester_usage_feeds_the_usage_matcher() {
    let server = MockServer::start().await;
    Mock::given(path("/@@@proxy/usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "unused": {"resources": ["/a"], "actions": []}
        })))
        .mount(&server)
        .await;

    let UsagePayload::Single(usage) = tester(&server).usage().await.unwrap() else {
        panic!("expected a single usage record");
    };
    let result = FullyUsed::default().compare(Some(&usage));
    assert!(!result.pass);
    assert!(result.message.contains("  resources: [\"/a\"]\n"));
    assert!(result.message.contains("  actions: []\n"));
    assert!(!result.message.contains("responseCodes"));
}

#[tokio::test]
async fn tester_fails_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(path("/@@@proxy/reload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("no RAML"))
        .mount(&server)
        .await;

    let err = tester(&server).reload().await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 500, .. }));
}

#[tokio::test]
async fn tester_times_out() {
    let server = MockServer::start().await;
    Mock::given(path("/@@@proxy/ping"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let options = RequestOptions {
        timeout: Some(Duration::from_millis(50)),
    };
    let err = tester(&server).request("ping", options).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(d) if d == Duration::from_millis(50)));
}
