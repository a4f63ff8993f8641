use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;

use pybebra_core::api::{
    AppConfig, BackendConfig, OptimizationClient, OptimizationEvent, RequestMode, Transport,
};
use pybebra_plugins::backend::{ImproveClient, StreamingClient, TOKEN_HEADER};

fn backend(base_url: &str) -> BackendConfig {
    let mut cfg = AppConfig::default().backend;
    cfg.base_url = base_url.to_string();
    cfg
}

async fn collect(client: &dyn OptimizationClient, code: &str) -> Vec<OptimizationEvent> {
    let mut events = Vec::new();
    client.optimize(code, &mut |ev| events.push(ev)).await;
    events
}

fn tags(events: &[OptimizationEvent]) -> Vec<&str> {
    events.iter().map(|e| e.event_type.as_str()).collect()
}

const STREAM_BODY: &str = concat!(
    "data: {\"event_type\":\"started\",\"data\":{\"timestamp\":\"12:00:00\"}}\n\n",
    "data: {\"event_type\":\"rag_retrieved\",\"data\":{\"code_samples\":[\"a\",\"b\"]}}\n\n",
    "data: not json at all\n\n",
    "data: {\"event_type\":\"generation_attempt\",\"data\":{\"finished\":true,\"generated_code\":\"g\"}}\n\n",
    "data: {\"event_type\":\"optimization_success\",\"data\":{\"improved_function\":\"def f(): return 1\",\"ratio\":2.0}}\n\n",
);

#[tokio::test]
async fn post_stream_delivers_renamed_events() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/improve/stream")
        .match_header(TOKEN_HEADER, "bebra")
        .match_header("accept", "text/event-stream")
        .match_body(Matcher::Json(json!({ "payload": { "code": "def f(): pass" } })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(STREAM_BODY)
        .create_async()
        .await;

    let client = StreamingClient::new(&backend(&server.url())).unwrap();
    let events = collect(&client, "def f(): pass").await;

    mock.assert_async().await;
    assert_eq!(
        tags(&events),
        vec!["generation_started", "rag_retrieved", "function_generated", "result"]
    );
    assert_eq!(events[3].data["generated_code"], "def f(): return 1");
    assert_eq!(events[3].data["performance_improvement"], 2.0);
}

#[tokio::test]
async fn get_stream_sends_code_as_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/improve/stream")
        .match_query(Matcher::UrlEncoded("code".into(), "x = 1 + 1".into()))
        .with_status(200)
        .with_body("data: {\"event_type\":\"ran_out_of_attempts\"}\n\n")
        .create_async()
        .await;

    let mut cfg = backend(&server.url());
    cfg.request = RequestMode::Get;
    let client = StreamingClient::new(&cfg).unwrap();
    let events = collect(&client, "x = 1 + 1").await;

    mock.assert_async().await;
    assert_eq!(tags(&events), vec!["ran_out_of_attempts"]);
}

#[tokio::test]
async fn server_error_detail_becomes_single_error_event() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/improve/stream")
        .with_status(422)
        .with_body(r#"{"detail":"Function could not be parsed"}"#)
        .create_async()
        .await;

    let client = StreamingClient::new(&backend(&server.url())).unwrap();
    let events = collect(&client, "def").await;

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "error");
    assert_eq!(
        events[0].data["message"],
        "Server error: Function could not be parsed"
    );
}

#[tokio::test]
async fn improve_endpoint_reports_one_result() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/improve")
        .match_header("accept", "application/json")
        .match_body(Matcher::Json(json!({ "payload": { "code": "def f(): pass" } })))
        .with_status(200)
        .with_body(r#"{"improved":"def f(): return None"}"#)
        .create_async()
        .await;

    let mut cfg = backend(&server.url());
    cfg.transport = Transport::Json;
    let client = ImproveClient::new(&cfg).unwrap();
    let events = collect(&client, "def f(): pass").await;

    mock.assert_async().await;
    assert_eq!(tags(&events), vec!["result"]);
    assert_eq!(events[0].data["generated_code"], "def f(): return None");
    assert_eq!(events[0].data["performance_improvement"], "N/A");
}

#[tokio::test]
async fn improve_endpoint_malformed_body_is_an_error_event() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/improve")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = ImproveClient::new(&backend(&server.url())).unwrap();
    let events = collect(&client, "x").await;

    assert_eq!(tags(&events), vec!["error"]);
    let msg = events[0].data["message"].as_str().unwrap();
    assert!(msg.starts_with("Malformed response from server"), "{msg}");
}

#[tokio::test]
async fn unreachable_service_yields_one_error_event() {
    let client = StreamingClient::new(&backend("http://127.0.0.1:1")).unwrap();
    let events = collect(&client, "x").await;

    assert_eq!(tags(&events), vec!["error"]);
    let msg = events[0].data["message"].as_str().unwrap();
    assert!(msg.starts_with("Could not reach the optimization service"), "{msg}");
}

#[tokio::test]
async fn silent_service_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((sock, _)) = listener.accept().await {
            held.push(sock);
        }
    });

    let mut cfg = backend(&format!("http://{addr}"));
    cfg.timeout_ms = 200;
    let client = StreamingClient::new(&cfg).unwrap();
    let events = collect(&client, "x").await;

    assert_eq!(tags(&events), vec!["error"]);
    assert_eq!(
        events[0].data["message"],
        "Optimization timed out after 0.2 seconds."
    );
}
