//! Check Integration Tests
//!
//! Full checks against a mock service streaming stage objects.

use std::time::Duration;

use ittia_check::{
    CheckConfig, CheckError, FactChecker, IttiaChecker, ReturnFormat, StageEvent,
};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn checker_for(server: &MockServer, format: ReturnFormat) -> IttiaChecker {
    let config = CheckConfig::builder()
        .base_url(server.uri())
        .format(format)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    IttiaChecker::new(config).unwrap()
}

async fn mount_stream(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Serve one chunked response that writes `chunks` and then holds the
/// connection open. The receiver fires once the client closes its end.
async fn serve_then_hold(chunks: Vec<&'static str>) -> (String, oneshot::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let mut response = String::from(
            "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ntransfer-encoding: chunked\r\n\r\n",
        );
        for chunk in chunks {
            response.push_str(&format!("{:x}\r\n{}\r\n", chunk.len(), chunk));
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();

        let held = tokio::time::timeout(Duration::from_secs(10), socket.read(&mut buf)).await;
        if matches!(held, Ok(Ok(0)) | Ok(Err(_))) {
            let _ = closed_tx.send(());
        }
    });

    (format!("http://{}", addr), closed_rx)
}

// ============================================================================
// Final Stage Resolution
// ============================================================================

#[tokio::test]
async fn test_check_returns_final_markdown() {
    let server = MockServer::start().await;
    mount_stream(
        &server,
        "/claim",
        r###"{"stage":"search","content":"searching"}
{"stage":"read","content":["a","b"]}
{"stage":"final","content":"## Verdict\nFalse"}"###,
    )
    .await;

    let checker = checker_for(&server, ReturnFormat::Markdown);
    let result = checker.check("claim").await.unwrap();
    assert_eq!(result, Some(json!("## Verdict\nFalse")));
}

#[tokio::test]
async fn test_check_returns_structured_json() {
    let server = MockServer::start().await;
    mount_stream(
        &server,
        "/claim",
        r#"{"stage":"wip","content":null}{"stage":"final","content":{"verdict":"false","sources":2},"extra":true}"#,
    )
    .await;

    let checker = checker_for(&server, ReturnFormat::Json);
    let result = checker.check("claim").await.unwrap();
    assert_eq!(result, Some(json!({"verdict": "false", "sources": 2})));
}

#[tokio::test]
async fn test_first_final_stage_wins() {
    let server = MockServer::start().await;
    mount_stream(
        &server,
        "/claim",
        r#"{"stage":"final","content":"first"}{"stage":"final","content":"second"}"#,
    )
    .await;

    let checker = checker_for(&server, ReturnFormat::Markdown);
    assert_eq!(checker.check("claim").await.unwrap(), Some(json!("first")));
}

#[tokio::test]
async fn test_no_final_stage_returns_none() {
    let server = MockServer::start().await;
    mount_stream(
        &server,
        "/claim",
        r#"{"stage":"search","content":1}{"stage":"read","content":2}"#,
    )
    .await;

    let checker = checker_for(&server, ReturnFormat::Markdown);
    assert_eq!(checker.check("claim").await.unwrap(), None);
}

#[tokio::test]
async fn test_malformed_stage_does_not_hide_final() {
    let server = MockServer::start().await;
    mount_stream(
        &server,
        "/claim",
        r#"{"stage":search} {"stage":"final","content":"still found"}"#,
    )
    .await;

    let checker = checker_for(&server, ReturnFormat::Markdown);
    assert_eq!(
        checker.check("claim").await.unwrap(),
        Some(json!("still found"))
    );
}

#[tokio::test]
async fn test_progress_channel_sees_every_stage() {
    let server = MockServer::start().await;
    mount_stream(
        &server,
        "/claim",
        r#"{"stage":"search","content":1}{"stage":"final","content":2}"#,
    )
    .await;

    let checker = checker_for(&server, ReturnFormat::Json);
    let (tx, mut rx) = mpsc::channel::<StageEvent>(8);
    let result = checker.check_with_progress("claim", tx).await.unwrap();
    assert_eq!(result, Some(json!(2)));

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.stage_name(), "search");
    assert!(second.is_final());
    assert!(rx.recv().await.is_none());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_server_error_is_propagated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let checker = checker_for(&server, ReturnFormat::Markdown);
    let err = checker.check("claim").await.unwrap_err();
    assert_eq!(
        err,
        CheckError::ServerError {
            message: "maintenance".to_string(),
            status: Some(503),
        }
    );
}

#[tokio::test]
async fn test_timeout_is_propagated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"stage":"final","content":"too late"}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = CheckConfig::builder()
        .base_url(server.uri())
        .timeout_ms(100)
        .build()
        .unwrap();
    let checker = IttiaChecker::new(config).unwrap();

    let err = checker.check("claim").await.unwrap_err();
    assert!(matches!(err, CheckError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_timeout_while_body_is_pending() {
    let (base_url, _closed) =
        serve_then_hold(vec![r#"{"stage":"search","content":"searching"}"#]).await;
    let config = CheckConfig::builder()
        .base_url(base_url)
        .timeout_ms(300)
        .build()
        .unwrap();
    let checker = IttiaChecker::new(config).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), checker.check("claim"))
        .await
        .expect("check outlived its configured timeout");
    let err = result.unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
}

#[tokio::test]
async fn test_connection_closed_after_final_stage() {
    let (base_url, closed) = serve_then_hold(vec![
        r#"{"stage":"search","content":1}"#,
        r#"{"stage":"final","content":"done"}"#,
    ])
    .await;
    let config = CheckConfig::builder()
        .base_url(base_url)
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap();
    let checker = IttiaChecker::new(config).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), checker.check("claim"))
        .await
        .expect("check waited for the body to finish");
    assert_eq!(result.unwrap(), Some(json!("done")));

    tokio::time::timeout(Duration::from_secs(5), closed)
        .await
        .expect("connection still open after the final stage")
        .unwrap();
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Port 1 is reserved and nothing listens on it.
    let config = CheckConfig::builder()
        .base_url("http://127.0.0.1:1")
        .timeout_ms(2_000)
        .build()
        .unwrap();
    let checker = IttiaChecker::new(config).unwrap();

    let err = checker.check("claim").await.unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
}

#[tokio::test]
async fn test_cancelled_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"stage":"final","content":"never seen"}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let checker = checker_for(&server, ReturnFormat::Markdown);
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = checker.check_with_cancel("claim", token).await.unwrap_err();
    assert_eq!(err, CheckError::Cancelled);
}
