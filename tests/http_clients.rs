use linksum::agent::{CompletionModel, GroqClient, SummarizationError, DEFAULT_MODEL};
use linksum::config::{FetchConfig, ModelConfig};
use linksum::loader::{LoadError, PageFetcher, WebFetcher};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accept one connection, answer it with `status` and `body`, and hand back
/// the raw request that was received.
async fn serve_once(
    status: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if let Some(end) = find_header_end(&request) {
                let headers = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
                let length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}"), handle)
}

fn find_header_end(request: &[u8]) -> Option<usize> {
    request.windows(4).position(|w| w == b"\r\n\r\n")
}

fn request_body(raw: &str) -> serde_json::Value {
    let (_, body) = raw.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

fn groq(endpoint: String) -> GroqClient {
    let config = ModelConfig {
        endpoint,
        ..ModelConfig::default()
    };
    GroqClient::new(&config, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn groq_client_sends_model_credential_and_prompt() {
    let (base, server) = serve_once(
        "200 OK",
        "application/json",
        r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"A short summary."}}]}"#,
    )
    .await;

    let reply = groq(format!("{base}/openai/v1/chat/completions"))
        .complete("PROMPT", "gsk_test")
        .await
        .unwrap();

    assert_eq!(reply, "A short summary.");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /openai/v1/chat/completions "));
    assert!(raw.to_ascii_lowercase().contains("authorization: bearer gsk_test"));
    assert_eq!(
        request_body(&raw),
        serde_json::json!({
            "model": DEFAULT_MODEL,
            "messages": [{"role": "user", "content": "PROMPT"}]
        })
    );
}

#[tokio::test]
async fn groq_client_maps_rejected_key() {
    let (base, server) = serve_once(
        "401 Unauthorized",
        "application/json",
        r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#,
    )
    .await;

    let err = groq(base).complete("PROMPT", "bad").await.unwrap_err();

    match err {
        SummarizationError::Authentication(msg) => assert_eq!(msg, "Invalid API Key"),
        other => panic!("unexpected error: {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn groq_client_rejects_non_json_reply() {
    let (base, server) = serve_once("200 OK", "text/html", "<html>gateway</html>").await;

    let err = groq(base).complete("PROMPT", "gsk").await.unwrap_err();

    assert!(matches!(err, SummarizationError::ParseError(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn web_fetcher_extracts_page_text() {
    let (base, server) = serve_once(
        "200 OK",
        "text/html; charset=utf-8",
        "<html><head><title>Local page</title></head>\
         <body><main><p>Served from a local listener for the fetcher.</p></main></body></html>",
    )
    .await;
    let url = format!("{base}/article");

    let fetcher = WebFetcher::new(&FetchConfig::default()).unwrap();
    let docs = fetcher.fetch(&[url.clone()]).await.unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].text, "Served from a local listener for the fetcher.");
    assert_eq!(docs[0].metadata["title"], "Local page");
    assert_eq!(docs[0].metadata["source"], url);

    let raw = server.await.unwrap();
    assert!(raw.starts_with("GET /article "));
    assert!(raw.to_ascii_lowercase().contains("user-agent: linksum/"));
}

#[tokio::test]
async fn web_fetcher_reports_http_status() {
    let (base, server) = serve_once("404 Not Found", "text/html", "<p>missing</p>").await;
    let url = format!("{base}/gone");

    let fetcher = WebFetcher::new(&FetchConfig::default()).unwrap();
    let err = fetcher.fetch(&[url.clone()]).await.unwrap_err();

    match err {
        LoadError::HttpStatus { url: failed, status } => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn web_fetcher_returns_nothing_for_textless_page() {
    let (base, server) = serve_once("200 OK", "text/html", "<html><body></body></html>").await;

    let fetcher = WebFetcher::new(&FetchConfig::default()).unwrap();
    let docs = fetcher.fetch(&[base]).await.unwrap();

    assert!(docs.is_empty());
    server.await.unwrap();
}
