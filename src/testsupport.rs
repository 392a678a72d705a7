//! Shared test fixtures: a one-request fake HTTP server and canned upstream
//! payloads.

use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Fake HTTP server that answers exactly one request with a canned response
/// and hands the raw request text back to the test.
pub struct OneShotServer {
    addr: SocketAddr,
    request_rx: oneshot::Receiver<String>,
}

impl OneShotServer {
    /// `http://127.0.0.1:<port>`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Raw request (request line, headers, body) the server received.
    pub async fn request(self) -> String {
        self.request_rx.await.expect("server captured a request")
    }
}

/// Spawn a server that replies `HTTP/1.1 {status}` with the given body.
pub async fn one_shot_http_server(status: &str, content_type: &str, body: &str) -> OneShotServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, request_rx) = oneshot::channel();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let request = read_http_request(&mut stream).await;
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
        let _ = tx.send(request);
    });
    OneShotServer { addr, request_rx }
}

/// An address nothing listens on, for connection-refused paths.
pub async fn unused_local_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("local addr")
}

/// Read headers plus a `Content-Length` body.
async fn read_http_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let body_len = content_length(&text[..header_end]);
            if buf.len() >= header_end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn content_length(headers: &str) -> usize {
    headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().ok())
                .flatten()
        })
        .unwrap_or(0)
}

/// Chat-completions body whose first choice carries `content`.
pub fn chat_completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

/// Groq-style 400 body for a JSON-mode generation failure.
pub fn failed_generation_body(failed_generation: &str) -> String {
    serde_json::json!({
        "error": {
            "message": "Failed to generate JSON. Please adjust your prompt. See 'failed_generation' for more details.",
            "type": "invalid_request_error",
            "code": "json_validate_failed",
            "failed_generation": failed_generation
        }
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_length_is_case_insensitive() {
        assert_eq!(content_length("POST / HTTP/1.1\r\ncontent-length: 12"), 12);
        assert_eq!(content_length("GET / HTTP/1.1\r\nHost: x"), 0);
    }

    #[test]
    fn failed_generation_body_carries_groq_markers() {
        let body = failed_generation_body("{\"step\":");
        assert!(body.contains("json_validate_failed"));
        assert!(body.contains("failed_generation"));
    }
}
