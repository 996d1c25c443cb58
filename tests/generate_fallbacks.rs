// tests/generate_fallbacks.rs
// ResponseGenerator degradation ladder, exercised over real sockets.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use therabot::llm::generate::{
    BLOCKED_MESSAGE, CONNECTION_APOLOGY, EMPTY_RESPONSE_MESSAGE, TIMEOUT_APOLOGY,
};
use therabot::llm::{GeminiClient, LlmHttpClient, ResponseGenerator};

fn tight_http() -> LlmHttpClient {
    LlmHttpClient::new(Duration::from_millis(400), Duration::from_millis(200))
        .with_limits(2, Duration::from_millis(10))
}

fn generator_for(base_url: String) -> ResponseGenerator {
    ResponseGenerator::new(GeminiClient::new(
        "test-key".to_string(),
        "gemini-test".to_string(),
        base_url,
        tight_http(),
    ))
}

/// Serve the given JSON body with a 200 to every request.
async fn spawn_json_server(body: &str) -> String {
    let body = body.to_string();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let body = body.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 65536];
                let mut total = 0;
                loop {
                    match socket.read(&mut buf[total..]).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            total += n;
                            let text = String::from_utf8_lossy(&buf[..total]);
                            if let Some(header_end) = text.find("\r\n\r\n") {
                                let content_length = text
                                    .lines()
                                    .find_map(|line| {
                                        line.to_ascii_lowercase()
                                            .strip_prefix("content-length:")
                                            .and_then(|v| v.trim().parse::<usize>().ok())
                                    })
                                    .unwrap_or(0);
                                if total >= header_end + 4 + content_length {
                                    break;
                                }
                            }
                            if total == buf.len() {
                                break;
                            }
                        }
                    }
                }

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// Accept connections but never answer, so requests hit the client timeout.
async fn spawn_stalling_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            held.push(socket);
        }
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn connection_refused_yields_connection_apology() {
    let generator = generator_for("http://127.0.0.1:1".to_string());

    let reply = generator.generate("User Input: hi", "ada").await;
    assert_eq!(reply, CONNECTION_APOLOGY);
}

#[tokio::test]
async fn timeout_on_every_attempt_yields_timeout_apology() {
    let base_url = spawn_stalling_server().await;
    let generator = generator_for(base_url);

    let reply = generator.generate("User Input: hi", "ada").await;
    assert_eq!(reply, TIMEOUT_APOLOGY);
}

#[tokio::test]
async fn blocked_prompt_yields_safety_message() {
    let base_url = spawn_json_server(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).await;
    let generator = generator_for(base_url);

    let reply = generator.generate("User Input: hi", "ada").await;
    assert_eq!(reply, BLOCKED_MESSAGE);
}

#[tokio::test]
async fn empty_candidates_yield_rephrase_message() {
    let base_url = spawn_json_server(r#"{"candidates":[]}"#).await;
    let generator = generator_for(base_url);

    let reply = generator.generate("User Input: hi", "ada").await;
    assert_eq!(reply, EMPTY_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn sentinel_echo_is_trimmed_from_real_responses() {
    let body = serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [
                    {"text": "User Input: hi\nAssistant Response: You're not alone, ada 🤝💙"}
                ]
            }
        }]
    })
    .to_string();
    let base_url = spawn_json_server(&body).await;
    let generator = generator_for(base_url);

    let reply = generator.generate("User Input: hi", "ada").await;
    assert_eq!(reply, "You're not alone, ada 🤝💙");
}
