//! fal.ai queue client for text-to-video models.
//!
//! Flow: submit the prompt to `{endpoint}/{model}`, poll the status URL
//! until the request completes, then fetch the result and pull out the
//! video URL. The whole exchange runs under one deadline.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use signa_core::config::VideoConfig;

use crate::error::VideoError;
use crate::generator::{VideoGenerator, VideoOutput, VideoPrompt};

/// Text-to-video client for the fal.ai request queue.
pub struct FalVideoClient {
    client: Client,
    endpoint: String,
    model: String,
    poll_interval: Duration,
    timeout: Duration,
}

impl FalVideoClient {
    pub fn new(config: &VideoConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.trim_matches('/').to_string(),
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn submit_url(&self) -> String {
        format!("{}/{}", self.endpoint, self.model)
    }

    fn request_url(&self, request_id: &str, suffix: &str) -> String {
        format!("{}/{}/requests/{}{}", self.endpoint, self.model, request_id, suffix)
    }

    fn authorized(&self, builder: RequestBuilder, api_key: &str) -> RequestBuilder {
        builder.header("Authorization", format!("Key {}", api_key))
    }

    async fn send_json<T: for<'de> Deserialize<'de>>(
        &self,
        builder: RequestBuilder,
        api_key: &str,
    ) -> Result<T, VideoError> {
        let response = self.authorized(builder, api_key).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(VideoError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    async fn run(&self, prompt: &VideoPrompt, api_key: &str) -> Result<VideoOutput, VideoError> {
        let input = QueueInput {
            prompt: prompt.render(),
        };
        let submission: QueueSubmission = self
            .send_json(self.client.post(self.submit_url()).json(&input), api_key)
            .await?;
        tracing::info!(
            request_id = %submission.request_id,
            model = %self.model,
            "Video request queued"
        );

        let status_url = submission
            .status_url
            .clone()
            .unwrap_or_else(|| self.request_url(&submission.request_id, "/status"));
        let response_url = submission
            .response_url
            .clone()
            .unwrap_or_else(|| self.request_url(&submission.request_id, ""));

        loop {
            let status: QueueStatus = self
                .send_json(self.client.get(&status_url), api_key)
                .await?;
            match next_step(&status) {
                PollStep::Fetch => break,
                PollStep::Wait => {
                    tracing::debug!(
                        request_id = %submission.request_id,
                        status = %status.status,
                        queue_position = ?status.queue_position,
                        "Video still generating"
                    );
                    tokio::time::sleep(self.poll_interval).await;
                }
                PollStep::Fail(status) => return Err(VideoError::Failed(status)),
            }
        }

        let result: Value = self
            .send_json(self.client.get(&response_url), api_key)
            .await?;
        let url = extract_video_url(&result)
            .ok_or_else(|| VideoError::NoVideoUrl(truncate(&result.to_string(), 200)))?;

        Ok(VideoOutput {
            url,
            request_id: Some(submission.request_id),
        })
    }
}

#[async_trait]
impl VideoGenerator for FalVideoClient {
    fn name(&self) -> &'static str {
        "fal"
    }

    async fn generate(
        &self,
        prompt: &VideoPrompt,
        api_key: &str,
    ) -> Result<VideoOutput, VideoError> {
        if api_key.trim().is_empty() {
            return Err(VideoError::MissingCredential);
        }
        tracing::info!(prompt = %prompt.text(), "Generating sign language video");
        tokio::time::timeout(self.timeout, self.run(prompt, api_key))
            .await
            .map_err(|_| VideoError::Timeout(self.timeout.as_secs()))?
    }
}

/// What to do after a status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PollStep {
    /// Generation finished; fetch the result.
    Fetch,
    /// Still queued or running; poll again.
    Wait,
    Fail(String),
}

fn next_step(status: &QueueStatus) -> PollStep {
    match status.status.as_str() {
        "COMPLETED" => PollStep::Fetch,
        "IN_QUEUE" | "IN_PROGRESS" => PollStep::Wait,
        other => PollStep::Fail(other.to_string()),
    }
}

/// Pull the video URL out of a provider result.
///
/// Checked in order: `video.url`, `video_url`, `url`, `output.video_url`.
pub fn extract_video_url(result: &Value) -> Option<String> {
    let candidates = [
        result.pointer("/video/url"),
        result.get("video_url"),
        result.get("url"),
        result.pointer("/output/video_url"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[derive(Serialize)]
struct QueueInput {
    prompt: String,
}

#[derive(Deserialize)]
struct QueueSubmission {
    request_id: String,
    #[serde(default)]
    status_url: Option<String>,
    #[serde(default)]
    response_url: Option<String>,
}

#[derive(Deserialize)]
struct QueueStatus {
    status: String,
    #[serde(default)]
    queue_position: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Minimal HTTP/1.1 server that answers with scripted responses in
    /// order, repeating the last one once the script runs out. Records
    /// each request line and its lowercased headers.
    async fn stub_queue(script: Vec<(u16, String)>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        tokio::spawn(async move {
            let mut served = 0usize;
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let head = read_request(&mut stream).await;
                log.lock().unwrap().push(head);
                let (status, body) = &script[served.min(script.len() - 1)];
                served += 1;
                let response = format!(
                    "HTTP/1.1 {} STUB\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        (format!("http://{}", addr), seen)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break buf.len();
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        head
    }

    fn client_for(endpoint: &str, timeout_secs: u64) -> FalVideoClient {
        FalVideoClient::new(&VideoConfig {
            endpoint: endpoint.to_string(),
            poll_interval_ms: 20,
            timeout_secs,
            ..VideoConfig::default()
        })
    }

    fn reply(status: u16, body: Value) -> (u16, String) {
        (status, body.to_string())
    }

    #[test]
    fn test_extract_video_nested_url() {
        let result = json!({ "video": { "url": "https://cdn.example/v.mp4" } });
        assert_eq!(
            extract_video_url(&result).as_deref(),
            Some("https://cdn.example/v.mp4")
        );
    }

    #[test]
    fn test_extract_video_url_field() {
        let result = json!({ "video_url": "https://a/1.mp4", "url": "https://a/2.mp4" });
        assert_eq!(extract_video_url(&result).as_deref(), Some("https://a/1.mp4"));
    }

    #[test]
    fn test_extract_plain_url() {
        let result = json!({ "url": "https://a/2.mp4" });
        assert_eq!(extract_video_url(&result).as_deref(), Some("https://a/2.mp4"));
    }

    #[test]
    fn test_extract_output_video_url() {
        let result = json!({ "output": { "video_url": "https://a/3.mp4" } });
        assert_eq!(extract_video_url(&result).as_deref(), Some("https://a/3.mp4"));
    }

    #[test]
    fn test_extract_missing_url() {
        assert!(extract_video_url(&json!({ "status": "ok" })).is_none());
        assert!(extract_video_url(&json!({ "url": 42 })).is_none());
        assert!(extract_video_url(&json!({ "url": "" })).is_none());
        assert!(extract_video_url(&json!([])).is_none());
    }

    #[test]
    fn test_urls_built_from_config() {
        let config = VideoConfig {
            endpoint: "https://queue.fal.run/".to_string(),
            ..VideoConfig::default()
        };
        let client = FalVideoClient::new(&config);
        assert_eq!(client.submit_url(), "https://queue.fal.run/fal-ai/veo2");
        assert_eq!(
            client.request_url("abc", "/status"),
            "https://queue.fal.run/fal-ai/veo2/requests/abc/status"
        );
        assert_eq!(client.timeout, Duration::from_secs(120));
        assert_eq!(client.poll_interval, Duration::from_millis(1000));
    }

    #[test]
    fn test_queue_payloads_deserialize() {
        let submission: QueueSubmission = serde_json::from_value(json!({
            "request_id": "r-1",
            "status_url": "https://s",
        }))
        .unwrap();
        assert_eq!(submission.request_id, "r-1");
        assert_eq!(submission.status_url.as_deref(), Some("https://s"));
        assert!(submission.response_url.is_none());

        let status: QueueStatus =
            serde_json::from_value(json!({ "status": "IN_QUEUE", "queue_position": 3 })).unwrap();
        assert_eq!(status.status, "IN_QUEUE");
        assert_eq!(status.queue_position, Some(3));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ab", 3), "ab");
    }

    #[tokio::test]
    async fn test_generate_without_key_fails_fast() {
        let client = FalVideoClient::new(&VideoConfig::default());
        let prompt = VideoPrompt::new("hello").unwrap();
        let result = client.generate(&prompt, "  ").await;
        assert!(matches!(result, Err(VideoError::MissingCredential)));
    }

    #[test]
    fn test_next_step_by_status() {
        let status = |s: &str| QueueStatus {
            status: s.to_string(),
            queue_position: None,
        };
        assert_eq!(next_step(&status("COMPLETED")), PollStep::Fetch);
        assert_eq!(next_step(&status("IN_QUEUE")), PollStep::Wait);
        assert_eq!(next_step(&status("IN_PROGRESS")), PollStep::Wait);
        assert_eq!(
            next_step(&status("FAILED")),
            PollStep::Fail("FAILED".to_string())
        );
        assert_eq!(next_step(&status("")), PollStep::Fail(String::new()));
    }

    #[tokio::test]
    async fn test_generate_polls_until_completed() {
        let (endpoint, seen) = stub_queue(vec![
            reply(200, json!({ "request_id": "req-7" })),
            reply(200, json!({ "status": "IN_QUEUE", "queue_position": 2 })),
            reply(200, json!({ "status": "IN_PROGRESS" })),
            reply(200, json!({ "status": "COMPLETED" })),
            reply(200, json!({ "video": { "url": "https://cdn.example/out.mp4" } })),
        ])
        .await;
        let client = client_for(&endpoint, 10);
        let prompt = VideoPrompt::new("hello").unwrap();

        let output = client.generate(&prompt, "test-key").await.unwrap();
        assert_eq!(output.url, "https://cdn.example/out.mp4");
        assert_eq!(output.request_id.as_deref(), Some("req-7"));

        let seen = seen.lock().unwrap();
        let request_lines: Vec<&str> = seen.iter().filter_map(|r| r.lines().next()).collect();
        assert_eq!(
            request_lines,
            vec![
                "post /fal-ai/veo2 http/1.1",
                "get /fal-ai/veo2/requests/req-7/status http/1.1",
                "get /fal-ai/veo2/requests/req-7/status http/1.1",
                "get /fal-ai/veo2/requests/req-7/status http/1.1",
                "get /fal-ai/veo2/requests/req-7 http/1.1",
            ]
        );
        assert!(seen
            .iter()
            .all(|r| r.contains("authorization: key test-key")));
    }

    #[tokio::test]
    async fn test_generate_reports_failed_status() {
        let (endpoint, _) = stub_queue(vec![
            reply(200, json!({ "request_id": "req-f" })),
            reply(200, json!({ "status": "IN_PROGRESS" })),
            reply(200, json!({ "status": "FAILED" })),
        ])
        .await;
        let client = client_for(&endpoint, 10);
        let prompt = VideoPrompt::new("hello").unwrap();

        let err = client.generate(&prompt, "test-key").await.unwrap_err();
        assert!(matches!(err, VideoError::Failed(ref s) if s == "FAILED"));
    }

    #[tokio::test]
    async fn test_generate_surfaces_http_error() {
        let (endpoint, seen) =
            stub_queue(vec![(401, "unauthorized".to_string())]).await;
        let client = client_for(&endpoint, 10);
        let prompt = VideoPrompt::new("hello").unwrap();

        let err = client.generate(&prompt, "bad-key").await.unwrap_err();
        assert!(matches!(
            err,
            VideoError::Api { status: 401, ref body } if body == "unauthorized"
        ));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_times_out_while_in_progress() {
        let (endpoint, _) = stub_queue(vec![
            reply(200, json!({ "request_id": "req-slow" })),
            reply(200, json!({ "status": "IN_PROGRESS" })),
        ])
        .await;
        let client = client_for(&endpoint, 1);
        let prompt = VideoPrompt::new("hello").unwrap();

        let err = client.generate(&prompt, "test-key").await.unwrap_err();
        assert!(matches!(err, VideoError::Timeout(1)));
    }

    #[tokio::test]
    async fn test_generate_result_without_url() {
        let (endpoint, _) = stub_queue(vec![
            reply(200, json!({ "request_id": "req-n" })),
            reply(200, json!({ "status": "COMPLETED" })),
            reply(200, json!({ "detail": "done" })),
        ])
        .await;
        let client = client_for(&endpoint, 10);
        let prompt = VideoPrompt::new("hello").unwrap();

        let err = client.generate(&prompt, "test-key").await.unwrap_err();
        assert!(matches!(err, VideoError::NoVideoUrl(ref body) if body.contains("done")));
    }
}
