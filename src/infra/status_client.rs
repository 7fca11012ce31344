use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::app::ports::StatusReporter;
use crate::error::Result;
use crate::types::StatusUpdate;

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts job status to `{base_url}/jobs/{job_id}/status` as JSON.
pub struct HttpStatusReporter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStatusReporter {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(CALLBACK_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn status_url(&self, job_id: &str) -> String {
        format!("{}/jobs/{}/status", self.base_url, job_id)
    }
}

#[async_trait]
impl StatusReporter for HttpStatusReporter {
    async fn report(&self, job_id: &str, update: &StatusUpdate) -> Result<()> {
        let url = self.status_url(job_id);
        let resp = self.client.post(&url).json(update).send().await?;
        resp.error_for_status_ref()?;
        debug!(job_id, status = %update.status, %url, "Status callback delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobResult;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one HTTP request, answer with `status`, and return the raw
    /// request text.
    async fn serve_once(status: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!("HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n", status);
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (base, server)
    }

    #[test]
    fn url_joins_without_double_slash() {
        let reporter = HttpStatusReporter::with_client(reqwest::Client::new(), "http://api:8000/");
        assert_eq!(reporter.status_url("abc"), "http://api:8000/jobs/abc/status");
    }

    #[tokio::test]
    async fn posts_status_json() {
        let (base, server) = serve_once("200 OK").await;
        let reporter = HttpStatusReporter::new(base).unwrap();
        let result = JobResult::completed("job-9", "/results/a.csv");

        reporter
            .report("job-9", &StatusUpdate::from(&result))
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /jobs/job-9/status HTTP/1.1"));
        assert!(request.contains("\"status\":\"completed\""));
        assert!(request.contains("/results/a.csv"));
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let (base, server) = serve_once("500 Internal Server Error").await;
        let reporter = HttpStatusReporter::new(base).unwrap();
        let result = JobResult::failed("job-10", "boom");

        let err = reporter
            .report("job-10", &StatusUpdate::from(&result))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
        server.await.unwrap();
    }
}
