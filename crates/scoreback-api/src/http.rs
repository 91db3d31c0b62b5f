//! HTTP client for `GET /projects/github.com/<org>/<repo>?commit=<sha>`.

use async_trait::async_trait;
use scoreback_core::ScorecardDocument;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("failed to decode scorecard: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can produce a scorecard for a commit.
#[async_trait]
pub trait ScorecardSource: Send + Sync {
    async fn fetch(
        &self,
        project: &str,
        repo: &str,
        commit: &str,
    ) -> Result<ScorecardDocument, FetchError>;
}

/// Client for the public scorecard API.
///
/// No timeout, retry, or authentication: each fetch is a single attempt.
pub struct ScorecardClient {
    client: reqwest::Client,
    base_url: String,
}

impl ScorecardClient {
    /// `base_url` should be like `https://api.securityscorecards.dev` (trailing slash optional).
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(
        &self,
        project: &str,
        repo: &str,
        commit: &str,
    ) -> Result<reqwest::Request, FetchError> {
        let url = format!("{}/projects/github.com/{project}/{repo}", self.base_url);
        Ok(self
            .client
            .get(url)
            .query(&[("commit", commit)])
            .build()?)
    }
}

#[async_trait]
impl ScorecardSource for ScorecardClient {
    async fn fetch(
        &self,
        project: &str,
        repo: &str,
        commit: &str,
    ) -> Result<ScorecardDocument, FetchError> {
        let request = self.request(project, repo, commit)?;
        debug!(url = %request.url(), "fetching scorecard");

        let resp = self.client.execute(request).await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let doc = ScorecardDocument::from_json(&body)?;
        info!(commit, score = doc.score, checks = doc.checks.len(), "fetched scorecard");
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const FIXTURE: &str = r#"{
        "date": "2024-03-04T06:56:05Z",
        "repo": {"name": "github.com/ossf/scorecard", "commit": "abc123"},
        "scorecard": {"version": "v4.13.1", "commit": "49c0eed"},
        "score": 7.5,
        "checks": [{
            "name": "Binary-Artifacts",
            "score": 10,
            "reason": "no binaries found in the repo",
            "details": null,
            "documentation": {"short": "Determines if the project has binaries.", "url": "https://example.test/docs"}
        }]
    }"#;

    /// Serve exactly one HTTP response on a random local port.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}")
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = ScorecardClient::new("https://api.securityscorecards.dev/");
        assert_eq!(client.base_url, "https://api.securityscorecards.dev");
    }

    #[test]
    fn request_targets_project_path_with_commit_query() {
        let client = ScorecardClient::new("https://api.securityscorecards.dev");
        let request = client.request("ossf", "scorecard", "abc123").unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://api.securityscorecards.dev/projects/github.com/ossf/scorecard?commit=abc123"
        );
    }

    #[tokio::test]
    async fn fetch_decodes_document() {
        let base = serve_once("200 OK", FIXTURE).await;
        let client = ScorecardClient::new(&base);
        let doc = client.fetch("ossf", "scorecard", "abc123").await.unwrap();
        assert_eq!(doc.score, 7.5);
        assert_eq!(doc.checks[0].name, "Binary-Artifacts");
        assert!(doc.checks[0].details.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let base = serve_once("404 Not Found", r#"{"code":404,"message":"not found"}"#).await;
        let client = ScorecardClient::new(&base);
        let err = client.fetch("ossf", "scorecard", "deadbeef").await.unwrap_err();
        match err {
            FetchError::Server { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("not found"));
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let base = serve_once("200 OK", r#"{"score": "not a number"}"#).await;
        let client = ScorecardClient::new(&base);
        let err = client.fetch("ossf", "scorecard", "abc123").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ScorecardClient::new(&format!("http://{addr}"));
        let err = client.fetch("ossf", "scorecard", "abc123").await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }
}
