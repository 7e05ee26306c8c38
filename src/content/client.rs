// HTTP client for the static blog host.
// Wraps reqwest with the base URL, a request timeout and status checking.

use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::error::{QuillError, Result};

/// Read-only client for the static files behind a fixed base URL.
#[derive(Debug, Clone)]
pub struct BlogClient {
    client: Client,
    base_url: String,
}

impl BlogClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("quill-reader"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(QuillError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a resource path such as `/data/posts-metadata.json`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make a GET request.
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::check_response(response)
    }

    /// Make a HEAD request (no body).
    pub async fn head(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        debug!(%url, "HEAD");
        let response = self.client.head(&url).send().await?;
        Self::check_response(response)
    }

    /// Check response status and convert errors.
    fn check_response(response: Response) -> Result<Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(QuillError::NotFound(response.url().to_string())),
            status => Err(QuillError::Status {
                status,
                url: response.url().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = BlogClient::new("https://example.com/blog/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "https://example.com/blog");
        assert_eq!(
            client.url("/data/posts-metadata.json"),
            "https://example.com/blog/data/posts-metadata.json"
        );
        assert_eq!(
            client.url("posts/a.json"),
            "https://example.com/blog/posts/a.json"
        );
    }
}
