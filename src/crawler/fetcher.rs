//! Page fetching
//!
//! The crawl loop only depends on the [`PageFetcher`] contract: given a URL,
//! return the body text or fail with `YokuError::Network`. Retries, if
//! wanted, belong in an implementation of that trait, not in the loop.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::YokuError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Fetches the body of a results page
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, YokuError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use yoku::config::UserAgentConfig;
/// use yoku::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a `reqwest` client
///
/// `reqwest::Client` is reference counted internally, so clones are cheap.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &UserAgentConfig, crawler: &CrawlerConfig) -> Result<Self, YokuError> {
        let client = build_http_client(user_agent, crawler.request_timeout())?;
        Ok(Self::with_client(client))
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, YokuError> {
        tracing::info!("[GET] {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(YokuError::Network {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        response.text().await.map_err(|e| network_error(url, &e))
    }
}

/// Classifies a transport failure
fn network_error(url: &str, error: &reqwest::Error) -> YokuError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };

    YokuError::Network {
        url: url.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        let user_agent = UserAgentConfig::default().user_agent();

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(header("user-agent", user_agent.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>results</html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/search?p=camera", mock_server.uri());
        let body = fetcher().fetch(&url).await.unwrap();

        assert_eq!(body, "<html>results</html>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let url = format!("{}/search?p=camera", mock_server.uri());
        let result = fetcher().fetch(&url).await;

        match result {
            Err(YokuError::Network { url: failed, message }) => {
                assert_eq!(failed, url);
                assert_eq!(message, "HTTP 503");
            }
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_timeout_with_custom_client() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html>late</html>")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let client = build_http_client(&UserAgentConfig::default(), Duration::from_millis(50)).unwrap();
        let url = format!("{}/search?p=camera", mock_server.uri());
        let result = HttpFetcher::with_client(client).fetch(&url).await;

        match result {
            Err(YokuError::Network { message, .. }) => assert_eq!(message, "Request timeout"),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Nothing listens on port 9 of localhost in the test environment
        let result = fetcher().fetch("http://127.0.0.1:9/search?p=camera").await;
        assert!(matches!(result, Err(YokuError::Network { .. })));
    }
}
