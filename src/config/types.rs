use serde::Deserialize;
use std::time::Duration;

/// Default marketplace search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://auctions.yahoo.co.jp/search/search";

/// Shown when the search has no exact matches and the engine retried with
/// only some of the keywords. Those results do not reflect the query.
pub const DEFAULT_FALLBACK_TEXT: &str =
    "に一致する商品はありません。キーワードの一部を利用した結果を表示しています";

/// Shown when the search has no matches at all
pub const DEFAULT_NO_RESULTS_TEXT: &str = "に一致する商品はありません。";

/// Main configuration structure for Yoku
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub parser: ParserConfig,
}

/// Search endpoint and query defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search endpoint, without a query string
    pub endpoint: String,

    /// Results requested per page (`n`)
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Sort field injected when neither `s1` nor `o1` is given
    #[serde(rename = "default-sort-field")]
    pub default_sort_field: String,

    /// Sort direction injected when neither `s1` nor `o1` is given
    #[serde(rename = "default-sort-order")]
    pub default_sort_order: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: 100,
            default_sort_field: "score2".to_string(),
            default_sort_order: "d".to_string(),
        }
    }
}

/// Crawl loop behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pause between consecutive page requests (milliseconds)
    #[serde(rename = "request-interval")]
    pub request_interval: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Stop after this many pages even if more results exist
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,
}

impl CrawlerConfig {
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_interval: 1000,
            request_timeout: 30,
            max_pages: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn user_agent(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "yoku".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Sentinel phrases that mark a results page as unusable
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    #[serde(rename = "no-results-text")]
    pub no_results_text: String,

    #[serde(rename = "fallback-text")]
    pub fallback_text: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            no_results_text: DEFAULT_NO_RESULTS_TEXT.to_string(),
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
        }
    }
}
