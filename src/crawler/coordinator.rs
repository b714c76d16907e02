//! Crawl loop
//!
//! Drives query building, fetching, and parsing across result pages until a
//! page yields nothing. Requests are strictly sequential; the only wait
//! besides I/O is the pause between pages.

use crate::config::{Config, ParserConfig};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::parser::parse_results;
use crate::crawler::throttle::{SleepThrottle, Throttle};
use crate::listing::{AuctionListing, PageResult};
use crate::output::CrawlStats;
use crate::query::{QueryBuilder, SearchParameters};
use crate::YokuError;
use std::time::{Duration, Instant};

/// Crawl loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CrawlState {
    /// About to request this 1-based page
    Fetching { page: u32 },

    Done,
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Listings from every page, in page order
    pub listings: Vec<AuctionListing>,

    pub stats: CrawlStats,
}

/// Sequential paginated crawler
pub struct Crawler<F, T = SleepThrottle> {
    builder: QueryBuilder,
    fetcher: F,
    throttle: T,
    parser: ParserConfig,
    request_interval: Duration,
    max_pages: Option<u32>,
}

impl<F: PageFetcher> Crawler<F, SleepThrottle> {
    /// Creates a crawler that sleeps on the tokio timer between pages
    pub fn new(config: &Config, fetcher: F) -> Self {
        Self {
            builder: QueryBuilder::new(config.search.clone()),
            fetcher,
            throttle: SleepThrottle,
            parser: config.parser.clone(),
            request_interval: config.crawler.request_interval(),
            max_pages: config.crawler.max_pages,
        }
    }
}

impl<F: PageFetcher, T: Throttle> Crawler<F, T> {
    /// Replaces the inter-page pause
    pub fn with_throttle<U: Throttle>(self, throttle: U) -> Crawler<F, U> {
        Crawler {
            builder: self.builder,
            fetcher: self.fetcher,
            throttle,
            parser: self.parser,
            request_interval: self.request_interval,
            max_pages: self.max_pages,
        }
    }

    pub fn throttle(&self) -> &T {
        &self.throttle
    }

    /// Builds, fetches, and parses a single page
    ///
    /// # Errors
    ///
    /// * `YokuError::InvalidQuery` - the parameters carry no query term
    /// * `YokuError::Network` - the fetch failed
    pub async fn fetch_page(
        &self,
        params: &SearchParameters,
        page: u32,
    ) -> Result<PageResult, YokuError> {
        let request = self.builder.build(params, page)?;
        tracing::debug!(
            "Requesting page {} (offset {}, size {})",
            request.page,
            request.offset,
            request.page_size
        );

        let body = self.fetcher.fetch(&request.url).await?;
        Ok(parse_results(&body, &self.parser))
    }

    /// Crawls every page of a search
    ///
    /// Stops at the first page that yields no listings, or after
    /// `max_pages` pages when a cap is configured. Without a cap the number
    /// of pages is bounded only by the search's result count.
    pub async fn crawl(&mut self, params: &SearchParameters) -> Result<CrawlOutcome, YokuError> {
        let start_time = Instant::now();
        let mut listings = Vec::new();
        let mut stats = CrawlStats::default();
        let mut state = CrawlState::Fetching { page: 1 };

        while let CrawlState::Fetching { page } = state {
            let result = self.fetch_page(params, page).await?;

            stats.pages_fetched += 1;
            stats.skipped_listings += result.skipped;
            stats.listings += result.listings.len();
            listings.extend(result.listings);

            tracing::info!(
                "Page {}: {} listings so far",
                page,
                listings.len()
            );

            state = if !result.has_more {
                if let Some(sentinel) = result.sentinel {
                    tracing::info!("Stopping at page {}: {}", page, sentinel);
                }
                CrawlState::Done
            } else if self.max_pages.is_some_and(|max| page >= max) {
                tracing::info!("Reached page limit of {}", page);
                CrawlState::Done
            } else {
                self.throttle.pause(self.request_interval).await;
                stats.pauses += 1;
                CrawlState::Fetching { page: page + 1 }
            };
        }

        stats.elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl completed: {} listings from {} pages in {:?}",
            listings.len(),
            stats.pages_fetched,
            stats.elapsed
        );

        Ok(CrawlOutcome { listings, stats })
    }
}

/// Runs a complete crawl over HTTP
///
/// # Example
///
/// ```no_run
/// use yoku::config::Config;
/// use yoku::crawler::run_crawl;
/// use yoku::query::SearchParameters;
///
/// # async fn example() -> Result<(), yoku::YokuError> {
/// let params: SearchParameters = [("p", "camera")].into_iter().collect();
/// let outcome = run_crawl(&Config::default(), &params).await?;
/// println!("{} listings", outcome.listings.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    params: &SearchParameters,
) -> Result<CrawlOutcome, YokuError> {
    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler)?;
    Crawler::new(config, fetcher).crawl(params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const CL_PARAMS: &str = "etm=1700600000,stm=1700000000";

    /// Serves canned bodies in order and records requested URLs
    struct ScriptedFetcher {
        pages: Mutex<VecDeque<Result<String, YokuError>>>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(pages: Vec<Result<String, YokuError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl PageFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<String, YokuError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(results_page(0, 0)))
        }
    }

    /// Counts pauses instead of sleeping
    #[derive(Default)]
    struct CountingThrottle {
        pauses: Vec<Duration>,
    }

    impl Throttle for CountingThrottle {
        async fn pause(&mut self, interval: Duration) {
            self.pauses.push(interval);
        }
    }

    fn results_page(first_id: usize, count: usize) -> String {
        let blocks: String = (first_id..first_id + count)
            .map(|i| {
                format!(
                    r#"<li><div class="Product__detail">
                        <a class="Product__titleLink" href="https://page.example.com/auction/x{i}"
                           data-auction-title="Item {i}" data-auction-img="https://img.example.com/i-img600x450-1699990000ab.jpg"
                           data-cl-params="{CL_PARAMS}">Item {i}</a>
                        <div class="Product__bonus" data-auction-id="x{i}" data-auction-price="100"></div>
                    </div></li>"#
                )
            })
            .collect();
        format!("<html><body><ul>{}</ul></body></html>", blocks)
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.crawler.request_interval = 250;
        config
    }

    fn camera() -> SearchParameters {
        [("p", "camera")].into_iter().collect()
    }

    fn crawler(
        pages: Vec<Result<String, YokuError>>,
        config: &Config,
    ) -> Crawler<ScriptedFetcher, CountingThrottle> {
        Crawler::new(config, ScriptedFetcher::new(pages)).with_throttle(CountingThrottle::default())
    }

    #[tokio::test]
    async fn test_two_pages_one_pause() {
        let mut crawler = crawler(vec![Ok(results_page(0, 5)), Ok(results_page(0, 0))], &test_config());

        let outcome = crawler.crawl(&camera()).await.unwrap();

        assert_eq!(outcome.listings.len(), 5);
        assert_eq!(outcome.stats.pages_fetched, 2);
        assert_eq!(outcome.stats.pauses, 1);
        assert_eq!(crawler.throttle().pauses, vec![Duration::from_millis(250)]);
    }

    #[tokio::test]
    async fn test_pages_are_requested_in_order() {
        let mut crawler = crawler(
            vec![
                Ok(results_page(0, 3)),
                Ok(results_page(3, 2)),
                Ok(results_page(0, 0)),
            ],
            &test_config(),
        );

        let outcome = crawler.crawl(&camera()).await.unwrap();

        let ids: Vec<&str> = outcome.listings.iter().map(|l| l.item_id.as_str()).collect();
        assert_eq!(ids, vec!["x0", "x1", "x2", "x3", "x4"]);

        let requested = crawler.fetcher.requested();
        assert_eq!(requested.len(), 3);
        assert!(requested[0].ends_with("&b=1&n=100"));
        assert!(requested[1].ends_with("&b=101&n=100"));
        assert!(requested[2].ends_with("&b=201&n=100"));
    }

    #[tokio::test]
    async fn test_sentinel_first_page_ends_without_pause() {
        let config = test_config();
        let body = format!("<html><body>{}</body></html>", config.parser.no_results_text);
        let mut crawler = crawler(vec![Ok(body)], &config);

        let outcome = crawler.crawl(&camera()).await.unwrap();

        assert!(outcome.listings.is_empty());
        assert_eq!(outcome.stats.pages_fetched, 1);
        assert!(crawler.throttle().pauses.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_query_fetches_nothing() {
        let mut crawler = crawler(vec![], &test_config());
        let params: SearchParameters = [("s1", "new")].into_iter().collect();

        let result = crawler.crawl(&params).await;

        assert!(matches!(result, Err(YokuError::InvalidQuery(_))));
        assert!(crawler.fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_network_error_aborts_crawl() {
        let mut crawler = crawler(
            vec![
                Ok(results_page(0, 2)),
                Err(YokuError::Network {
                    url: "https://auctions.example.com".to_string(),
                    message: "HTTP 500".to_string(),
                }),
            ],
            &test_config(),
        );

        let result = crawler.crawl(&camera()).await;

        assert!(matches!(result, Err(YokuError::Network { .. })));
        assert_eq!(crawler.fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_max_pages_cap() {
        let mut config = test_config();
        config.crawler.max_pages = Some(2);
        let mut crawler = crawler(
            vec![
                Ok(results_page(0, 1)),
                Ok(results_page(1, 1)),
                Ok(results_page(2, 1)),
            ],
            &config,
        );

        let outcome = crawler.crawl(&camera()).await.unwrap();

        assert_eq!(outcome.listings.len(), 2);
        assert_eq!(outcome.stats.pages_fetched, 2);
        assert_eq!(outcome.stats.pauses, 1);
    }

    #[tokio::test]
    async fn test_fetch_page_returns_parsed_result() {
        let crawler = crawler(vec![Ok(results_page(0, 4))], &test_config());

        let result = crawler.fetch_page(&camera(), 1).await.unwrap();

        assert_eq!(result.listings.len(), 4);
        assert!(result.has_more);
    }
}
