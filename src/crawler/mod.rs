//! Crawler module for paginated result fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - Page fetching behind the `PageFetcher` contract
//! - Markup access and listing extraction
//! - Inter-page pacing
//! - The crawl loop itself

mod coordinator;
mod fetcher;
pub mod markup;
mod parser;
mod throttle;

pub use coordinator::{run_crawl, CrawlOutcome, Crawler};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use parser::{detect_sentinel, parse_results, ListingError};
pub use throttle::{SleepThrottle, Throttle};

use crate::config::Config;
use crate::query::SearchParameters;
use crate::YokuError;

/// Runs a complete crawl and returns only the listings
///
/// This is the main entry point for library callers. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Request result pages in order, pausing between them
/// 3. Extract listings from each page
/// 4. Stop at the first page that yields nothing
///
/// # Errors
///
/// * `YokuError::InvalidQuery` - neither `p` nor `va` is present
/// * `YokuError::Network` - a page could not be fetched
pub async fn crawl(
    config: &Config,
    params: &SearchParameters,
) -> Result<Vec<crate::listing::AuctionListing>, YokuError> {
    run_crawl(config, params).await.map(|outcome| outcome.listings)
}
