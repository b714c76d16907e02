//! Crawl statistics
//!
//! Counters collected by the crawl loop and their human-readable summary.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Result pages requested
    pub pages_fetched: u32,

    /// Listings extracted across all pages
    pub listings: usize,

    /// Listing blocks dropped as malformed
    pub skipped_listings: usize,

    /// Pauses taken between pages
    pub pauses: u32,

    pub elapsed: Duration,
}

/// Formats statistics for display
pub fn format_statistics(stats: &CrawlStats) -> String {
    let mut out = String::from("=== Crawl Statistics ===\n");
    out.push_str(&format!("  Pages fetched: {}\n", stats.pages_fetched));
    out.push_str(&format!("  Listings: {}\n", stats.listings));
    out.push_str(&format!("  Skipped listings: {}\n", stats.skipped_listings));
    out.push_str(&format!("  Pauses: {}\n", stats.pauses));
    out.push_str(&format!("  Elapsed: {:.2}s\n", stats.elapsed.as_secs_f64()));
    out
}
