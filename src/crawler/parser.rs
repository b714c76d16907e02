//! Results page parser
//!
//! Turns one results page into listing records and a continuation flag.
//! A single bad listing block is logged and skipped; it never aborts the page.

use crate::config::ParserConfig;
use crate::crawler::markup::{ListingBlock, ResultsDocument};
use crate::listing::{AuctionListing, PageResult, Sentinel};
use crate::timestamp::{decode_auction_window, decode_post_timestamp, format_timestamp, TimestampError};
use std::collections::HashSet;
use thiserror::Error;

/// Why a listing block was skipped
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("missing {0} sub-block")]
    MissingSubBlock(&'static str),

    #[error("missing or empty attribute {0}")]
    MissingAttribute(&'static str),

    #[error("tracking parameters carry no etm/stm timestamps: {0}")]
    TrackingMismatch(String),

    #[error("timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    #[error("duplicate item id {0}")]
    DuplicateId(String),
}

/// Checks the page for sentinel phrases
///
/// The fallback phrase is checked first since it is the more specific one.
pub fn detect_sentinel(markup: &str, config: &ParserConfig) -> Option<Sentinel> {
    if markup.contains(&config.fallback_text) {
        Some(Sentinel::KeywordFallback)
    } else if markup.contains(&config.no_results_text) {
        Some(Sentinel::NoResults)
    } else {
        None
    }
}

/// Parses one results page
///
/// # Returns
///
/// A `PageResult` whose `has_more` flag is true iff at least one listing was
/// extracted. Sentinel pages return an empty, terminal result without
/// looking at the markup structure.
pub fn parse_results(markup: &str, config: &ParserConfig) -> PageResult {
    if let Some(sentinel) = detect_sentinel(markup, config) {
        tracing::info!("Page has {} sentinel, nothing to extract", sentinel);
        return PageResult::sentinel(sentinel);
    }

    let document = ResultsDocument::parse(markup);
    let blocks = document.find_listing_blocks();

    let mut listings = Vec::with_capacity(blocks.len());
    let mut seen_ids = HashSet::new();
    let mut skipped = 0;

    for block in &blocks {
        let listing = extract_listing(block).and_then(|listing| {
            if seen_ids.insert(listing.item_id.clone()) {
                Ok(listing)
            } else {
                Err(ListingError::DuplicateId(listing.item_id))
            }
        });

        match listing {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                tracing::warn!("Skipping listing: {}", e);
                tracing::debug!("Skipped block: {}", block.outer_html());
                skipped += 1;
            }
        }
    }

    tracing::debug!(
        "Parsed {} listings from {} blocks ({} skipped)",
        listings.len(),
        blocks.len(),
        skipped
    );

    PageResult::from_listings(listings, skipped)
}

/// Extracts a single listing from its block
fn extract_listing(block: &ListingBlock<'_>) -> Result<AuctionListing, ListingError> {
    let bonus = block
        .bonus()
        .ok_or(ListingError::MissingSubBlock("Product__bonus"))?;
    let title_link = block
        .title_link()
        .ok_or(ListingError::MissingSubBlock("Product__titleLink"))?;

    let title = required(title_link.extract_attribute("data-auction-title"), "data-auction-title")?;
    let detail_url = required(title_link.extract_attribute("href"), "href")?;
    let cl_params = required(title_link.extract_attribute("data-cl-params"), "data-cl-params")?;
    let image_url = title_link.extract_attribute("data-auction-img").unwrap_or_default();

    let window = decode_auction_window(cl_params)
        .ok_or_else(|| ListingError::TrackingMismatch(format!("href={}, cl_params={}", detail_url, cl_params)))?;

    let post = decode_post_timestamp(image_url).unwrap_or_else(|| {
        tracing::debug!("No post timestamp in image URL '{}', using epoch", image_url);
        0
    });

    let item_id = required(bonus.extract_attribute("data-auction-id"), "data-auction-id")?;
    let price = |name: &str| bonus.extract_attribute(name).unwrap_or_default().to_string();

    let bid_count = match block.bid() {
        Some(bid) => {
            let text = bid.text();
            text.parse().unwrap_or_else(|_| {
                tracing::warn!("Unreadable bid count '{}' for {}, using 0", text, item_id);
                0
            })
        }
        None => 0,
    };

    Ok(AuctionListing {
        title: title.to_string(),
        image_url: image_url.to_string(),
        detail_url: detail_url.to_string(),
        item_id: item_id.to_string(),
        buynow_price: price("data-auction-buynowprice"),
        current_price: price("data-auction-price"),
        start_price: price("data-auction-startprice"),
        bid_count,
        post_timestamp: format_timestamp(post)?,
        start_timestamp: format_timestamp(window.start)?,
        end_timestamp: format_timestamp(window.end)?,
    })
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ListingError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ListingError::MissingAttribute(name))
}
