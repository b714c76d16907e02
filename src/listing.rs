/// Listing records produced by the result parser
///
/// Records are built once per page parse and never mutated afterwards.
use serde::Serialize;
use std::fmt;

/// One auction item from a results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuctionListing {
    pub title: String,

    /// Thumbnail URL; the post timestamp is decoded from its filename
    #[serde(rename = "image")]
    pub image_url: String,

    /// Detail page URL
    #[serde(rename = "url")]
    pub detail_url: String,

    pub item_id: String,

    // Prices are passed through exactly as the page renders them
    pub buynow_price: String,
    pub current_price: String,
    pub start_price: String,

    #[serde(rename = "bids")]
    pub bid_count: u32,

    pub post_timestamp: String,
    pub start_timestamp: String,
    pub end_timestamp: String,
}

/// Why a page was treated as empty before any extraction ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// The search had no matches
    NoResults,

    /// The engine dropped some keywords and returned loosely related results
    KeywordFallback,
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoResults => "no results",
            Self::KeywordFallback => "partial-keyword fallback",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of parsing one results page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Extracted listings, in page order
    pub listings: Vec<AuctionListing>,

    /// True iff at least one listing was extracted
    pub has_more: bool,

    /// Listing blocks dropped as malformed
    pub skipped: usize,

    /// Set when a sentinel phrase short-circuited the parse
    pub sentinel: Option<Sentinel>,
}

impl PageResult {
    /// A terminal page recognised by its sentinel text
    pub fn sentinel(sentinel: Sentinel) -> Self {
        Self {
            sentinel: Some(sentinel),
            ..Self::default()
        }
    }

    /// Builds a result whose continuation flag follows from the listings
    pub fn from_listings(listings: Vec<AuctionListing>, skipped: usize) -> Self {
        Self {
            has_more: !listings.is_empty(),
            listings,
            skipped,
            sentinel: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str) -> AuctionListing {
        AuctionListing {
            title: "Camera".to_string(),
            image_url: String::new(),
            detail_url: format!("https://page.auctions.yahoo.co.jp/jp/auction/{}", id),
            item_id: id.to_string(),
            buynow_price: "0".to_string(),
            current_price: "1000".to_string(),
            start_price: "1000".to_string(),
            bid_count: 0,
            post_timestamp: String::new(),
            start_timestamp: String::new(),
            end_timestamp: String::new(),
        }
    }

    #[test]
    fn test_continuation_follows_listings() {
        assert!(PageResult::from_listings(vec![listing("a1")], 0).has_more);
        assert!(!PageResult::from_listings(vec![], 3).has_more);
    }

    #[test]
    fn test_sentinel_page_is_terminal() {
        let result = PageResult::sentinel(Sentinel::KeywordFallback);
        assert!(!result.has_more);
        assert!(result.listings.is_empty());
        assert_eq!(result.sentinel, Some(Sentinel::KeywordFallback));
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(listing("x123")).unwrap();
        assert_eq!(value["url"], "https://page.auctions.yahoo.co.jp/jp/auction/x123");
        assert_eq!(value["item_id"], "x123");
        assert_eq!(value["bids"], 0);
        assert!(value.get("image").is_some());
    }
}
