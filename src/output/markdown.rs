//! Markdown table rendering
//!
//! Produces a human-readable table of listings for terminal use.

use crate::listing::AuctionListing;

const HEADER: &str = "| ID | Title | Price | Buy-now | Bids | Start | End | URL |\n";
const SEPARATOR: &str = "|---|---|---|---|---|---|---|---|\n";

/// Formats listings as a markdown table
pub fn format_markdown_table(listings: &[AuctionListing]) -> String {
    let mut md = String::with_capacity(HEADER.len() + SEPARATOR.len() + listings.len() * 160);
    md.push_str(HEADER);
    md.push_str(SEPARATOR);

    for listing in listings {
        let buynow = if listing.buynow_price.is_empty() {
            "-"
        } else {
            listing.buynow_price.as_str()
        };

        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            listing.item_id,
            escape_cell(&listing.title),
            listing.current_price,
            buynow,
            listing.bid_count,
            listing.start_timestamp,
            listing.end_timestamp,
            listing.detail_url
        ));
    }

    md
}

/// Escapes characters that would break a table row
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
