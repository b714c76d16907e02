//! Output module for crawl results
//!
//! This module handles:
//! - Writing listings as JSON lines or a markdown table
//! - Recording and formatting crawl statistics

mod markdown;
pub mod stats;

pub use markdown::format_markdown_table;
pub use stats::{format_statistics, CrawlStats};

use crate::listing::AuctionListing;
use crate::YokuError;
use std::io::Write;

/// How listings are rendered on the output stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,

    /// Markdown table
    Table,
}

/// Writes listings to `writer` in the requested format
pub fn write_listings<W: Write>(
    writer: &mut W,
    listings: &[AuctionListing],
    format: OutputFormat,
) -> Result<(), YokuError> {
    match format {
        OutputFormat::Json => write_json_lines(writer, listings),
        OutputFormat::Table => {
            writer.write_all(format_markdown_table(listings).as_bytes())?;
            Ok(())
        }
    }
}

/// Writes one JSON object per listing, newline separated
pub fn write_json_lines<W: Write>(
    writer: &mut W,
    listings: &[AuctionListing],
) -> Result<(), YokuError> {
    for listing in listings {
        serde_json::to_writer(&mut *writer, listing)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
