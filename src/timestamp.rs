//! Timestamp decoding
//!
//! The marketplace does not expose posting or auction times as markup. They
//! are recovered from two places instead:
//!
//! - image filenames, `...-img<W>x<H>-<unix seconds><suffix>` (post time)
//! - the title link's tracking parameters, `...etm=<unix>,stm=<unix>...`
//!   (end and start time)
//!
//! Older listings may use the seller id before `-img`, which the post pattern
//! accepts as well.

use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Display format for every decoded timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

static POST_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^.*-img\d+x\d+-(\d{10}).*$").expect("Invalid post timestamp regex")
});

static AUCTION_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^.*etm=(\d{10}),stm=(\d{10}).*$").expect("Invalid auction timestamp regex")
});

/// Named local zone, so `%Z` renders an abbreviation such as `JST`
///
/// `TZ` wins over the system setting. `None` when neither names a known zone.
static LOCAL_ZONE: Lazy<Option<Tz>> = Lazy::new(|| resolve_local_zone(std::env::var("TZ").ok()));

fn resolve_local_zone(tz_env: Option<String>) -> Option<Tz> {
    let from_env = tz_env.and_then(|name| zone_from_name(&name));
    let zone = from_env.or_else(|| match iana_time_zone::get_timezone() {
        Ok(name) => zone_from_name(&name),
        Err(e) => {
            tracing::debug!("Could not determine local timezone name: {}", e);
            None
        }
    });

    if zone.is_none() {
        tracing::debug!("Local timezone has no known name, formatting with a numeric offset");
    }
    zone
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("Unix timestamp {0} is out of range")]
    OutOfRange(i64),
}

/// End and start of an auction, in unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionWindow {
    pub end: i64,
    pub start: i64,
}

/// Extracts the post timestamp from an image URL
///
/// Returns `None` when the filename does not carry one; the caller picks the
/// fallback.
pub fn decode_post_timestamp(image_url: &str) -> Option<i64> {
    POST_TIMESTAMP_REGEX
        .captures(image_url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extracts the auction end and start timestamps from a tracking-parameter string
pub fn decode_auction_window(cl_params: &str) -> Option<AuctionWindow> {
    let caps = AUCTION_TIMESTAMP_REGEX.captures(cl_params)?;
    let end = caps.get(1)?.as_str().parse().ok()?;
    let start = caps.get(2)?.as_str().parse().ok()?;
    Some(AuctionWindow { end, start })
}

/// Formats unix seconds in the process's local timezone
///
/// The output is for display only and drops sub-second precision. The zone
/// is an abbreviation when the local zone has a known name, otherwise the
/// numeric offset.
pub fn format_timestamp(secs: i64) -> Result<String, TimestampError> {
    match *LOCAL_ZONE {
        Some(zone) => format_in_zone(secs, &zone),
        None => format_in_zone(secs, &Local),
    }
}

/// Formats unix seconds in the given zone
pub fn format_in_zone<Z: TimeZone>(secs: i64, zone: &Z) -> Result<String, TimestampError>
where
    Z::Offset: std::fmt::Display,
{
    let utc = DateTime::<Utc>::from_timestamp(secs, 0).ok_or(TimestampError::OutOfRange(secs))?;
    Ok(utc.with_timezone(zone).format(TIMESTAMP_FORMAT).to_string())
}

/// Resolves an IANA zone name, accepting the `:Area/City` form `TZ` allows
fn zone_from_name(name: &str) -> Option<Tz> {
    name.trim().trim_start_matches(':').parse().ok()
}
