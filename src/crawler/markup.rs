//! Markup access for results pages
//!
//! All knowledge of the marketplace's class names lives here. The parser only
//! sees listing blocks, their sub-blocks, and attribute lookups.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static LISTING_BLOCK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.Product__detail").expect("Invalid listing block selector"));

static BONUS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.Product__bonus").expect("Invalid bonus selector"));

static TITLE_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.Product__titleLink").expect("Invalid title link selector"));

static BID_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".Product__bid").expect("Invalid bid selector"));

/// A parsed results page
pub struct ResultsDocument {
    html: Html,
}

impl ResultsDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Returns every listing block, in document order
    pub fn find_listing_blocks(&self) -> Vec<ListingBlock<'_>> {
        self.html
            .select(&LISTING_BLOCK_SELECTOR)
            .map(|element| ListingBlock {
                node: MarkupNode { element },
            })
            .collect()
    }
}

/// The markup fragment for one auction item
#[derive(Clone, Copy)]
pub struct ListingBlock<'a> {
    node: MarkupNode<'a>,
}

impl<'a> ListingBlock<'a> {
    /// Sub-block carrying the auction id and prices
    pub fn bonus(&self) -> Option<MarkupNode<'a>> {
        self.node.first(&BONUS_SELECTOR)
    }

    /// Link carrying the title, image, detail URL, and tracking parameters
    pub fn title_link(&self) -> Option<MarkupNode<'a>> {
        self.node.first(&TITLE_LINK_SELECTOR)
    }

    /// Optional bid counter
    pub fn bid(&self) -> Option<MarkupNode<'a>> {
        self.node.first(&BID_SELECTOR)
    }

    /// Raw markup of the block, for log records
    pub fn outer_html(&self) -> String {
        self.node.element.html()
    }
}

/// An element inside a listing block
#[derive(Clone, Copy)]
pub struct MarkupNode<'a> {
    element: ElementRef<'a>,
}

impl<'a> MarkupNode<'a> {
    fn first(&self, selector: &Selector) -> Option<MarkupNode<'a>> {
        self.element
            .select(selector)
            .next()
            .map(|element| MarkupNode { element })
    }

    /// Attribute value, `None` when the attribute is absent
    pub fn extract_attribute(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Concatenated, trimmed text content
    pub fn text(&self) -> String {
        self.element.text().collect::<String>().trim().to_string()
    }
}
