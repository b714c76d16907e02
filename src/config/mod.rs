//! Configuration module for Yoku
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to the marketplace defaults.
//!
//! # Example
//!
//! ```no_run
//! use yoku::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("yoku.toml")).unwrap();
//! println!("Page size: {}", config.search.page_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, ParserConfig, SearchConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
