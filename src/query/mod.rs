//! Search query construction
//!
//! This module turns an ordered set of search parameters into the request URL
//! for a single results page.
//!
//! # Example
//!
//! ```
//! use yoku::config::SearchConfig;
//! use yoku::query::{QueryBuilder, SearchParameters};
//!
//! let mut params = SearchParameters::new();
//! params.insert("p", "camera");
//!
//! let builder = QueryBuilder::new(SearchConfig::default());
//! let request = builder.build(&params, 2).unwrap();
//! assert_eq!(request.offset, 101);
//! ```

mod builder;

pub use builder::{PageRequest, QueryBuilder};

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Primary free-text query keys; one of them must be present
pub const PRIMARY_QUERY_KEYS: [&str; 2] = ["p", "va"];

/// Keys whose values are free text and must be percent-escaped
pub const QUERY_TEXT_KEYS: [&str; 4] = ["p", "va", "vo", "ve"];

/// Auction status filter key
pub const STATUS_KEY: &str = "istatus";

pub const SORT_FIELD_KEY: &str = "s1";
pub const SORT_ORDER_KEY: &str = "o1";
pub const OFFSET_KEY: &str = "b";
pub const PAGE_SIZE_KEY: &str = "n";

/// A single search parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    IntList(Vec<i64>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Int(n) => write!(f, "{}", n),
            Self::IntList(values) => {
                let joined = values
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{}", joined)
            }
        }
    }
}

/// Parses command-line style values: `42` is an integer, `1,2,3` an integer
/// list, anything else text.
///
/// Numbers are only recognized in their canonical spelling, so `007`, `+5`
/// and `1, 2` stay text and reach the query unchanged.
impl FromStr for ParamValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(n) = parse_canonical(s) {
            return Ok(Self::Int(n));
        }

        if s.contains(',') {
            let parsed: Option<Vec<i64>> = s.split(',').map(parse_canonical).collect();
            if let Some(values) = parsed {
                return Ok(Self::IntList(values));
            }
        }

        Ok(Self::Text(s.to_string()))
    }
}

impl ParamValue {
    /// Parses a raw value for `key`
    ///
    /// Free-text keys always keep the value as text.
    pub fn parse_for(key: &str, raw: &str) -> Self {
        if QUERY_TEXT_KEYS.contains(&key) {
            return Self::Text(raw.to_string());
        }

        match raw.parse() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

fn parse_canonical(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().filter(|n| n.to_string() == s)
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(value: Vec<i64>) -> Self {
        Self::IntList(value)
    }
}

/// Ordered mapping from parameter name to value
///
/// Serialization follows insertion order. Inserting an existing key replaces
/// its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParameters {
    entries: Vec<(String, ParamValue)>,
}

impl SearchParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a parameter, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for SearchParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut params = SearchParameters::new();
        params.insert("p", "camera");
        params.insert("istatus", vec![1, 2]);
        params.insert("aucmaxprice", 5000i64);

        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["p", "istatus", "aucmaxprice"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params: SearchParameters = [("p", "camera"), ("s1", "new")].into_iter().collect();

        let previous = params.insert("p", "lens");
        assert_eq!(previous, Some(ParamValue::Text("camera".to_string())));
        assert_eq!(params.len(), 2);
        assert_eq!(params.iter().next().map(|(k, _)| k), Some("p"));
        assert_eq!(params.get("p"), Some(&ParamValue::from("lens")));
    }

    #[test]
    fn test_remove() {
        let mut params: SearchParameters = [("p", "camera"), ("o1", "a")].into_iter().collect();
        assert!(params.remove("o1").is_some());
        assert!(!params.contains_key("o1"));
        assert!(params.remove("o1").is_none());
    }

    #[test]
    fn test_parse_values() {
        assert_eq!("42".parse::<ParamValue>().unwrap(), ParamValue::Int(42));
        assert_eq!(
            "1,2,3".parse::<ParamValue>().unwrap(),
            ParamValue::IntList(vec![1, 2, 3])
        );
        assert_eq!("-3".parse::<ParamValue>().unwrap(), ParamValue::Int(-3));
        assert_eq!(
            "vintage camera".parse::<ParamValue>().unwrap(),
            ParamValue::from("vintage camera")
        );
        assert_eq!(
            "a,b".parse::<ParamValue>().unwrap(),
            ParamValue::from("a,b")
        );
    }

    #[test]
    fn test_non_canonical_numbers_stay_text() {
        for raw in ["007", "+5", "1, 2", "1,,2", " 42"] {
            let value: ParamValue = raw.parse().unwrap();
            assert_eq!(value, ParamValue::from(raw));
            assert_eq!(value.to_string(), raw);
        }
    }

    #[test]
    fn test_text_keys_keep_text() {
        assert_eq!(ParamValue::parse_for("p", "007"), ParamValue::from("007"));
        assert_eq!(ParamValue::parse_for("vo", "1,2"), ParamValue::from("1,2"));
        assert_eq!(ParamValue::parse_for("va", "42"), ParamValue::from("42"));
        assert_eq!(ParamValue::parse_for("aucmaxprice", "5000"), ParamValue::Int(5000));
        assert_eq!(ParamValue::parse_for("istatus", "1,2"), ParamValue::IntList(vec![1, 2]));
    }

    #[test]
    fn test_parsed_text_reaches_url_unchanged() {
        use crate::config::SearchConfig;

        let params: SearchParameters = [("p", "007"), ("vo", "1, 2")]
            .into_iter()
            .map(|(k, v)| (k, ParamValue::parse_for(k, v)))
            .collect();
        let request = QueryBuilder::new(SearchConfig::default()).build(&params, 1).unwrap();

        assert!(request.url.contains("p=007"), "{}", request.url);
        assert!(request.url.contains("vo=1%2C+2"), "{}", request.url);
    }

    #[test]
    fn test_display() {
        assert_eq!(ParamValue::IntList(vec![1, 2]).to_string(), "1,2");
        assert_eq!(ParamValue::Int(-3).to_string(), "-3");
        assert_eq!(ParamValue::from("x y").to_string(), "x y");
    }
}
