use crate::config::SearchConfig;
use crate::query::{
    ParamValue, SearchParameters, OFFSET_KEY, PAGE_SIZE_KEY, PRIMARY_QUERY_KEYS, QUERY_TEXT_KEYS,
    SORT_FIELD_KEY, SORT_ORDER_KEY, STATUS_KEY,
};
use crate::YokuError;
use url::form_urlencoded;

/// URL-escaped comma used to join status lists
const ESCAPED_COMMA: &str = "%2C";

/// A ready-to-fetch request for one results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Fully resolved request URL
    pub url: String,

    /// 1-based page number
    pub page: u32,

    /// 1-based index of the first result on this page (`b`)
    pub offset: u64,

    /// Results per page (`n`)
    pub page_size: u32,
}

/// Builds page requests against the configured endpoint
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    config: SearchConfig,
}

impl QueryBuilder {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Offset of the first result on a 1-based page
    pub fn offset_for(&self, page: u32) -> u64 {
        u64::from(page.saturating_sub(1)) * u64::from(self.config.page_size) + 1
    }

    /// Builds the request for `page` of the given search
    ///
    /// Fills in the default sort only when neither `s1` nor `o1` is present,
    /// and always overwrites `b` and `n`.
    ///
    /// # Errors
    ///
    /// * `YokuError::InvalidQuery` - neither `p` nor `va` is present, or `page` is 0
    pub fn build(&self, params: &SearchParameters, page: u32) -> Result<PageRequest, YokuError> {
        if !PRIMARY_QUERY_KEYS.iter().any(|key| params.contains_key(key)) {
            return Err(YokuError::InvalidQuery(
                "no query provided: one of 'p' or 'va' is required".to_string(),
            ));
        }

        if page == 0 {
            return Err(YokuError::InvalidQuery(
                "page numbers start at 1".to_string(),
            ));
        }

        let mut params = params.clone();

        if !params.contains_key(SORT_FIELD_KEY) && !params.contains_key(SORT_ORDER_KEY) {
            params.insert(SORT_FIELD_KEY, self.config.default_sort_field.as_str());
            params.insert(SORT_ORDER_KEY, self.config.default_sort_order.as_str());
        }

        let offset = self.offset_for(page);
        let page_size = self.config.page_size;

        if let Some(previous) = params.insert(OFFSET_KEY, ParamValue::Int(offset as i64)) {
            tracing::warn!(
                "Ignoring caller-supplied offset b={}, using {}",
                previous,
                offset
            );
        }
        if let Some(previous) = params.insert(PAGE_SIZE_KEY, page_size) {
            tracing::warn!(
                "Ignoring caller-supplied page size n={}, using {}",
                previous,
                page_size
            );
        }

        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, serialize_value(key, value)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!("{}?{}", self.config.endpoint, query);
        tracing::trace!("Built page {} request: {}", page, url);

        Ok(PageRequest {
            url,
            page,
            offset,
            page_size,
        })
    }
}

/// Serializes one parameter value for the query string
fn serialize_value(key: &str, value: &ParamValue) -> String {
    if QUERY_TEXT_KEYS.contains(&key) {
        return escape(&value.to_string());
    }

    match (key, value) {
        (STATUS_KEY, ParamValue::IntList(values)) => values
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(ESCAPED_COMMA),
        _ => value.to_string(),
    }
}

/// Form-style percent escaping (space becomes `+`)
fn escape(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}
