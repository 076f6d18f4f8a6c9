//! Collection and merging of query-string entries.

use indexmap::IndexMap;

/// Query option keys as written in the URI.
pub mod keys {
    pub const SKIP: &str = "$skip";
    pub const TOP: &str = "$top";
    pub const ORDER_BY: &str = "$orderby";
    pub const FILTER: &str = "$filter";
    pub const APPLY: &str = "$apply";
    pub const EXPAND: &str = "$expand";
    pub const SELECT: &str = "$select";
    pub const COUNT: &str = "$count";
}

/// Values grouped by option key.
///
/// Keys keep the order they were first added in. Adding under an existing
/// key appends to its values, and all values for a key are written as one
/// comma-joined entry.
///
/// ```
/// use odata_uri_writer::query_options::QueryOptionBuckets;
///
/// let mut buckets = QueryOptionBuckets::new();
/// buckets.add("$filter", "Age gt 10");
/// buckets.add("a", "1");
/// buckets.add("a", "2");
/// assert_eq!(buckets.render(), "$filter=Age gt 10&a=1,2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryOptionBuckets {
    buckets: IndexMap<String, Vec<String>>,
}

impl QueryOptionBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.buckets.entry(key.into()).or_default().push(value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn render(&self) -> String {
        self.buckets
            .iter()
            .map(|(key, values)| format!("{}={}", key, values.join(",")))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order_kept() {
        let mut buckets = QueryOptionBuckets::new();
        buckets.add(keys::TOP, "10");
        buckets.add(keys::FILTER, "A eq 1");
        buckets.add(keys::TOP, "5");
        assert_eq!(buckets.render(), "$top=10,5&$filter=A eq 1");
    }

    #[test]
    fn test_empty_renders_nothing() {
        let buckets = QueryOptionBuckets::new();
        assert!(buckets.is_empty());
        assert_eq!(buckets.render(), "");
    }
}
