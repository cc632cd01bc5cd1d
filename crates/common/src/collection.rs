//! Paged, filterable query results.
//!
//! Every collection call site documents which filter keys the server honors
//! for it. Keys outside that set are still sent; the server decides what to
//! do with them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Query parameter recognized by collection endpoints
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterKey {
    AdvancedQuery,
    AllTags,
    Linked,
    Id,
    Name,
    Type,
    State,
    Tags,
    Number,
    ModifiedSince,
    Owner,
    Enabled,
    Ip,
    Model,
    Vendor,
    StartTime,
    EndTime,
    /// Server-specific key not modeled above
    Custom(String),
}

impl FilterKey {
    pub fn as_str(&self) -> &str {
        match self {
            FilterKey::AdvancedQuery => "advancedQuery",
            FilterKey::AllTags => "allTags",
            FilterKey::Linked => "linked",
            FilterKey::Id => "id",
            FilterKey::Name => "name",
            FilterKey::Type => "type",
            FilterKey::State => "state",
            FilterKey::Tags => "tags",
            FilterKey::Number => "number",
            FilterKey::ModifiedSince => "modifiedSince",
            FilterKey::Owner => "owner",
            FilterKey::Enabled => "enabled",
            FilterKey::Ip => "ip",
            FilterKey::Model => "model",
            FilterKey::Vendor => "vendor",
            FilterKey::StartTime => "startTime",
            FilterKey::EndTime => "endTime",
            FilterKey::Custom(key) => key,
        }
    }

    /// Key for a wire name; names not modeled become `Custom`
    pub fn parse(name: &str) -> Self {
        const KNOWN: [FilterKey; 17] = [
            FilterKey::AdvancedQuery,
            FilterKey::AllTags,
            FilterKey::Linked,
            FilterKey::Id,
            FilterKey::Name,
            FilterKey::Type,
            FilterKey::State,
            FilterKey::Tags,
            FilterKey::Number,
            FilterKey::ModifiedSince,
            FilterKey::Owner,
            FilterKey::Enabled,
            FilterKey::Ip,
            FilterKey::Model,
            FilterKey::Vendor,
            FilterKey::StartTime,
            FilterKey::EndTime,
        ];
        KNOWN
            .into_iter()
            .find(|key| key.as_str() == name)
            .unwrap_or_else(|| FilterKey::Custom(name.to_string()))
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub key: FilterKey,
    pub value: String,
}

/// Filters plus paging window for a collection request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    pub filters: Vec<Filter>,
    /// Index of the first item to return
    pub start: usize,
    /// Page size; `None` lets the server decide
    pub count: Option<usize>,
}

impl CollectionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.filters.push(Filter {
            key,
            value: value.into(),
        });
        self
    }

    pub fn page(mut self, start: usize, count: usize) -> Self {
        self.start = start;
        self.count = Some(count);
        self
    }

    /// Keys in this query that the call site does not list as supported
    pub fn outside_allowlist<'a>(&'a self, allowed: &[FilterKey]) -> Vec<&'a FilterKey> {
        self.filters
            .iter()
            .map(|f| &f.key)
            .filter(|key| !allowed.contains(key))
            .collect()
    }

    /// Wire query parameters, in insertion order
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|f| (f.key.as_str().to_string(), f.value.clone()))
            .collect();
        if self.start > 0 {
            pairs.push(("start".to_string(), self.start.to_string()));
        }
        if let Some(count) = self.count {
            pairs.push(("count".to_string(), count.to_string()));
        }
        pairs
    }
}

/// Wire form of a collection response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Defaults to the page length when the server omits it
    #[serde(default)]
    pub total_count: Option<usize>,
}

/// Ordered snapshot of one page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    pub items: Vec<T>,
    /// Number of matching items on the server, across all pages
    pub total_count: usize,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

impl<T> Collection<T> {
    pub fn new(items: Vec<T>, total_count: usize) -> Self {
        Self { items, total_count }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the server holds items beyond this page
    pub fn has_more(&self, query: &CollectionQuery) -> bool {
        query.start + self.items.len() < self.total_count
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Collection<U> {
        Collection {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }

    /// Copy the page into a caller-provided buffer.
    ///
    /// Fails with `InsufficientSize` when `out` is shorter than the page;
    /// `out` is left untouched in that case.
    pub fn fill_into(&self, out: &mut [T]) -> Result<usize>
    where
        T: Clone,
    {
        if out.len() < self.items.len() {
            return Err(Error::InsufficientSize {
                needed: self.items.len(),
                available: out.len(),
            });
        }
        out[..self.items.len()].clone_from_slice(&self.items);
        Ok(self.items.len())
    }
}

impl<T> From<CollectionPage<T>> for Collection<T> {
    fn from(page: CollectionPage<T>) -> Self {
        let total_count = page.total_count.unwrap_or(page.items.len());
        Self {
            items: page.items,
            total_count,
        }
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ResultCode;

    #[test]
    fn test_filter_key_parse() {
        assert_eq!(FilterKey::parse("modifiedSince"), FilterKey::ModifiedSince);
        assert_eq!(FilterKey::parse("site"), FilterKey::Custom("site".into()));
        assert_eq!(FilterKey::parse("site").as_str(), "site");
    }

    #[test]
    fn test_query_pairs() {
        let query = CollectionQuery::new()
            .filter(FilterKey::Name, "lobby")
            .filter(FilterKey::Custom("siteId".into()), "7")
            .page(20, 10);
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("name".to_string(), "lobby".to_string()),
                ("siteId".to_string(), "7".to_string()),
                ("start".to_string(), "20".to_string()),
                ("count".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_outside_allowlist() {
        let query = CollectionQuery::new()
            .filter(FilterKey::AdvancedQuery, "x")
            .filter(FilterKey::Vendor, "pelco");
        let extra = query.outside_allowlist(&[FilterKey::AdvancedQuery, FilterKey::AllTags]);
        assert_eq!(extra, vec![&FilterKey::Vendor]);
    }

    #[test]
    fn test_empty_page_is_valid() {
        let page: CollectionPage<u32> = serde_json::from_str("{}").unwrap();
        let collection = Collection::from(page);
        assert!(collection.is_empty());
        assert_eq!(collection.total_count, 0);
        assert!(!collection.has_more(&CollectionQuery::new()));
    }

    #[test]
    fn test_total_count_and_paging() {
        let page: CollectionPage<u32> =
            serde_json::from_str(r#"{"items":[1,2,3],"totalCount":10}"#).unwrap();
        let collection = Collection::from(page);
        assert_eq!(collection.len(), 3);
        assert!(collection.has_more(&CollectionQuery::new().page(0, 3)));
        assert!(!collection.has_more(&CollectionQuery::new().page(7, 3)));
    }

    #[test]
    fn test_fill_into() {
        let collection = Collection::new(vec![1, 2, 3], 3);

        let mut small = [0; 2];
        let err = collection.fill_into(&mut small).unwrap_err();
        assert_eq!(err.code(), ResultCode::InsufficientSize);
        assert_eq!(small, [0, 0]);

        let mut big = [0; 5];
        assert_eq!(collection.fill_into(&mut big).unwrap(), 3);
        assert_eq!(big, [1, 2, 3, 0, 0]);
    }
}
