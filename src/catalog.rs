//! Catalog filtering and paging.
//!
//! Mirrors the browsing page: a free-text title search combined with
//! optional year and topic selectors, where `"all"` disables a selector.

use crate::publications::{Publication, Topic};
use serde::{Deserialize, Serialize};

/// Number of records shown before "load more"
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Selector value meaning "no constraint"
pub const ALL: &str = "all";

/// Year selector options, newest first
pub const YEARS: &[&str] = &["2024", "2023", "2022", "2021", "2020"];

/// Filter criteria for the catalog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFilter {
    /// Case-insensitive title substring
    #[serde(default)]
    pub search: Option<String>,
    /// Year as text, or "all"
    #[serde(default)]
    pub year: Option<String>,
    /// Topic label, or "all"
    #[serde(default)]
    pub topic: Option<String>,
}

fn is_unconstrained(selector: Option<&str>) -> bool {
    match selector {
        None => true,
        Some(value) => value.is_empty() || value == ALL,
    }
}

impl CatalogFilter {
    pub fn matches(&self, publication: &Publication) -> bool {
        let matches_search = match self.search.as_deref() {
            Some(term) if !term.is_empty() => publication
                .title
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };

        let matches_year = is_unconstrained(self.year.as_deref())
            || self.year.as_deref() == Some(publication.year.to_string().as_str());

        let matches_topic = is_unconstrained(self.topic.as_deref())
            || self.topic.as_deref() == Some(publication.topic.label());

        matches_search && matches_year && matches_topic
    }

    /// Whether year and topic name selector options that exist.
    ///
    /// An unknown selector is legal but can never match anything.
    pub fn has_known_selectors(&self) -> bool {
        let year_known = is_unconstrained(self.year.as_deref())
            || self.year.as_deref().is_some_and(|y| YEARS.contains(&y));
        let topic_known = is_unconstrained(self.topic.as_deref())
            || self
                .topic
                .as_deref()
                .is_some_and(|t| Topic::ALL.iter().any(|topic| topic.label() == t));
        year_known && topic_known
    }
}

/// Records matching `filter`, in catalog order.
pub fn filter<'a>(publications: &'a [Publication], filter: &CatalogFilter) -> Vec<&'a Publication> {
    publications.iter().filter(|p| filter.matches(p)).collect()
}

/// One page of filtered records
#[derive(Debug, Serialize)]
pub struct Page<'a> {
    /// Size of the whole catalog
    pub total: usize,
    /// Records matching the filter
    pub matched: usize,
    pub offset: usize,
    pub items: Vec<&'a Publication>,
}

impl Page<'_> {
    /// Records left after this page
    pub fn remaining(&self) -> usize {
        self.matched.saturating_sub(self.offset + self.items.len())
    }
}

/// Filter then slice out `limit` records starting at `offset`.
pub fn page<'a>(
    publications: &'a [Publication],
    criteria: &CatalogFilter,
    offset: usize,
    limit: usize,
) -> Page<'a> {
    let matched = filter(publications, criteria);
    let matched_count = matched.len();
    let items = matched.into_iter().skip(offset).take(limit).collect();

    Page {
        total: publications.len(),
        matched: matched_count,
        offset,
        items,
    }
}
