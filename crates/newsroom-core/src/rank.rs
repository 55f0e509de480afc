//! Result ordering and category filtering.
//!
//! Both sorts are stable, so results with equal keys keep the order of the
//! input article collection.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::SearchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Highest `relevance_score` first.
    #[default]
    Relevance,
    /// Newest `published_date` first; undated articles last.
    Date,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::Date => "date",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" | "score" => Ok(SortOrder::Relevance),
            "date" | "newest" => Ok(SortOrder::Date),
            _ => Err(Error::UnknownSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a `publishedDate` value.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as
/// UTC), and bare `YYYY-MM-DD` dates.
pub fn parse_published(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Sort key for date ordering; missing or unparseable dates are the minimum.
fn published_key(result: &SearchResult<'_>) -> DateTime<Utc> {
    result
        .article
        .published_date
        .as_deref()
        .and_then(parse_published)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn sort_results(results: &mut [SearchResult<'_>], order: SortOrder) {
    match order {
        SortOrder::Relevance => results.sort_by_key(|r| Reverse(r.relevance_score)),
        SortOrder::Date => results.sort_by_cached_key(|r| Reverse(published_key(r))),
    }
}

/// Restricts results to a single category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `None`, empty, and `"all"` mean no filtering.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => CategoryFilter::All,
            Some(v) if v.eq_ignore_ascii_case("all") => CategoryFilter::All,
            Some(v) => CategoryFilter::Only(v.to_string()),
        }
    }

    pub fn matches(&self, category: Option<&str>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => category == Some(wanted.as_str()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(c) => c,
        }
    }
}

pub fn filter_category(results: &mut Vec<SearchResult<'_>>, filter: &CategoryFilter) {
    results.retain(|r| filter.matches(r.article.category.as_deref()));
}
