//! Core data models used throughout Newsroom Search.
//!
//! [`Article`] is the read-only record supplied by the content source.
//! [`SearchResult`] is the per-query annotation the engine builds on top of
//! it; results borrow their article and never copy or mutate it.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A text-bearing article field as delivered by the CMS.
///
/// Plain strings pass through unchanged. Anything else (a node tree, a
/// block array, a stray number) is kept as raw JSON and handed to a
/// [`TextResolver`](crate::richtext::TextResolver) before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RichField {
    Plain(String),
    Document(serde_json::Value),
}

impl From<&str> for RichField {
    fn from(s: &str) -> Self {
        RichField::Plain(s.to_string())
    }
}

impl From<String> for RichField {
    fn from(s: String) -> Self {
        RichField::Plain(s)
    }
}

impl From<serde_json::Value> for RichField {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => RichField::Plain(s),
            other => RichField::Document(other),
        }
    }
}

/// A published article.
///
/// Every field except `id` is optional in the source data. Absent text is
/// scored as empty text, absent flags are `false`, and absent tags are an
/// empty list. JSON keys follow the CMS's camelCase naming.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<RichField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<RichField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<RichField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_breaking_news: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub editors_pick: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

impl Article {
    /// Convenience constructor for an article with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Title for display, falling back to `(untitled)`.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}

/// CMS exports write `null` for unset flags and lists.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The article fields the engine scores, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Summary,
    Content,
    Author,
    Category,
    Tags,
}

impl SearchField {
    /// All fields in the order they are evaluated.
    pub const ALL: [SearchField; 6] = [
        SearchField::Title,
        SearchField::Summary,
        SearchField::Content,
        SearchField::Author,
        SearchField::Category,
        SearchField::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Summary => "summary",
            SearchField::Content => "content",
            SearchField::Author => "author",
            SearchField::Category => "category",
            SearchField::Tags => "tags",
        }
    }

    /// Fields matched only on the full query phrase, never on single words.
    pub fn is_phrase_only(&self) -> bool {
        matches!(
            self,
            SearchField::Author | SearchField::Category | SearchField::Tags
        )
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An article that matched a query, annotated with its score.
///
/// Serialises as the article's own fields plus `relevanceScore` and
/// `matchedFields`, which is the shape the presentation layer consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<'a> {
    #[serde(flatten)]
    pub article: &'a Article,
    pub relevance_score: u32,
    /// Fields that contributed text-match points, in evaluation order.
    pub matched_fields: Vec<SearchField>,
}
