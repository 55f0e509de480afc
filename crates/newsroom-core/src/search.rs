//! Relevance scoring and the search pipeline.
//!
//! The engine scans every article, so it needs no index. Each article
//! is scored independently, field by field, and the contributions add up.
//!
//! # Scoring Algorithm
//!
//! For every field in [`SearchField::ALL`] order, on lower-cased field text:
//!
//! 1. **Phrase match**: the whole normalized query is a substring → the
//!    field's phrase weight, and the field is recorded once.
//! 2. **Word match** (only when step 1 did not fire, and only for fields
//!    with a word weight): each query word found as a substring adds the
//!    field's word weight. The field is recorded once however many words hit.
//! 3. Tags are phrase-matched one tag at a time. Every matching tag adds
//!    points, but `tags` is recorded once.
//!
//! Editorial boosts are added only to articles that already scored on
//! text, and they never add a field name. Articles scoring zero are dropped.
//!
//! [`run`] layers the caller-selected sort, category filter, and limit on
//! top of [`search`].

use crate::models::{Article, RichField, SearchField, SearchResult};
use crate::profile::{FieldWeight, ScoringProfile};
use crate::rank::{filter_category, sort_results, CategoryFilter, SortOrder};
use crate::richtext::TextResolver;

/// A query after trimming, lower-casing, and whitespace tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub phrase: String,
    pub words: Vec<String>,
}

/// Normalize a raw query. Returns `None` when nothing is left to match.
pub fn normalize_query(raw: &str) -> Option<NormalizedQuery> {
    let phrase = raw.trim().to_lowercase();
    if phrase.is_empty() {
        return None;
    }
    let words = phrase.split_whitespace().map(str::to_string).collect();
    Some(NormalizedQuery { phrase, words })
}

/// Points and matched fields accumulated for one article.
#[derive(Debug, Default)]
struct Tally {
    score: u32,
    fields: Vec<SearchField>,
}

impl Tally {
    fn add(&mut self, field: SearchField, points: u32) {
        self.score = self.score.saturating_add(points);
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
    }

    fn score_text(&mut self, field: SearchField, text: &str, weight: FieldWeight, q: &NormalizedQuery) {
        if weight.is_disabled() || text.is_empty() {
            return;
        }
        let text = text.to_lowercase();
        if text.contains(&q.phrase) {
            self.add(field, weight.phrase);
            return;
        }
        if let Some(word_points) = weight.word.filter(|&w| w > 0) {
            for word in &q.words {
                if text.contains(word.as_str()) {
                    self.add(field, word_points);
                }
            }
        }
    }
}

fn resolve_field<R: TextResolver + ?Sized>(field: Option<&RichField>, resolver: &R) -> String {
    field.map(|f| resolver.resolve(f)).unwrap_or_default()
}

/// Score one article against a normalized query.
///
/// Returns `None` when the article has no text match.
pub fn score_article<R: TextResolver + ?Sized>(
    article: &Article,
    query: &NormalizedQuery,
    profile: &ScoringProfile,
    resolver: &R,
) -> Option<(u32, Vec<SearchField>)> {
    let mut tally = Tally::default();

    for field in SearchField::ALL {
        let weight = profile.weight(field);
        match field {
            SearchField::Title => {
                tally.score_text(field, article.title.as_deref().unwrap_or(""), weight, query)
            }
            SearchField::Summary => {
                let text = resolve_field(article.summary.as_ref(), resolver);
                tally.score_text(field, &text, weight, query);
            }
            SearchField::Content => {
                let text = resolve_field(article.content.as_ref(), resolver);
                tally.score_text(field, &text, weight, query);
            }
            SearchField::Author => {
                let text = resolve_field(article.author.as_ref(), resolver);
                tally.score_text(field, &text, FieldWeight::phrase_only(weight.phrase), query);
            }
            SearchField::Category => {
                let text = article.category.as_deref().unwrap_or("");
                tally.score_text(field, text, FieldWeight::phrase_only(weight.phrase), query);
            }
            SearchField::Tags => {
                for tag in &article.tags {
                    tally.score_text(field, tag, FieldWeight::phrase_only(weight.phrase), query);
                }
            }
        }
    }

    if tally.score == 0 {
        return None;
    }

    let boosts = &profile.boosts;
    if article.is_featured {
        tally.score = tally.score.saturating_add(boosts.featured);
    }
    if article.is_breaking_news {
        tally.score = tally.score.saturating_add(boosts.breaking);
    }
    if article.editors_pick {
        tally.score = tally.score.saturating_add(boosts.editors_pick);
    }

    Some((tally.score, tally.fields))
}

/// Score every article and keep the matches, in input order.
///
/// An empty or whitespace-only query matches nothing. The input articles
/// are only borrowed; results point back into the slice.
pub fn search<'a, R: TextResolver + ?Sized>(
    articles: &'a [Article],
    query: &str,
    profile: &ScoringProfile,
    resolver: &R,
) -> Vec<SearchResult<'a>> {
    let Some(q) = normalize_query(query) else {
        return Vec::new();
    };

    let results: Vec<SearchResult<'a>> = articles
        .iter()
        .filter_map(|article| {
            score_article(article, &q, profile, resolver).map(|(relevance_score, matched_fields)| {
                SearchResult {
                    article,
                    relevance_score,
                    matched_fields,
                }
            })
        })
        .collect();

    tracing::debug!(
        query = %q.phrase,
        words = q.words.len(),
        candidates = articles.len(),
        matches = results.len(),
        "scored articles"
    );

    results
}

/// Bundles all inputs for a single search invocation.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest<'q> {
    /// Raw query text as typed by the reader.
    pub query: &'q str,
    pub profile: ScoringProfile,
    /// `None` keeps input order.
    pub sort: Option<SortOrder>,
    pub category: CategoryFilter,
    /// Maximum results to return; `total` still counts all matches.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome<'a> {
    /// Matches after category filtering, before truncation.
    pub total: usize,
    pub results: Vec<SearchResult<'a>>,
}

/// Search, then sort, filter by category, and truncate.
pub fn run<'a, R: TextResolver + ?Sized>(
    articles: &'a [Article],
    req: &SearchRequest<'_>,
    resolver: &R,
) -> SearchOutcome<'a> {
    let mut results = search(articles, req.query, &req.profile, resolver);

    if let Some(order) = req.sort {
        sort_results(&mut results, order);
    }
    filter_category(&mut results, &req.category);

    let total = results.len();
    if let Some(limit) = req.limit {
        results.truncate(limit);
    }

    SearchOutcome { total, results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::DocumentResolver;
    use serde_json::json;

    fn newsroom() -> Vec<Article> {
        vec![
            Article {
                title: Some("City Council Approves Budget".into()),
                category: Some("news".into()),
                is_featured: true,
                ..Article::new("council")
            },
            Article {
                title: Some("Local Team Wins Championship".into()),
                category: Some("sports".into()),
                is_breaking_news: true,
                ..Article::new("team")
            },
        ]
    }

    fn full(articles: &[Article], query: &str) -> Vec<(String, u32, Vec<SearchField>)> {
        search(articles, query, &ScoringProfile::full_page(), &DocumentResolver)
            .into_iter()
            .map(|r| (r.article.id.clone(), r.relevance_score, r.matched_fields))
            .collect()
    }

    #[test]
    fn test_normalize_query() {
        let q = normalize_query("  City   COUNCIL ").unwrap();
        assert_eq!(q.phrase, "city   council");
        assert_eq!(q.words, vec!["city", "council"]);
        assert!(normalize_query("").is_none());
        assert!(normalize_query(" \t\n ").is_none());
    }

    #[test]
    fn test_budget_phrase_plus_featured() {
        let articles = newsroom();
        let hits = full(&articles, "budget");
        assert_eq!(hits, vec![("council".to_string(), 17, vec![SearchField::Title])]);
    }

    #[test]
    fn test_single_word_query_is_a_phrase_match() {
        let articles = newsroom();
        let hits = full(&articles, "team");
        assert_eq!(hits, vec![("team".to_string(), 18, vec![SearchField::Title])]);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let articles = newsroom();
        assert!(full(&articles, "xyznonexistent").is_empty());
        assert!(full(&articles, "   ").is_empty());
        assert!(full(&[], "budget").is_empty());
    }

    #[test]
    fn test_word_matches_accumulate_per_word() {
        let articles = vec![Article {
            title: Some("Budget vote delayed at council".into()),
            ..Article::new("a")
        }];
        // Phrase "council budget" is absent, both words present: 8 + 8.
        assert_eq!(full(&articles, "council budget")[0].1, 16);
        // One word present: 8.
        assert_eq!(full(&articles, "council parking")[0].1, 8);
    }

    #[test]
    fn test_zero_word_weight_turns_off_word_matching() {
        let articles = vec![Article {
            title: Some("Budget vote delayed at council".into()),
            ..Article::new("a")
        }];
        let mut profile = ScoringProfile::full_page();
        profile.title = FieldWeight::new(15, 0);
        assert!(search(&articles, "council budget", &profile, &DocumentResolver).is_empty());
        assert_eq!(
            search(&articles, "delayed at council", &profile, &DocumentResolver)[0].relevance_score,
            15
        );
    }

    #[test]
    fn test_phrase_suppresses_word_match_in_same_field() {
        let articles = vec![Article {
            title: Some("school board meeting".into()),
            ..Article::new("a")
        }];
        assert_eq!(full(&articles, "school board")[0].1, 15);
    }

    #[test]
    fn test_every_field_and_order() {
        let articles = vec![Article {
            title: Some("Harbor festival returns".into()),
            summary: Some("The harbor festival is back".into()),
            content: Some(RichField::Document(json!({
                "nodeType": "document",
                "content": [{ "nodeType": "paragraph",
                  "content": [{ "nodeType": "text", "value": "Crowds at the Harbor Festival." }] }]
            }))),
            author: Some("Harbor Festival Desk".into()),
            category: Some("harbor festival".into()),
            tags: vec!["harbor festival".into(), "Harbor Festival 2024".into(), "boats".into()],
            ..Article::new("h")
        }];
        let hits = full(&articles, "Harbor Festival");
        // 15 + 10 + 7 + 6 + 5 + 4 * 2 tags
        assert_eq!(hits[0].1, 51);
        assert_eq!(hits[0].2, SearchField::ALL.to_vec());
    }

    #[test]
    fn test_phrase_only_fields_ignore_words() {
        let articles = vec![Article {
            author: Some("Jane Smith".into()),
            category: Some("business".into()),
            tags: vec!["markets".into()],
            ..Article::new("a")
        }];
        // "jane doe" is not a phrase in author; author has no word fallback.
        assert!(full(&articles, "jane doe").is_empty());
        assert_eq!(
            full(&articles, "smith"),
            vec![("a".to_string(), 6, vec![SearchField::Author])]
        );
    }

    #[test]
    fn test_boosts_need_a_text_match() {
        let articles = vec![Article {
            title: Some("Quiet day".into()),
            is_featured: true,
            is_breaking_news: true,
            editors_pick: true,
            ..Article::new("a")
        }];
        assert!(full(&articles, "storm").is_empty());
        // 15 + 2 + 3 + 1
        assert_eq!(full(&articles, "quiet")[0].1, 21);
    }

    #[test]
    fn test_breaking_boost_is_exact() {
        let base = Article {
            title: Some("Storm warning".into()),
            ..Article::new("calm")
        };
        let breaking = Article {
            is_breaking_news: true,
            ..base.clone()
        };
        let articles = vec![base, breaking];
        let hits = full(&articles, "storm");
        assert_eq!(hits[1].1 - hits[0].1, ScoringProfile::full_page().boosts.breaking);
    }

    #[test]
    fn test_compact_profile() {
        let articles = newsroom();
        let hits = search(&articles, "budget", &ScoringProfile::compact(), &DocumentResolver);
        assert_eq!(hits[0].relevance_score, 10 + 1);
    }

    #[test]
    fn test_malformed_rich_text_does_not_abort_article() {
        let articles = vec![Article {
            title: Some("Transit plan".into()),
            summary: Some(RichField::Document(json!(12345))),
            ..Article::new("a")
        }];
        assert_eq!(
            full(&articles, "transit"),
            vec![("a".to_string(), 15, vec![SearchField::Title])]
        );
    }

    #[test]
    fn test_custom_resolver_is_used() {
        let articles = vec![Article {
            summary: Some(RichField::Document(json!({ "opaque": true }))),
            ..Article::new("a")
        }];
        let resolver = |_: &RichField| "secret ballot".to_string();
        let hits = search(&articles, "ballot", &ScoringProfile::full_page(), &resolver);
        assert_eq!(hits[0].matched_fields, vec![SearchField::Summary]);
    }

    #[test]
    fn test_input_is_not_mutated_and_is_deterministic() {
        let articles = newsroom();
        let before = articles.clone();
        let first = full(&articles, "local championship");
        let second = full(&articles, "local championship");
        assert_eq!(first, second);
        assert_eq!(articles, before);
    }

    #[test]
    fn test_run_sorts_filters_and_limits() {
        let articles = vec![
            Article {
                title: Some("Election night".into()),
                category: Some("news".into()),
                published_date: Some("2024-01-01".into()),
                ..Article::new("old")
            },
            Article {
                title: Some("Election results".into()),
                summary: Some("Election turnout".into()),
                category: Some("news".into()),
                published_date: Some("2024-05-01".into()),
                ..Article::new("new")
            },
            Article {
                title: Some("Election of team captain".into()),
                category: Some("sports".into()),
                published_date: Some("2024-03-01".into()),
                ..Article::new("sport")
            },
        ];

        let req = SearchRequest {
            query: "election",
            sort: Some(SortOrder::Relevance),
            ..Default::default()
        };
        let out = run(&articles, &req, &DocumentResolver);
        assert_eq!(out.results[0].article.id, "new");
        assert_eq!(out.total, 3);

        let req = SearchRequest {
            query: "election",
            sort: Some(SortOrder::Date),
            category: CategoryFilter::Only("news".into()),
            limit: Some(1),
            ..Default::default()
        };
        let out = run(&articles, &req, &DocumentResolver);
        assert_eq!(out.total, 2);
        assert_eq!(out.results.len(), 1);
        assert_eq!(out.results[0].article.id, "new");
    }
}
