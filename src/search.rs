//! Search front end shared by the CLI and the HTTP API.
//!
//! [`search_articles`] resolves caller options against config defaults and
//! delegates to [`newsroom_core::search::run`]. [`run_search`] is the
//! `newsroom search` command.

use anyhow::{bail, Result};
use newsroom_core::models::{Article, SearchResult};
use newsroom_core::profile::{FieldWeight, ScoringProfile};
use newsroom_core::rank::{parse_published, CategoryFilter, SortOrder};
use newsroom_core::richtext::DocumentResolver;
use newsroom_core::search::{run, SearchRequest};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::content;

/// Per-request overrides. `None` falls back to `[search]` in config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchOptions {
    pub profile: Option<String>,
    pub sort: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse<'a> {
    pub query: String,
    pub profile: String,
    pub sort: String,
    pub category: String,
    /// Matches before the limit was applied.
    pub total: usize,
    pub results: Vec<SearchResult<'a>>,
}

pub fn search_articles<'a>(
    config: &Config,
    articles: &'a [Article],
    query: &str,
    opts: &SearchOptions,
) -> Result<SearchResponse<'a>> {
    let profile_name = opts
        .profile
        .clone()
        .unwrap_or_else(|| config.search.profile.clone());
    let profile = config.resolve_profile(&profile_name)?;
    let sort = match opts.sort.as_deref() {
        Some(s) => s.parse::<SortOrder>()?,
        None => config.default_sort()?,
    };
    let category = CategoryFilter::parse(opts.category.as_deref());
    let limit = opts.limit.unwrap_or(config.search.limit);
    if limit == 0 {
        bail!("limit must be >= 1");
    }

    let req = SearchRequest {
        query,
        profile,
        sort: Some(sort),
        category,
        limit: Some(limit),
    };
    let outcome = run(articles, &req, &DocumentResolver);

    Ok(SearchResponse {
        query: query.to_string(),
        profile: profile_name,
        sort: sort.to_string(),
        category: req.category.as_str().to_string(),
        total: outcome.total,
        results: outcome.results,
    })
}

/// Format a `publishedDate` for display, e.g. `Mar 1, 2024`.
pub fn format_date(date: Option<&str>) -> String {
    match date {
        Some(raw) => parse_published(raw)
            .map(|dt| dt.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| raw.to_string()),
        None => "(undated)".to_string(),
    }
}

pub async fn run_search(
    config: &Config,
    query: &str,
    opts: SearchOptions,
    json: bool,
) -> Result<()> {
    if query.trim().is_empty() {
        if json {
            let empty = search_articles(config, &[], query, &opts)?;
            println!("{}", serde_json::to_string_pretty(&empty)?);
        } else {
            println!("No results.");
        }
        return Ok(());
    }

    let articles = content::load_all(config).await?;
    let response = search_articles(config, &articles, query, &opts)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!(
        "{} result(s) for \"{}\" (profile: {}, sort: {}, category: {})",
        response.total, response.query, response.profile, response.sort, response.category
    );
    println!();

    for (i, result) in response.results.iter().enumerate() {
        let article = result.article;
        let matched: Vec<&str> = result.matched_fields.iter().map(|f| f.as_str()).collect();
        println!(
            "{}. [{}] {}",
            i + 1,
            result.relevance_score,
            article.display_title()
        );
        println!(
            "    category: {}",
            article.category.as_deref().unwrap_or("(none)")
        );
        println!(
            "    published: {}",
            format_date(article.published_date.as_deref())
        );
        println!("    matched: {}", matched.join(", "));
        let mut flags = Vec::new();
        if article.is_breaking_news {
            flags.push("breaking");
        }
        if article.is_featured {
            flags.push("featured");
        }
        if article.editors_pick {
            flags.push("editors-pick");
        }
        if !flags.is_empty() {
            println!("    flags: {}", flags.join(", "));
        }
        println!("    id: {}", article.id);
        println!();
    }

    if response.total > response.results.len() {
        println!(
            "Showing {} of {}. Use --limit to see more.",
            response.results.len(),
            response.total
        );
    }

    Ok(())
}

fn weight_cell(w: FieldWeight) -> String {
    match w.word {
        Some(word) if word > 0 => format!("{} / {}", w.phrase, word),
        _ => format!("{} / -", w.phrase),
    }
}

fn print_profile(name: &str, p: &ScoringProfile) {
    println!("[{}]", name);
    println!("{:<10} PHRASE / WORD", "FIELD");
    for (field, w) in [
        ("title", p.title),
        ("summary", p.summary),
        ("content", p.content),
        ("author", p.author),
        ("category", p.category),
        ("tags", p.tags),
    ] {
        println!("{:<10} {}", field, weight_cell(w));
    }
    println!(
        "boosts     featured +{}, breaking +{}, editors-pick +{}",
        p.boosts.featured, p.boosts.breaking, p.boosts.editors_pick
    );
}

/// CLI entry point for `newsroom profiles`.
pub fn run_profiles(config: &Config) -> Result<()> {
    for (i, name) in config.profile_names().iter().enumerate() {
        if i > 0 {
            println!();
        }
        let profile = config.resolve_profile(name)?;
        let marker = if *name == config.search.profile {
            " (default)"
        } else {
            ""
        };
        print_profile(&format!("{}{}", name, marker), &profile);
    }
    Ok(())
}
