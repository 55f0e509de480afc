//! Article listing and retrieval by id.
//!
//! Used by the `newsroom list` and `newsroom get` CLI commands.

use anyhow::{bail, Result};
use newsroom_core::models::Article;
use newsroom_core::rank::{parse_published, CategoryFilter};
use newsroom_core::richtext::resolve_text;
use std::cmp::Reverse;

use crate::config::Config;
use crate::content;
use crate::search::format_date;

/// Articles matching `category`, newest first; undated articles last.
pub fn newest_first<'a>(articles: &'a [Article], category: &CategoryFilter) -> Vec<&'a Article> {
    let mut listed: Vec<&Article> = articles
        .iter()
        .filter(|a| category.matches(a.category.as_deref()))
        .collect();
    listed.sort_by_cached_key(|a| Reverse(a.published_date.as_deref().and_then(parse_published)));
    listed
}

pub async fn run_list(config: &Config, category: Option<String>) -> Result<()> {
    let articles = content::load_all(config).await?;
    let filter = CategoryFilter::parse(category.as_deref());
    let listed = newest_first(&articles, &filter);

    if listed.is_empty() {
        println!("No articles.");
        return Ok(());
    }

    println!("{:<24} {:<14} {:<10} TITLE", "ID", "PUBLISHED", "CATEGORY");
    for article in &listed {
        println!(
            "{:<24} {:<14} {:<10} {}",
            article.id,
            format_date(article.published_date.as_deref()),
            article.category.as_deref().unwrap_or("-"),
            article.display_title()
        );
    }
    println!();
    println!("{} article(s)", listed.len());
    Ok(())
}

pub async fn get_article(config: &Config, id: &str) -> Result<Article> {
    let articles = content::load_all(config).await?;
    match articles.into_iter().find(|a| a.id == id) {
        Some(article) => Ok(article),
        None => bail!("article not found: {}", id),
    }
}

pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    let article = match get_article(config, id).await {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let text = |field: Option<&newsroom_core::models::RichField>| {
        field.map(resolve_text).unwrap_or_default()
    };

    println!("--- Article ---");
    println!("id:        {}", article.id);
    println!("title:     {}", article.display_title());
    println!("category:  {}", article.category.as_deref().unwrap_or("(none)"));
    println!("author:    {}", text(article.author.as_ref()));
    println!("published: {}", format_date(article.published_date.as_deref()));
    if !article.tags.is_empty() {
        println!("tags:      {}", article.tags.join(", "));
    }
    println!(
        "flags:     featured={} breaking={} editors_pick={}",
        article.is_featured, article.is_breaking_news, article.editors_pick
    );
    println!();

    println!("--- Summary ---");
    println!("{}", text(article.summary.as_ref()));
    println!();

    println!("--- Content ---");
    println!("{}", text(article.content.as_ref()));

    Ok(())
}
