//! Shared in-memory article collection with copy-on-write replacement.
//!
//! Readers take a [`snapshot`](ArticleCatalog::snapshot), an `Arc` to the
//! current collection, and score against it without holding any lock.
//! A content refresh builds a new `Vec` and swaps it in with
//! [`replace`](ArticleCatalog::replace). Searches already running keep
//! their old snapshot, so none of them sees a half-updated collection.

use std::sync::{Arc, PoisonError, RwLock};

use crate::models::Article;

pub struct ArticleCatalog {
    articles: RwLock<Arc<Vec<Article>>>,
}

impl ArticleCatalog {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles: RwLock::new(Arc::new(articles)),
        }
    }

    /// The current collection. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<Vec<Article>> {
        // The guarded value is a single Arc, so a poisoned lock still holds
        // a complete collection.
        self.articles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new collection wholesale. Returns the new article count.
    pub fn replace(&self, articles: Vec<Article>) -> usize {
        let count = articles.len();
        let fresh = Arc::new(articles);
        *self
            .articles
            .write()
            .unwrap_or_else(PoisonError::into_inner) = fresh;
        count
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an article by id in the current snapshot.
    pub fn get(&self, id: &str) -> Option<Article> {
        self.snapshot().iter().find(|a| a.id == id).cloned()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let snapshot = self.snapshot();
        let mut seen: Vec<String> = Vec::new();
        for category in snapshot.iter().filter_map(|a| a.category.as_deref()) {
            if !seen.iter().any(|c| c == category) {
                seen.push(category.to_string());
            }
        }
        seen
    }
}

impl Default for ArticleCatalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
