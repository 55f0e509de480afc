//! # Newsroom Core
//!
//! Shared, WASM-safe logic for Newsroom Search: the article model, rich-text
//! resolution, scoring profiles, the relevance engine, and result ranking.
//!
//! This crate contains no tokio, HTTP, filesystem I/O, or other
//! native-only dependencies. Every search is a synchronous, pure
//! computation over a borrowed article slice.
//!
//! ```rust
//! use newsroom_core::models::Article;
//! use newsroom_core::profile::ScoringProfile;
//! use newsroom_core::richtext::DocumentResolver;
//! use newsroom_core::search::search;
//!
//! let articles = vec![Article {
//!     title: Some("City Council Approves Budget".into()),
//!     is_featured: true,
//!     ..Article::new("council")
//! }];
//! let hits = search(&articles, "budget", &ScoringProfile::full_page(), &DocumentResolver);
//! assert_eq!(hits[0].relevance_score, 17);
//! ```

pub mod catalog;
pub mod error;
pub mod models;
pub mod profile;
pub mod rank;
pub mod richtext;
pub mod search;
