//! # Newsroom Search
//!
//! Relevance search over a news site's published articles, fed by a
//! headless CMS.
//!
//! Articles are pulled from configured sources (JSON exports on disk or a
//! CMS delivery API), held in memory, and scored per query by the engine in
//! [`newsroom_core`]. The results are exposed through a CLI and a JSON HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌────────────────┐   ┌────────────────┐
//! │  Sources    │──▶│ ArticleCatalog │──▶│ newsroom_core  │
//! │ files / CMS │   │  (Arc swap)    │   │ score + rank   │
//! └─────────────┘   └────────────────┘   └───────┬────────┘
//!                                                │
//!                            ┌───────────────────┤
//!                            ▼                   ▼
//!                       ┌──────────┐       ┌──────────┐
//!                       │   CLI    │       │   HTTP   │
//!                       │(newsroom)│       │  (axum)  │
//!                       └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! newsroom sources                          # check configured sources
//! newsroom search "city budget"             # ranked results
//! newsroom search storm --sort date --category news
//! newsroom profiles                         # show weight tables
//! newsroom serve                            # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`content`] | Article sources (files, CMS) and loading |
//! | [`search`] | Search front end and result printing |
//! | [`articles`] | Listing and retrieval by id |
//! | [`server`] | JSON HTTP API |
//! | [`logging`] | Tracing subscriber setup |

pub mod articles;
pub mod config;
pub mod content;
pub mod logging;
pub mod search;
pub mod server;
