//! # Newsroom Search CLI (`newsroom`)
//!
//! ## Usage
//!
//! ```bash
//! newsroom --config ./config/newsroom.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `newsroom search "<query>"` | Ranked search over all loaded articles |
//! | `newsroom list` | List loaded articles, newest first |
//! | `newsroom get <id>` | Print one article with its rich text resolved |
//! | `newsroom sources` | List configured sources and their health |
//! | `newsroom profiles` | Show the scoring weight tables |
//! | `newsroom serve` | Start the JSON HTTP API |
//!
//! ## Examples
//!
//! ```bash
//! # Full-page weighting, best matches first
//! newsroom search "city council budget"
//!
//! # Compact modal weighting, newest first, sports only, as JSON
//! newsroom search championship --profile compact --sort date --category sports --json
//!
//! # Debug logging
//! RUST_LOG=newsroom_core=debug newsroom search storm
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use newsroom_search::{articles, config, content, logging, search, server};

/// Newsroom Search: relevance search over headless-CMS news articles.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/newsroom.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "newsroom",
    about = "Newsroom Search: weighted relevance search over news articles",
    version,
    long_about = "Newsroom Search loads published articles from JSON exports or a headless CMS \
    delivery API and ranks them against free-text queries using configurable per-field \
    weight profiles. Results are available from the CLI or a JSON HTTP API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/newsroom.toml")]
    config: PathBuf,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search articles.
    ///
    /// Scores every loaded article against the query and prints the
    /// matches. An empty query matches nothing.
    Search {
        /// The search query string.
        query: String,

        /// Scoring profile: `full`, `compact`, or a `[profiles.<name>]` entry.
        #[arg(long)]
        profile: Option<String>,

        /// Result order: `relevance` or `date`.
        #[arg(long)]
        sort: Option<String>,

        /// Only return articles in this category (`all` for no filter).
        #[arg(long)]
        category: Option<String>,

        /// Maximum number of results to print.
        #[arg(long)]
        limit: Option<usize>,

        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List loaded articles, newest first.
    List {
        /// Only list articles in this category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Print one article by id.
    Get {
        /// Article id.
        id: String,
    },

    /// List configured article sources and their health.
    Sources,

    /// Show the weight tables of every scoring profile.
    Profiles,

    /// Start the JSON HTTP API.
    ///
    /// Binds to `[server].bind`. Articles are loaded once at startup;
    /// `POST /refresh` reloads them.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    // `profiles` only needs the built-in presets when no config exists
    let cfg = match &cli.command {
        Commands::Profiles if !cli.config.exists() => config::Config::minimal(),
        _ => config::load_config(&cli.config)?,
    };

    match cli.command {
        Commands::Search {
            query,
            profile,
            sort,
            category,
            limit,
            json,
        } => {
            let opts = search::SearchOptions {
                profile,
                sort,
                category,
                limit,
            };
            search::run_search(&cfg, &query, opts, json).await?;
        }
        Commands::List { category } => {
            articles::run_list(&cfg, category).await?;
        }
        Commands::Get { id } => {
            articles::run_get(&cfg, &id).await?;
        }
        Commands::Sources => {
            content::list_sources(&cfg)?;
        }
        Commands::Profiles => {
            search::run_profiles(&cfg)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
