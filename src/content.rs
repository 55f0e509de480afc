//! Article sources: where the candidate collection comes from.
//!
//! Every source implements [`ArticleSource`] and returns whole articles.
//! Two built-in sources exist:
//!
//! | Type | Reads |
//! |------|-------|
//! | `files` | A directory of JSON exports, filtered by include/exclude globs |
//! | `cms` | A headless-CMS delivery API over HTTP, following `skip`/`total` pagination |
//!
//! Both accept the same payload shapes (see [`decode_payload`]): a bare
//! article, an array of articles, or a delivery envelope
//! `{"items": [{"sys": {"id": ...}, "fields": {...}}], "total": N}`.
//!
//! [`load_all`] concatenates every configured source in config order and
//! keeps the first article seen for each id.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use newsroom_core::models::Article;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use walkdir::WalkDir;

use crate::config::{CmsSourceConfig, Config, FileSourceConfig};

/// Upper bound on delivery pages fetched from one endpoint.
const MAX_CMS_PAGES: usize = 500;

/// A provider of article records.
///
/// Implementations perform their own I/O and return the full collection on
/// every call. There is no incremental fetching.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Instance name from config (e.g. `"archive"`).
    fn name(&self) -> &str;

    /// Source type identifier (`"files"`, `"cms"`, or custom).
    fn source_type(&self) -> &str {
        "custom"
    }

    /// One-line description for `newsroom sources`.
    fn description(&self) -> String;

    /// `Ok(())` when the source looks reachable, or a reason why not.
    fn health(&self) -> std::result::Result<(), String> {
        Ok(())
    }

    async fn fetch(&self) -> Result<Vec<Article>>;
}

// ============ Payload decoding ============

/// Decode any supported payload shape into articles.
///
/// Entries that cannot be decoded or carry no id are skipped with a warning.
pub fn decode_payload(payload: &Value) -> Vec<Article> {
    match payload {
        Value::Array(items) => items.iter().filter_map(decode_entry).collect(),
        Value::Object(map) => match map.get("items") {
            Some(Value::Array(items)) => items.iter().filter_map(decode_entry).collect(),
            _ => decode_entry(payload).into_iter().collect(),
        },
        _ => {
            tracing::warn!("payload is neither an object nor an array; ignoring");
            Vec::new()
        }
    }
}

fn decode_entry(entry: &Value) -> Option<Article> {
    let Value::Object(map) = entry else {
        tracing::warn!("skipping non-object entry");
        return None;
    };

    let mut fields: Map<String, Value> = match map.get("fields") {
        Some(Value::Object(fields)) => fields.clone(),
        _ => map.clone(),
    };

    if !fields.contains_key("id") {
        if let Some(id) = map.get("sys").and_then(|sys| sys.get("id")).cloned() {
            fields.insert("id".to_string(), id);
        }
    }

    match serde_json::from_value::<Article>(Value::Object(fields)) {
        Ok(article) if article.id.trim().is_empty() => {
            tracing::warn!("skipping entry with empty id");
            None
        }
        Ok(article) => Some(article),
        Err(e) => {
            tracing::warn!(error = %e, "skipping undecodable entry");
            None
        }
    }
}

// ============ Filesystem exports ============

pub struct FileSource {
    name: String,
    config: FileSourceConfig,
}

impl FileSource {
    pub fn new(name: impl Into<String>, config: FileSourceConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Matching files under `root`, sorted for deterministic ordering.
    fn matching_files(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.root;
        if !root.exists() {
            bail!("files source root does not exist: {}", root.display());
        }

        let include_set = build_globset(&self.config.include_globs)?;
        let exclude_set = build_globset(&self.config.exclude_globs)?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(self.config.follow_symlinks) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            let rel_str = relative.to_string_lossy();
            if exclude_set.is_match(rel_str.as_ref()) || !include_set.is_match(rel_str.as_ref()) {
                continue;
            }
            files.push(path.to_path_buf());
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl ArticleSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn source_type(&self) -> &str {
        "files"
    }

    fn description(&self) -> String {
        format!("JSON exports under {}", self.config.root.display())
    }

    fn health(&self) -> std::result::Result<(), String> {
        if self.config.root.is_dir() {
            Ok(())
        } else {
            Err(format!("root does not exist: {}", self.config.root.display()))
        }
    }

    async fn fetch(&self) -> Result<Vec<Article>> {
        let mut articles = Vec::new();
        for path in self.matching_files()? {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let payload: Value = match serde_json::from_str(&raw) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping invalid JSON file");
                    continue;
                }
            };
            let decoded = decode_payload(&payload);
            tracing::debug!(path = %path.display(), articles = decoded.len(), "read export");
            articles.extend(decoded);
        }
        Ok(articles)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

// ============ Headless CMS delivery API ============

pub struct CmsSource {
    name: String,
    config: CmsSourceConfig,
}

impl CmsSource {
    pub fn new(name: impl Into<String>, config: CmsSourceConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    fn token(&self) -> Result<Option<String>> {
        match &self.config.token_env {
            Some(var) => std::env::var(var)
                .map(Some)
                .with_context(|| format!("environment variable {} is not set", var)),
            None => Ok(None),
        }
    }
}

/// Pagination counters from a delivery envelope, when present.
fn page_total(payload: &Value) -> Option<u64> {
    payload.get("total").and_then(Value::as_u64)
}

fn page_len(payload: &Value) -> usize {
    payload
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

#[async_trait]
impl ArticleSource for CmsSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn source_type(&self) -> &str {
        "cms"
    }

    fn description(&self) -> String {
        format!("delivery API at {}", self.config.url)
    }

    fn health(&self) -> std::result::Result<(), String> {
        if reqwest::Url::parse(&self.config.url).is_err() {
            return Err(format!("invalid url: {}", self.config.url));
        }
        match &self.config.token_env {
            Some(var) if std::env::var(var).is_err() => Err(format!("{} is not set", var)),
            _ => Ok(()),
        }
    }

    async fn fetch(&self) -> Result<Vec<Article>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()?;
        let token = self.token()?;

        let mut articles = Vec::new();
        let mut skip: u64 = 0;

        for page in 0..MAX_CMS_PAGES {
            let mut request = client.get(&self.config.url);
            if page > 0 {
                request = request.query(&[("skip", skip)]);
            }
            if let Some(ref token) = token {
                request = request.bearer_auth(token);
            }

            let payload: Value = request
                .send()
                .await
                .with_context(|| format!("CMS request to {} failed", self.config.url))?
                .error_for_status()
                .with_context(|| format!("CMS {} returned an error status", self.name))?
                .json()
                .await
                .with_context(|| format!("CMS {} returned invalid JSON", self.name))?;

            let fetched = page_len(&payload) as u64;
            articles.extend(decode_payload(&payload));
            skip += fetched;

            tracing::debug!(source = %self.name, page, fetched, skip, "fetched CMS page");

            match page_total(&payload) {
                Some(total) if fetched > 0 && skip < total => continue,
                _ => return Ok(articles),
            }
        }

        tracing::warn!(source = %self.name, pages = MAX_CMS_PAGES, "stopped paging at page limit");
        Ok(articles)
    }
}

// ============ Loading ============

/// Instantiate every source named in config, files first, then CMS.
pub fn build_sources(config: &Config) -> Vec<Box<dyn ArticleSource>> {
    let mut sources: Vec<Box<dyn ArticleSource>> = Vec::new();
    for (name, cfg) in &config.content.files {
        sources.push(Box::new(FileSource::new(name.clone(), cfg.clone())));
    }
    for (name, cfg) in &config.content.cms {
        sources.push(Box::new(CmsSource::new(name.clone(), cfg.clone())));
    }
    sources
}

/// Fetch from every source and merge, keeping the first article per id.
pub async fn load_from(sources: &[Box<dyn ArticleSource>]) -> Result<Vec<Article>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut articles = Vec::new();

    for source in sources {
        let fetched = source
            .fetch()
            .await
            .with_context(|| format!("source {}:{} failed", source.source_type(), source.name()))?;
        let count = fetched.len();
        for article in fetched {
            if seen.insert(article.id.clone()) {
                articles.push(article);
            } else {
                tracing::warn!(id = %article.id, source = source.name(), "duplicate article id; keeping first");
            }
        }
        tracing::info!(source = source.name(), kind = source.source_type(), articles = count, "loaded source");
    }

    Ok(articles)
}

pub async fn load_all(config: &Config) -> Result<Vec<Article>> {
    load_from(&build_sources(config)).await
}

/// CLI entry point: list configured sources and their health.
pub fn list_sources(config: &Config) -> Result<()> {
    let sources = build_sources(config);
    if sources.is_empty() {
        println!("No sources configured.");
        return Ok(());
    }

    println!("{:<16} {:<8} {:<10} DESCRIPTION", "SOURCE", "TYPE", "STATUS");
    for source in &sources {
        let status = match source.health() {
            Ok(()) => "OK".to_string(),
            Err(reason) => format!("ERROR ({})", reason),
        };
        println!(
            "{:<16} {:<8} {:<10} {}",
            source.name(),
            source.source_type(),
            status,
            source.description()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    struct StaticSource {
        name: &'static str,
        articles: Vec<Article>,
    }

    #[async_trait]
    impl ArticleSource for StaticSource {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> String {
            "static".to_string()
        }
        async fn fetch(&self) -> Result<Vec<Article>> {
            Ok(self.articles.clone())
        }
    }

    #[test]
    fn test_decode_array_and_single() {
        let arr = decode_payload(&json!([{ "id": "a" }, { "id": "b", "title": "B" }]));
        assert_eq!(arr.len(), 2);
        let one = decode_payload(&json!({ "id": "c", "category": "news" }));
        assert_eq!(one[0].category.as_deref(), Some("news"));
    }

    #[test]
    fn test_decode_delivery_envelope() {
        let payload = json!({
            "total": 2,
            "items": [
                { "sys": { "id": "e1" }, "fields": {
                    "title": "Council Approves Budget",
                    "isFeatured": true,
                    "summary": { "nodeType": "document", "content": [] }
                }},
                { "sys": {}, "fields": { "title": "No id" } }
            ]
        });
        let articles = decode_payload(&payload);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "e1");
        assert!(articles[0].is_featured);
    }

    #[test]
    fn test_decode_skips_garbage() {
        assert!(decode_payload(&json!(3)).is_empty());
        assert!(decode_payload(&json!([1, "x", { "id": 5 }])).is_empty());
    }

    #[tokio::test]
    async fn test_file_source_globs() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("drafts")).unwrap();
        std::fs::write(root.join("a.json"), r#"[{"id":"a"}]"#).unwrap();
        std::fs::write(root.join("b.json"), r#"{"items":[{"sys":{"id":"b"},"fields":{}}]}"#).unwrap();
        std::fs::write(root.join("drafts/c.json"), r#"{"id":"c"}"#).unwrap();
        std::fs::write(root.join("notes.txt"), "not json").unwrap();
        std::fs::write(root.join("broken.json"), "{ nope").unwrap();

        let source = FileSource::new(
            "local",
            FileSourceConfig {
                root: root.to_path_buf(),
                include_globs: vec!["**/*.json".into()],
                exclude_globs: vec!["drafts/**".into()],
                follow_symlinks: false,
            },
        );
        assert!(source.health().is_ok());
        let ids: Vec<String> = source.fetch().await.unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_file_source_missing_root() {
        let source = FileSource::new(
            "gone",
            FileSourceConfig {
                root: PathBuf::from("/definitely/not/here"),
                include_globs: vec!["**/*.json".into()],
                exclude_globs: vec![],
                follow_symlinks: false,
            },
        );
        assert!(source.health().is_err());
        assert!(source.fetch().await.is_err());
    }

    #[test]
    fn test_cms_health() {
        let cms = |url: &str, token_env: Option<&str>| {
            CmsSource::new(
                "delivery",
                CmsSourceConfig {
                    url: url.to_string(),
                    token_env: token_env.map(str::to_string),
                    timeout_secs: 5,
                },
            )
        };
        assert!(cms("https://cdn.example.com/entries", None).health().is_ok());
        assert!(cms("not a url", None).health().is_err());
        assert!(cms(
            "https://cdn.example.com/entries",
            Some("NEWSROOM_TEST_TOKEN_THAT_IS_NEVER_SET")
        )
        .health()
        .is_err());
    }

    /// Delivery API stub: five entries, two per page, behind a bearer token.
    async fn delivery_page(
        headers: axum::http::HeaderMap,
        axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
    ) -> std::result::Result<axum::Json<Value>, axum::http::StatusCode> {
        let auth = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if auth != Some("Bearer delivery-secret") {
            return Err(axum::http::StatusCode::UNAUTHORIZED);
        }
        if params.get("content_type").map(String::as_str) != Some("article") {
            return Err(axum::http::StatusCode::BAD_REQUEST);
        }
        let skip: usize = params
            .get("skip")
            .map(|s| s.parse().unwrap())
            .unwrap_or(0);
        let items: Vec<Value> = (skip..(skip + 2).min(5))
            .map(|i| json!({ "sys": { "id": format!("e{}", i) }, "fields": { "title": format!("Entry {}", i) } }))
            .collect();
        Ok(axum::Json(json!({ "total": 5, "skip": skip, "limit": 2, "items": items })))
    }

    async fn serve_delivery_stub() -> String {
        let app = axum::Router::new()
            .route("/entries", axum::routing::get(delivery_page))
            .route(
                "/broken",
                axum::routing::get(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        format!("http://{}", addr)
    }

    fn cms_source(url: String, token_env: Option<&str>) -> CmsSource {
        CmsSource::new(
            "delivery",
            CmsSourceConfig {
                url,
                token_env: token_env.map(str::to_string),
                timeout_secs: 5,
            },
        )
    }

    #[tokio::test]
    async fn test_cms_fetch_follows_pages() {
        std::env::set_var("NEWSROOM_TEST_DELIVERY_TOKEN", "delivery-secret");
        let base = serve_delivery_stub().await;

        let source = cms_source(
            format!("{}/entries?content_type=article", base),
            Some("NEWSROOM_TEST_DELIVERY_TOKEN"),
        );
        let articles = source.fetch().await.unwrap();
        let ids: Vec<&str> = articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["e0", "e1", "e2", "e3", "e4"]);
        assert_eq!(articles[4].title.as_deref(), Some("Entry 4"));

        // without the token the stub answers 401
        let anonymous = cms_source(format!("{}/entries?content_type=article", base), None);
        assert!(anonymous.fetch().await.is_err());
    }

    #[tokio::test]
    async fn test_cms_fetch_error_status() {
        let base = serve_delivery_stub().await;
        let source = cms_source(format!("{}/broken", base), None);
        let err = source.fetch().await.unwrap_err();
        assert!(format!("{:#}", err).contains("error status"), "got: {:#}", err);
    }

    #[tokio::test]
    async fn test_load_from_dedups_first_wins() {
        let first = StaticSource {
            name: "one",
            articles: vec![
                Article {
                    title: Some("First".into()),
                    ..Article::new("x")
                },
                Article::new("y"),
            ],
        };
        let second = StaticSource {
            name: "two",
            articles: vec![
                Article {
                    title: Some("Second".into()),
                    ..Article::new("x")
                },
                Article::new("z"),
            ],
        };
        let sources: Vec<Box<dyn ArticleSource>> = vec![Box::new(first), Box::new(second)];
        let articles = load_from(&sources).await.unwrap();
        let ids: Vec<&str> = articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
        assert_eq!(articles[0].title.as_deref(), Some("First"));
    }
}
