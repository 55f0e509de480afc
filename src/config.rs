use anyhow::{Context, Result};
use newsroom_core::profile::{ProfileName, ScoringProfile};
use newsroom_core::rank::SortOrder;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub content: ContentConfig,
    /// Custom scoring profiles, keyed by name.
    #[serde(default)]
    pub profiles: BTreeMap<String, ScoringProfile>,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            sort: default_sort(),
            limit: default_limit(),
        }
    }
}

fn default_profile() -> String {
    "full".to_string()
}
fn default_sort() -> String {
    "relevance".to_string()
}
fn default_limit() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ContentConfig {
    /// Directories of JSON exports, keyed by source name.
    #[serde(default)]
    pub files: BTreeMap<String, FileSourceConfig>,
    /// Headless-CMS delivery endpoints, keyed by source name.
    #[serde(default)]
    pub cms: BTreeMap<String, CmsSourceConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FileSourceConfig {
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.json".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct CmsSourceConfig {
    pub url: String,
    /// Environment variable holding a bearer token, if the API needs one.
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

impl Config {
    /// Defaults only: no content sources, built-in profiles.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Resolve a profile name: configured profiles shadow the presets.
    pub fn resolve_profile(&self, name: &str) -> Result<ScoringProfile> {
        if let Some(profile) = self.profiles.get(name) {
            return Ok(*profile);
        }
        Ok(ScoringProfile::named(name)?)
    }

    pub fn default_sort(&self) -> Result<SortOrder> {
        Ok(self.search.sort.parse::<SortOrder>()?)
    }

    /// Built-in preset names followed by configured ones.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = ProfileName::ALL
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        for name in self.profiles.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    fn validate(&self) -> Result<()> {
        if self.search.limit == 0 {
            anyhow::bail!("search.limit must be >= 1");
        }

        for (name, profile) in &self.profiles {
            profile
                .validate()
                .with_context(|| format!("profiles.{} is invalid", name))?;
        }

        self.resolve_profile(&self.search.profile)
            .with_context(|| "search.profile does not name a known profile")?;
        self.default_sort()
            .with_context(|| "search.sort is invalid")?;

        for (name, cms) in &self.content.cms {
            if !(cms.url.starts_with("http://") || cms.url.starts_with("https://")) {
                anyhow::bail!("content.cms.{}.url must be an http(s) URL", name);
            }
            if cms.timeout_secs == 0 {
                anyhow::bail!("content.cms.{}.timeout_secs must be > 0", name);
            }
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.search.profile, "full");
        assert_eq!(cfg.search.limit, 20);
        assert_eq!(cfg.server.bind, "127.0.0.1:7340");
        assert!(cfg.content.files.is_empty());
    }

    #[test]
    fn test_full_config() {
        let cfg = parse_config(
            r#"
[search]
profile = "modal"
sort = "date"
limit = 5

[content.files.archive]
root = "/srv/news/export"

[content.cms.delivery]
url = "https://cdn.example.com/entries"
token_env = "CMS_TOKEN"

[profiles.modal]
title = { phrase = 12, word = 6 }
boosts = { breaking = 5 }

[server]
bind = "0.0.0.0:8080"
"#,
        )
        .unwrap();
        assert_eq!(cfg.default_sort().unwrap(), SortOrder::Date);
        let modal = cfg.resolve_profile("modal").unwrap();
        assert_eq!(modal.title.phrase, 12);
        assert_eq!(modal.boosts.breaking, 5);
        assert_eq!(
            cfg.content.files["archive"].include_globs,
            vec!["**/*.json".to_string()]
        );
        assert_eq!(cfg.content.cms["delivery"].timeout_secs, 30);
        assert_eq!(cfg.profile_names(), vec!["full", "compact", "modal"]);
    }

    #[test]
    fn test_example_config_parses() {
        let cfg = parse_config(include_str!("../config/newsroom.example.toml")).unwrap();
        let headline = cfg.resolve_profile("headline").unwrap();
        assert_eq!(headline.title.phrase, 20);
        assert!(headline.content.is_disabled());
        assert_eq!(headline.summary, ScoringProfile::full_page().summary);
        assert_eq!(cfg.content.files["local"].exclude_globs, vec!["drafts/**"]);
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let err = parse_config("[search]\nprofile = \"giant\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("giant"));
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(parse_config("[search]\nlimit = 0\n").is_err());
    }

    #[test]
    fn test_bad_sort_rejected() {
        assert!(parse_config("[search]\nsort = \"random\"\n").is_err());
    }

    #[test]
    fn test_inconsistent_profile_rejected() {
        let err = parse_config("[profiles.broken]\ncontent = { phrase = 0, word = 3 }\n").unwrap_err();
        assert!(format!("{:#}", err).contains("profiles.broken"));
    }

    #[test]
    fn test_word_weight_on_phrase_only_field_rejected() {
        let err = parse_config("[profiles.x]\nauthor = { phrase = 6, word = 3 }\n").unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("profiles.x"), "got: {}", msg);
        assert!(msg.contains("author"), "got: {}", msg);

        assert!(parse_config("[profiles.x]\ntags = { phrase = 2 }\n").is_ok());
    }

    #[test]
    fn test_partial_weight_keeps_preset_word() {
        let cfg = parse_config("[profiles.x]\ntitle = { phrase = 12 }\n").unwrap();
        let x = cfg.resolve_profile("x").unwrap();
        assert_eq!(x.title.phrase, 12);
        assert_eq!(x.title.word, ScoringProfile::full_page().title.word);
    }

    #[test]
    fn test_cms_url_must_be_http() {
        assert!(parse_config("[content.cms.x]\nurl = \"ftp://example.com\"\n").is_err());
    }
}
