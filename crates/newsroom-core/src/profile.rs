//! Scoring profiles: per-field weights and editorial boosts.
//!
//! A [`ScoringProfile`] is passed into every search so that one engine can
//! serve several call sites with different weightings. Two presets ship with
//! the crate:
//!
//! | Field    | `full` phrase/word | `compact` phrase/word |
//! |----------|--------------------|-----------------------|
//! | title    | 15 / 8             | 10 / 5                |
//! | summary  | 10 / 5             | 7 / 3                 |
//! | content  | 7 / 3              | 5 / 2                 |
//! | author   | 6 / –              | 4 / –                 |
//! | category | 5 / –              | 3 / –                 |
//! | tags     | 4 / –              | 3 / –                 |
//!
//! Boosts (featured / breaking / editor's pick): `full` = 2 / 3 / 1,
//! `compact` = 1 / 2 / 0.
//!
//! Profiles deserialize from TOML or JSON as overrides of the `full`
//! preset: an omitted field, an omitted `phrase`, or an omitted `word`
//! keeps the preset's value. `word = 0` turns word matching off for a
//! field, and `phrase = 0` without a `word` disables the field. Author,
//! category, and tags are always phrase-only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::SearchField;

/// Points awarded for matches in one field.
///
/// `word = None` marks a phrase-only field: individual query words are
/// never matched against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWeight {
    pub phrase: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<u32>,
}

impl FieldWeight {
    pub const fn new(phrase: u32, word: u32) -> Self {
        Self {
            phrase,
            word: Some(word),
        }
    }

    pub const fn phrase_only(phrase: u32) -> Self {
        Self {
            phrase,
            word: None,
        }
    }

    /// A field with no phrase points is skipped entirely.
    pub fn is_disabled(&self) -> bool {
        self.phrase == 0
    }
}

/// Points added once per matching article for editorial flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Boosts {
    pub featured: u32,
    pub breaking: u32,
    pub editors_pick: u32,
}

impl Default for Boosts {
    fn default() -> Self {
        ScoringProfile::full_page().boosts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProfileOverrides")]
pub struct ScoringProfile {
    pub title: FieldWeight,
    pub summary: FieldWeight,
    pub content: FieldWeight,
    pub author: FieldWeight,
    pub category: FieldWeight,
    pub tags: FieldWeight,
    pub boosts: Boosts,
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::full_page()
    }
}

impl ScoringProfile {
    /// Weights used by the full search page.
    pub const fn full_page() -> Self {
        Self {
            title: FieldWeight::new(15, 8),
            summary: FieldWeight::new(10, 5),
            content: FieldWeight::new(7, 3),
            author: FieldWeight::phrase_only(6),
            category: FieldWeight::phrase_only(5),
            tags: FieldWeight::phrase_only(4),
            boosts: Boosts {
                featured: 2,
                breaking: 3,
                editors_pick: 1,
            },
        }
    }

    /// Lighter weights used by the compact search modal.
    pub const fn compact() -> Self {
        Self {
            title: FieldWeight::new(10, 5),
            summary: FieldWeight::new(7, 3),
            content: FieldWeight::new(5, 2),
            author: FieldWeight::phrase_only(4),
            category: FieldWeight::phrase_only(3),
            tags: FieldWeight::phrase_only(3),
            boosts: Boosts {
                featured: 1,
                breaking: 2,
                editors_pick: 0,
            },
        }
    }

    /// Look up a built-in preset by name.
    pub fn named(name: &str) -> Result<Self> {
        name.parse::<ProfileName>().map(ProfileName::profile)
    }

    pub fn weight(&self, field: SearchField) -> FieldWeight {
        match field {
            SearchField::Title => self.title,
            SearchField::Summary => self.summary,
            SearchField::Content => self.content,
            SearchField::Author => self.author,
            SearchField::Category => self.category,
            SearchField::Tags => self.tags,
        }
    }

    /// Reject weight tables the engine cannot apply consistently.
    ///
    /// A field with zero phrase points but non-zero word points would have
    /// its word matches suppressed by a worthless phrase match.
    pub fn validate(&self) -> Result<()> {
        for field in SearchField::ALL {
            let w = self.weight(field);
            if field.is_phrase_only() && w.word.is_some() {
                return Err(Error::InvalidProfile(format!(
                    "{}: phrase-only field cannot take a word weight",
                    field
                )));
            }
            if w.phrase == 0 && w.word.is_some_and(|p| p > 0) {
                return Err(Error::InvalidProfile(format!(
                    "{}: word weight {} requires a non-zero phrase weight",
                    field,
                    w.word.unwrap_or_default()
                )));
            }
        }
        Ok(())
    }
}

/// One field's entry in a custom profile table.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct WeightOverride {
    #[serde(default)]
    phrase: Option<u32>,
    #[serde(default)]
    word: Option<u32>,
}

impl WeightOverride {
    fn apply(self, base: FieldWeight) -> FieldWeight {
        let word = match (self.phrase, self.word) {
            (_, Some(word)) => Some(word),
            (Some(0), None) => None,
            (_, None) => base.word,
        };
        FieldWeight {
            phrase: self.phrase.unwrap_or(base.phrase),
            word,
        }
    }
}

/// Wire form of a custom profile, layered over [`ScoringProfile::full_page`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProfileOverrides {
    title: WeightOverride,
    summary: WeightOverride,
    content: WeightOverride,
    author: WeightOverride,
    category: WeightOverride,
    tags: WeightOverride,
    boosts: Boosts,
}

impl From<ProfileOverrides> for ScoringProfile {
    fn from(o: ProfileOverrides) -> Self {
        let base = ScoringProfile::full_page();
        ScoringProfile {
            title: o.title.apply(base.title),
            summary: o.summary.apply(base.summary),
            content: o.content.apply(base.content),
            author: o.author.apply(base.author),
            category: o.category.apply(base.category),
            tags: o.tags.apply(base.tags),
            boosts: o.boosts,
        }
    }
}

/// Names of the built-in presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileName {
    Full,
    Compact,
}

impl ProfileName {
    pub const ALL: [ProfileName; 2] = [ProfileName::Full, ProfileName::Compact];

    pub fn profile(self) -> ScoringProfile {
        match self {
            ProfileName::Full => ScoringProfile::full_page(),
            ProfileName::Compact => ScoringProfile::compact(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileName::Full => "full",
            ProfileName::Compact => "compact",
        }
    }
}

impl FromStr for ProfileName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "page" | "full_page" => Ok(ProfileName::Full),
            "compact" | "modal" => Ok(ProfileName::Compact),
            _ => Err(Error::UnknownProfile(s.to_string())),
        }
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
