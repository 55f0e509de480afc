//! Error types for caller-supplied selectors.
//!
//! Scoring itself is total and never fails. These errors only arise when a
//! profile name, sort order, or custom weight table handed in by a caller
//! cannot be understood.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown scoring profile: '{0}'. Use full, compact, or a configured profile name.")]
    UnknownProfile(String),

    #[error("unknown sort order: '{0}'. Use relevance or date.")]
    UnknownSortOrder(String),

    #[error("invalid scoring profile: {0}")]
    InvalidProfile(String),
}

pub type Result<T> = std::result::Result<T, Error>;
