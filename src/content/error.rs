//! Content errors that abort a build

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading content documents
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{path:?}: missing front-matter block")]
    MissingFrontMatter { path: PathBuf },

    #[error("{path:?}: malformed front-matter: {source}")]
    MalformedFrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path:?}: missing required field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("{path:?}: invalid {field} {value:?}")]
    InvalidDate {
        path: PathBuf,
        field: &'static str,
        value: String,
    },

    #[error("duplicate slug {slug}: {first:?} and {second:?}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("{path} is written by both {first} and {second}")]
    OutputConflict {
        path: String,
        first: String,
        second: String,
    },

    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
