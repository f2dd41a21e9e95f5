use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

/// Lowercase, trimmed topic keyword.
pub type Topic = String;

/// Topic -> supplementary reading links, in file order.
pub type BlogTable = HashMap<Topic, Vec<String>>;

/// Startup failures while reading the topic or blog files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: expected `topic|link, link, ...`, got {content:?}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        content: String,
    },
}
