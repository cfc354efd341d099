//! Shard file decoding.
//!
//! # Responsibility
//! - Turn shard JSON text or files into validated payloads.
//!
//! # Invariants
//! - Decoding never reorders fragments or implementors.
//! - Blank crate names are rejected with their entry position.

use crate::model::fragment::{ShardPayload, WireEntries};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ShardResult<T> = Result<T, ShardError>;

#[derive(Debug)]
pub enum ShardError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    EmptyCrateName {
        position: usize,
    },
}

impl Display for ShardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read shard `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid shard json: {err}"),
            Self::EmptyCrateName { position } => {
                write!(f, "shard crate name at position {position} must not be empty")
            }
        }
    }
}

impl Error for ShardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::EmptyCrateName { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ShardError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl ShardPayload {
    /// Decodes `{"<crate>": ["<markup>", ...]}` text.
    ///
    /// # Errors
    /// - `Json` when the text is not an object of string arrays.
    /// - `EmptyCrateName` when a key is blank.
    pub fn from_json_str(text: &str) -> ShardResult<Self> {
        let entries: WireEntries = serde_json::from_str(text)?;
        Self::from_entries(entries).map_err(|position| ShardError::EmptyCrateName { position })
    }
}

/// Reads and decodes one shard file.
pub fn load_shard_file(path: impl AsRef<Path>) -> ShardResult<ShardPayload> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ShardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let payload = ShardPayload::from_json_str(&text)?;
    info!(
        "event=shard_loaded module=shard status=ok fragments={} path={}",
        payload.len(),
        path.display()
    );
    Ok(payload)
}
