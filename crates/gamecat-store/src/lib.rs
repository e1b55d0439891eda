//! Record store for the gamecat catalog
//!
//! Keeps the ordered list of game records in a single UTF-8 JSON file. The
//! file holds an array of `{title, image, description, url?}` objects; a
//! missing file reads as an empty array.

mod json_store;
mod record;

pub use json_store::GameStore;
pub use record::GameRecord;

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Read,
    Write,
    Rename,
    Sync,
    CreateDir,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreOp::Read => "read",
            StoreOp::Write => "write",
            StoreOp::Rename => "rename",
            StoreOp::Sync => "sync",
            StoreOp::CreateDir => "create directory",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Catalog file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to {op} {path}: {source}")]
    Io {
        op: StoreOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(op: StoreOp, path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            StoreError::Corrupt { path, .. } | StoreError::Io { path, .. } => path,
        }
    }
}
