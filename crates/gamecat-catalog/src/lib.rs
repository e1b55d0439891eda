//! Game catalog service for gamecat
//!
//! Validates inbound game data, derives canonical URLs from titles and is the
//! only writer of the record store. Every mutation is a locked
//! load-modify-save against the catalog file.

mod assets;
mod input;
mod service;
pub mod validation;

pub use assets::{AssetProbe, DocumentRoot};
pub use gamecat_store::{GameRecord, GameStore, StoreError};
pub use input::{GamePatch, NewGame};
pub use service::{Catalog, MigrationReport, SiteLinks};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error("Game with this title already exists: {0}")]
    Conflict(String),

    #[error("Game not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Validation(_) => "validation",
            CatalogError::Conflict(_) => "conflict",
            CatalogError::NotFound(_) => "not_found",
            CatalogError::Store(StoreError::Corrupt { .. }) => "corrupt_store",
            CatalogError::Store(StoreError::Io { .. }) => "io",
        }
    }
}
