//! Catalog service: create, list, update and delete game records

use crate::validation::{derive_game_url, require_fields, resolve_image_or_default, slugify};
use crate::{AssetProbe, CatalogError, DocumentRoot, GamePatch, NewGame};
use gamecat_config::GamecatConfig;
use gamecat_store::{GameRecord, GameStore};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// Base URLs used for derivation and image fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLinks {
    pub server_url: String,
    pub games_base_url: String,
    pub default_image_url: String,
}

impl SiteLinks {
    pub fn from_config(config: &GamecatConfig) -> Self {
        Self {
            server_url: config.server_url(),
            games_base_url: config.games_base_url(),
            default_image_url: config.default_image_url(),
        }
    }
}

/// Outcome of [`Catalog::migrate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub records: usize,
    pub urls_backfilled: usize,
    pub images_reset: usize,
}

impl MigrationReport {
    pub fn changed(&self) -> bool {
        self.urls_backfilled > 0 || self.images_reset > 0
    }
}

/// The catalog. Share it behind an `Arc`; all methods take `&self`.
pub struct Catalog {
    store: GameStore,
    links: SiteLinks,
    probe: Box<dyn AssetProbe>,
    write_lock: Mutex<()>,
}

impl Catalog {
    pub fn new(store: GameStore, links: SiteLinks, probe: impl AssetProbe + 'static) -> Self {
        Self {
            store,
            links,
            probe: Box::new(probe),
            write_lock: Mutex::new(()),
        }
    }

    /// Catalog over the configured file, checking covers under the document root
    pub fn from_config(config: &GamecatConfig) -> Self {
        Self::new(
            GameStore::new(config.games_file_path()),
            SiteLinks::from_config(config),
            DocumentRoot::new(config.document_root()),
        )
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn links(&self) -> &SiteLinks {
        &self.links
    }

    /// All records in insertion order
    pub fn list_all(&self) -> Result<Vec<GameRecord>, CatalogError> {
        Ok(self.store.load()?)
    }

    pub fn find(&self, title: &str) -> Result<Option<GameRecord>, CatalogError> {
        let records = self.store.load()?;
        Ok(records.into_iter().find(|r| r.title == title))
    }

    pub fn create(&self, input: NewGame) -> Result<GameRecord, CatalogError> {
        let fields = require_fields(&input)?;

        let record = GameRecord {
            title: fields.title.to_string(),
            image: self.resolve_cover(fields.image),
            description: input.description.unwrap_or_default(),
            url: input.url.filter(|url| !url.trim().is_empty()),
        };

        self.mutate(|records| {
            if records.iter().any(|r| r.title == record.title) {
                return Err(CatalogError::Conflict(record.title.clone()));
            }
            records.push(record.clone());
            Ok((record, true))
        })
        .inspect(|record| info!("Added game {:?}", record.title))
    }

    /// Overwrite only the fields present in `patch`. A new cover goes through
    /// the same existence check as on create.
    pub fn update(&self, title: &str, patch: GamePatch) -> Result<GameRecord, CatalogError> {
        let patch = GamePatch {
            image: patch.image.map(|image| self.resolve_cover(&image)),
            ..patch
        };

        self.mutate(|records| {
            let record = records
                .iter_mut()
                .find(|r| r.title == title)
                .ok_or_else(|| CatalogError::NotFound(title.to_string()))?;

            if patch.is_empty() {
                debug!("Empty update for {:?}, nothing to write", title);
                return Ok((record.clone(), false));
            }

            if let Some(image) = patch.image {
                record.image = image;
            }
            if let Some(description) = patch.description {
                record.description = description;
            }
            if let Some(url) = patch.url {
                record.url = Some(url);
            }

            Ok((record.clone(), true))
        })
        .inspect(|_| info!("Updated game {:?}", title))
    }

    pub fn delete(&self, title: &str) -> Result<(), CatalogError> {
        self.mutate(|records| {
            let index = records
                .iter()
                .position(|r| r.title == title)
                .ok_or_else(|| CatalogError::NotFound(title.to_string()))?;
            records.remove(index);
            Ok(((), true))
        })
        .inspect(|_| info!("Deleted game {:?}", title))
    }

    /// Stored play URL, or the canonical one derived from the title
    pub fn play_url(&self, record: &GameRecord) -> String {
        match record.url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => derive_game_url(&slugify(&record.title), &self.links.games_base_url),
        }
    }

    /// Backfill missing play URLs and reset covers that no longer exist
    pub fn migrate(&self) -> Result<MigrationReport, CatalogError> {
        let report = self.mutate(|records| {
            let mut report = MigrationReport {
                records: records.len(),
                ..Default::default()
            };

            for record in records.iter_mut() {
                if record.url.as_deref().is_none_or(|url| url.trim().is_empty()) {
                    let url = derive_game_url(&slugify(&record.title), &self.links.games_base_url);
                    info!("Play URL for {:?} -> {}", record.title, url);
                    record.url = Some(url);
                    report.urls_backfilled += 1;
                }

                if record.image != self.links.default_image_url {
                    let image = self.resolve_cover(&record.image);
                    if image != record.image {
                        info!("Cover for {:?}: {} -> {}", record.title, record.image, image);
                        record.image = image;
                        report.images_reset += 1;
                    }
                }
            }

            let changed = report.changed();
            Ok((report, changed))
        })?;

        info!(
            "Migration checked {} records: {} play URLs backfilled, {} covers reset",
            report.records, report.urls_backfilled, report.images_reset
        );
        Ok(report)
    }

    fn resolve_cover(&self, image: &str) -> String {
        resolve_image_or_default(
            image,
            &self.links.server_url,
            self.probe.as_ref(),
            &self.links.default_image_url,
        )
    }

    /// Run a load-modify-save under the write lock. `op` returns whether it
    /// changed anything; unchanged lists are not written back.
    fn mutate<T, F>(&self, op: F) -> Result<T, CatalogError>
    where
        F: FnOnce(&mut Vec<GameRecord>) -> Result<(T, bool), CatalogError>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut records = self.store.load()?;
        let (output, changed) = op(&mut records)?;
        if changed {
            self.store.save(&records)?;
        }

        Ok(output)
    }
}
