//! Integration tests for the catalog service against a real document root

use gamecat_catalog::{Catalog, CatalogError, GamePatch, GameStore, NewGame};
use gamecat_config::{GamecatConfig, SiteConfig, StorageConfig};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

/// Test environment with a document root holding a few game folders
struct CatalogTestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    document_root: PathBuf,
    config: GamecatConfig,
}

impl CatalogTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let document_root = temp_dir.path().join("www");
        fs::create_dir_all(&document_root).unwrap();

        let config = GamecatConfig {
            site: SiteConfig {
                server_url: Some("http://localhost:3000".to_string()),
                document_root: document_root.clone(),
                ..Default::default()
            },
            storage: StorageConfig {
                games_file: PathBuf::from("data/games.json"),
            },
            ..Default::default()
        };

        Self {
            temp_dir,
            document_root,
            config,
        }
    }

    fn create_cover(&self, slug: &str) -> String {
        let dir = self.document_root.join("games").join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("cover.png"), b"FAKE_PNG").unwrap();
        format!("/games/{}/cover.png", slug)
    }

    fn catalog(&self) -> Catalog {
        Catalog::from_config(&self.config)
    }
}

#[test]
fn test_catalog_uses_configured_paths() {
    let env = CatalogTestEnv::new();
    let catalog = env.catalog();

    assert_eq!(
        catalog.store().path(),
        env.document_root.join("data/games.json")
    );
    assert_eq!(
        catalog.links().default_image_url,
        "http://localhost:3000/images/default-game-cover.png"
    );
}

#[test]
fn test_existing_cover_is_kept() {
    let env = CatalogTestEnv::new();
    let cover = env.create_cover("pong");
    let catalog = env.catalog();

    let record = catalog.create(NewGame::new("Pong", cover.clone())).unwrap();
    assert_eq!(record.image, cover);

    // Absolute same-origin URLs are checked too
    let record = catalog
        .create(NewGame::new(
            "Tetris",
            "http://localhost:3000/games/tetris/cover.png",
        ))
        .unwrap();
    assert_eq!(record.image, catalog.links().default_image_url);
}

#[test]
fn test_store_created_lazily() {
    let env = CatalogTestEnv::new();
    let catalog = env.catalog();

    assert!(catalog.list_all().unwrap().is_empty());
    assert!(!catalog.store().path().exists());

    catalog.create(NewGame::new("Pong", "/a.png")).unwrap();
    assert!(catalog.store().path().exists());
}

#[test]
fn test_concurrent_creates_are_not_lost() {
    let env = CatalogTestEnv::new();
    let catalog = Arc::new(env.catalog());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                catalog
                    .create(NewGame::new(format!("Game {}", i), "/cover.png"))
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut titles: Vec<_> = catalog
        .list_all()
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    titles.sort();

    let mut expected: Vec<_> = (0..16).map(|i| format!("Game {}", i)).collect();
    expected.sort();
    assert_eq!(titles, expected);
}

#[test]
fn test_concurrent_duplicate_creates_admit_one() {
    let env = CatalogTestEnv::new();
    let catalog = Arc::new(env.catalog());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || catalog.create(NewGame::new("Pong", "/cover.png")))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let created = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(CatalogError::Conflict(_))))
        .count();

    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(catalog.list_all().unwrap().len(), 1);
}

#[test]
fn test_full_lifecycle() {
    let env = CatalogTestEnv::new();
    let catalog = env.catalog();

    catalog
        .create(NewGame::new("Pong", "/a.png").with_description("classic"))
        .unwrap();

    let updated = catalog
        .update(
            "Pong",
            GamePatch {
                url: Some("https://x.test/pong".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.description, "classic");
    assert_eq!(updated.url.as_deref(), Some("https://x.test/pong"));

    catalog.delete("Pong").unwrap();
    assert!(catalog.find("Pong").unwrap().is_none());
    assert!(matches!(
        catalog.update("Pong", GamePatch::default()),
        Err(CatalogError::NotFound(_))
    ));
}

#[test]
fn test_catalog_reads_existing_file() {
    let env = CatalogTestEnv::new();
    let path = env.config.games_file_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"[
  {"title": "Pong", "image": "/games/pong/cover.png", "description": "classic"},
  {"title": "Tetris", "image": "/games/tetris/cover.png", "description": "", "url": "https://x.test/tetris"}
]"#,
    )
    .unwrap();

    let records = GameStore::new(&path).load().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(env.catalog().list_all().unwrap(), records);
}

#[test]
fn test_failed_save_leaves_store_untouched() {
    let mut env = CatalogTestEnv::new();
    let blocker = env.document_root.join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    env.config.storage.games_file = PathBuf::from("blocker/games.json");
    let catalog = env.catalog();

    let err = catalog.create(NewGame::new("Pong", "/a.png")).unwrap_err();
    assert!(matches!(err, CatalogError::Store(_)));
    assert_eq!(err.kind(), "io");

    // No temp files, blocker intact, reads still work
    let leftovers: Vec<_> = fs::read_dir(&env.document_root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
    assert!(catalog.list_all().unwrap().is_empty());
}
