//! Cover asset lookup

use std::path::{Component, Path, PathBuf};

/// Answers whether a same-origin asset path (e.g. `/games/pong/cover.png`) exists
pub trait AssetProbe: Send + Sync {
    fn exists(&self, path: &str) -> bool;
}

impl<F> AssetProbe for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn exists(&self, path: &str) -> bool {
        self(path)
    }
}

/// Resolves asset paths against a local web root
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    root: PathBuf,
}

impl DocumentRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a URL path onto the filesystem. Paths that climb out of the root
    /// resolve to nothing.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        for component in Path::new(path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(resolved)
    }
}

impl AssetProbe for DocumentRoot {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }
}
