//! Input validation and canonical URL derivation
//!
//! Everything here is pure apart from the asset lookup, which is delegated to
//! an [`AssetProbe`].

use crate::{AssetProbe, CatalogError, NewGame};

/// Title and image of a create request that passed [`require_fields`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFields<'a> {
    pub title: &'a str,
    pub image: &'a str,
}

/// Check the fields a create request cannot do without
pub fn require_fields(input: &NewGame) -> Result<RequiredFields<'_>, CatalogError> {
    let title = match input.title.as_deref() {
        Some(title) if !title.trim().is_empty() => title,
        _ => return Err(CatalogError::Validation("title required".to_string())),
    };

    let image = input
        .image
        .as_deref()
        .ok_or_else(|| CatalogError::Validation("image required".to_string()))?;

    Ok(RequiredFields { title, image })
}

/// Lower-case the title and collapse each whitespace run into one hyphen
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_whitespace = false;
        }
    }

    slug
}

pub fn derive_image_url(slug: &str, base_games_url: &str) -> String {
    format!("{}/{}/cover.png", base_games_url.trim_end_matches('/'), slug)
}

pub fn derive_game_url(slug: &str, base_games_url: &str) -> String {
    format!("{}/{}/index.html", base_games_url.trim_end_matches('/'), slug)
}

/// Path component of `image` when it points at this site, `None` for
/// foreign origins and non-http schemes
pub fn same_origin_path<'a>(image: &'a str, server_url: &str) -> Option<&'a str> {
    let server_url = server_url.trim_end_matches('/');

    let path = if image.starts_with("//") {
        return None;
    } else if let Some(rest) = image.strip_prefix(server_url).filter(|_| !server_url.is_empty()) {
        if !(rest.is_empty() || rest.starts_with('/')) {
            return None;
        }
        rest
    } else if image.contains("://") || image.starts_with("data:") {
        return None;
    } else {
        image
    };

    let end = path.find(['?', '#']).unwrap_or(path.len());
    Some(&path[..end])
}

/// Swap a same-origin cover that does not exist for the default cover
pub fn resolve_image_or_default(
    image: &str,
    server_url: &str,
    probe: &dyn AssetProbe,
    default_image_url: &str,
) -> String {
    if image.trim().is_empty() {
        return default_image_url.to_string();
    }

    match same_origin_path(image, server_url) {
        Some(path) if !probe.exists(path) => {
            tracing::info!("Cover {} not found, using default image", image);
            default_image_url.to_string()
        }
        _ => image.to_string(),
    }
}
