//! Inbound request shapes

use serde::Deserialize;

/// Body of a create request. Every field is optional at the wire level so
/// that missing fields surface as validation errors, not parse errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewGame {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl NewGame {
    pub fn new(title: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            image: Some(image.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Partial update. `None` leaves the stored value alone; `Some("")` clears it,
/// except for `image`, where a blank cover becomes the default one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GamePatch {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl GamePatch {
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.description.is_none() && self.url.is_none()
    }
}
