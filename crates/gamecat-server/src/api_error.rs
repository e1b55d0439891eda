//! Translation of catalog failures into HTTP responses

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use gamecat_catalog::{CatalogError, StoreError};
use serde::Serialize;
use serde_json::{Value, json};

use crate::AppState;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "Internal server error",
        )
    }

    pub fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", "Route not found")
    }

    /// Map a catalog failure. Store failures are logged here and reduced to a
    /// generic message.
    pub fn from_catalog(err: CatalogError, state: &AppState) -> Self {
        let kind = err.kind();
        match err {
            CatalogError::Validation(message) => {
                Self::new(StatusCode::BAD_REQUEST, kind, message)
            }
            CatalogError::Conflict(_) => Self::new(
                StatusCode::CONFLICT,
                kind,
                "Game with this title already exists",
            ),
            CatalogError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, kind, "Game not found"),
            CatalogError::Store(store_err) => {
                log_store_error(&store_err);
                let mut api_err = Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    kind,
                    "Failed to access the game catalog",
                );
                if state.expose_diagnostics {
                    api_err.details = Some(diagnostics(state));
                }
                api_err
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "validation",
            format!("Invalid JSON body: {}", rejection.body_text()),
        )
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "validation",
            format!("Invalid game title in path: {}", rejection.body_text()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            kind: self.kind,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

fn log_store_error(err: &StoreError) {
    match err {
        StoreError::Corrupt { path, source } => {
            tracing::error!(path = %path.display(), "Catalog file is corrupt: {}", source);
        }
        StoreError::Io { op, path, source } => {
            tracing::error!(path = %path.display(), %op, "Catalog I/O failed: {}", source);
        }
    }
}

fn diagnostics(state: &AppState) -> Value {
    let store = state.catalog.store();
    let writable = if store.is_writable() {
        "Writable"
    } else {
        "Not writable"
    };

    json!({
        "file_permissions": {
            "games_json": writable,
            "games_json_path": store.path().display().to_string(),
            "document_root": state.document_root.display().to_string(),
        }
    })
}
