//! HTTP front door for the gamecat catalog
//!
//! Exposes the catalog as a CORS-enabled JSON API:
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/games` | 200, array of games |
//! | POST | `/games` | 201, `{message, game}` |
//! | PUT | `/games/{title}` | 200, `{message, game}` |
//! | DELETE | `/games/{title}` | 200, `{message}` |
//! | OPTIONS | any | 200, empty |
//!
//! The same routes are mounted under `/api/games`. `GET /games.json` and
//! `POST /save-game.php` remain for older clients.

mod api_error;
mod handlers;

pub use api_error::ApiError;

use axum::extract::Request;
use axum::http::{Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use gamecat_catalog::Catalog;
use gamecat_config::GamecatConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub document_root: PathBuf,
    pub expose_diagnostics: bool,
}

impl AppState {
    pub fn from_config(config: &GamecatConfig) -> Self {
        Self {
            catalog: Arc::new(Catalog::from_config(config)),
            document_root: config.document_root().to_path_buf(),
            expose_diagnostics: config.server.expose_diagnostics,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/games", get(handlers::list_games).post(handlers::create_game))
        .route(
            "/games/:title",
            put(handlers::update_game).delete(handlers::delete_game),
        )
        .route(
            "/api/games",
            get(handlers::list_games).post(handlers::create_game),
        )
        .route(
            "/api/games/:title",
            put(handlers::update_game).delete(handlers::delete_game),
        )
        .route("/games.json", get(handlers::list_games))
        .route("/save-game.php", post(handlers::save_game_legacy))
        .route("/health", get(handlers::health))
        .fallback(handlers::route_not_found)
        .layer(middleware::from_fn(answer_options))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any OPTIONS request gets an empty 200, whatever the path
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}
