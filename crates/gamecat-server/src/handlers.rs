//! Route handlers
//!
//! Catalog calls touch the filesystem, so each one runs on the blocking pool.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use gamecat_catalog::{Catalog, CatalogError, GamePatch, GameRecord, NewGame};
use serde::Serialize;
use std::sync::Arc;

use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub message: &'static str,
    pub game: GameRecord,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

async fn with_catalog<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&Catalog) -> Result<T, CatalogError> + Send + 'static,
    T: Send + 'static,
{
    let catalog = Arc::clone(&state.catalog);
    match tokio::task::spawn_blocking(move || op(&catalog)).await {
        Ok(result) => result.map_err(|err| ApiError::from_catalog(err, state)),
        Err(join_err) => {
            tracing::error!("Catalog task failed: {}", join_err);
            Err(ApiError::internal())
        }
    }
}

pub async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<GameRecord>>, ApiError> {
    let games = with_catalog(&state, |catalog| catalog.list_all()).await?;
    Ok(Json(games))
}

pub async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<NewGame>, JsonRejection>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let Json(input) = payload?;
    let game = with_catalog(&state, move |catalog| catalog.create(input)).await?;

    Ok((
        StatusCode::CREATED,
        Json(GameResponse {
            message: "Game added successfully",
            game,
        }),
    ))
}

pub async fn update_game(
    State(state): State<AppState>,
    title: Result<Path<String>, PathRejection>,
    payload: Result<Json<GamePatch>, JsonRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let Path(title) = title?;
    let Json(patch) = payload?;
    let game = with_catalog(&state, move |catalog| catalog.update(&title, patch)).await?;

    Ok(Json(GameResponse {
        message: "Game updated successfully",
        game,
    }))
}

pub async fn delete_game(
    State(state): State<AppState>,
    title: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(title) = title?;
    with_catalog(&state, move |catalog| catalog.delete(&title)).await?;

    Ok(Json(MessageResponse {
        message: "Game deleted successfully",
    }))
}

/// `POST /save-game.php`, kept for old clients
pub async fn save_game_legacy(
    State(state): State<AppState>,
    payload: Result<Json<NewGame>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(input) = payload?;
    with_catalog(&state, move |catalog| catalog.create(input)).await?;

    Ok(Json(MessageResponse {
        message: "Game saved successfully",
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}
