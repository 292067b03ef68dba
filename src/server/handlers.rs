//! Route handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::error::AppError;
use crate::models::Opening;
use crate::repository::OpeningRepository;

/// GET / - All openings.
pub async fn list_all(
    State(repo): State<OpeningRepository>,
) -> Result<Json<Vec<Opening>>, AppError> {
    Ok(Json(repo.list_all().await?))
}

/// GET /{code} - One opening by ECO code.
pub async fn get_by_code(
    State(repo): State<OpeningRepository>,
    Path(code): Path<String>,
) -> Result<Json<Option<Opening>>, AppError> {
    let opening = repo.get_by_code(&code).await?;
    if opening.is_none() {
        log::debug!("No opening for code {code}");
    }
    Ok(Json(opening))
}

/// GET /next/{*path} - Next move along an opening's line.
pub async fn next_move(
    State(repo): State<OpeningRepository>,
    Path(path): Path<String>,
) -> Result<Json<String>, AppError> {
    Ok(Json(repo.get_next_move(&path).await?))
}

/// GET /next/ - Empty move path; the catch-all route needs one segment.
pub async fn next_move_empty(
    State(repo): State<OpeningRepository>,
) -> Result<Json<String>, AppError> {
    Ok(Json(repo.get_next_move("").await?))
}
