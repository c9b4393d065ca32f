//! Handlers for `/assignments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/assignments` | Body: [`NewAssignment`]; returns 201 + record |
//! | `POST` | `/assignments/remove` | Body: [`RemoveAssignment`]; returns 204 |
//! | `POST` | `/assignments/move` | Body: [`MoveRanking`]; returns updated record |
//!
//! Recording at a coordinate that already holds the athlete updates the
//! ranking in place; removal and rank moves write new explicit state at the
//! coordinate.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use lineup_core::{
  assignment::{Assignment, MoveRanking, NewAssignment, RemoveAssignment},
  store::RosterStore,
};

use crate::error::ApiError;

/// `POST /assignments`
pub async fn record<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewAssignment>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  let assignment = store
    .record_assignment(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(assignment)))
}

/// `POST /assignments/move` — one step up or down the slot's depth order.
pub async fn move_ranking<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<MoveRanking>,
) -> Result<Json<Assignment>, ApiError>
where
  S: RosterStore,
{
  let assignment = store
    .move_ranking(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(assignment))
}

/// `POST /assignments/remove`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RemoveAssignment>,
) -> Result<StatusCode, ApiError>
where
  S: RosterStore,
{
  store
    .remove_assignment(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
