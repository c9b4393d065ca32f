//! Handlers for `/formations` and sub-position endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/formations` | `?customer_id` required; optional `include_ended` |
//! | `POST` | `/formations` | Body: [`NewFormation`]; returns 201 |
//! | `GET`  | `/formations/:id` | Single formation |
//! | `POST` | `/formations/:id/end` | Soft-terminate |
//! | `GET`  | `/formations/:id/sub-positions` | Optional `include_ended` |
//! | `POST` | `/formations/:id/sub-positions` | Body: [`NewSlotBody`]; returns 201 |
//! | `POST` | `/sub-positions/:id/end` | Soft-terminate |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use lineup_core::{
  formation::{Formation, NewFormation, NewSubPosition, SubPosition},
  store::RosterStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Formations ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub customer_id:   Uuid,
  #[serde(default)]
  pub include_ended: bool,
}

/// `GET /formations?customer_id=<id>[&include_ended=true]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Formation>>, ApiError>
where
  S: RosterStore,
{
  let formations = store
    .list_formations(params.customer_id, params.include_ended)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(formations))
}

/// `POST /formations` — returns 201 + the stored [`Formation`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewFormation>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  let formation = store
    .add_formation(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(formation)))
}

/// `GET /formations/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Formation>, ApiError>
where
  S: RosterStore,
{
  let formation = store
    .get_formation(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("formation {id} not found")))?;
  Ok(Json(formation))
}

/// `POST /formations/:id/end`
pub async fn end_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Formation>, ApiError>
where
  S: RosterStore,
{
  let formation =
    store.end_formation(id).await.map_err(ApiError::from_store)?;
  Ok(Json(formation))
}

// ─── Sub-positions ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListSlotsParams {
  #[serde(default)]
  pub include_ended: bool,
}

/// `GET /formations/:id/sub-positions[?include_ended=true]`
pub async fn list_slots<S>(
  State(store): State<Arc<S>>,
  Path(formation_id): Path<Uuid>,
  Query(params): Query<ListSlotsParams>,
) -> Result<Json<Vec<SubPosition>>, ApiError>
where
  S: RosterStore,
{
  let slots = store
    .list_sub_positions(formation_id, params.include_ended)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(slots))
}

/// JSON body accepted by `POST /formations/:id/sub-positions` — the
/// formation id comes from the path.
#[derive(Debug, Deserialize)]
pub struct NewSlotBody {
  pub name:    String,
  #[serde(default)]
  pub x_coord: f64,
  #[serde(default)]
  pub y_coord: f64,
}

/// `POST /formations/:id/sub-positions` — returns 201 + the stored slot.
pub async fn create_slot<S>(
  State(store): State<Arc<S>>,
  Path(formation_id): Path<Uuid>,
  Json(body): Json<NewSlotBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  let slot = store
    .add_sub_position(NewSubPosition {
      formation_id,
      name: body.name,
      x_coord: body.x_coord,
      y_coord: body.y_coord,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(slot)))
}

/// `POST /sub-positions/:id/end`
pub async fn end_slot<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SubPosition>, ApiError>
where
  S: RosterStore,
{
  let slot = store
    .end_sub_position(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(slot))
}
