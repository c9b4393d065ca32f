//! Handlers for `/athletes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/athletes` | `?customer_id` required; optional `search`, `position` |
//! | `POST` | `/athletes` | Body: [`NewAthlete`]; returns 201 |
//! | `GET`  | `/athletes/:id/assignment` | Explicit assignment at an exact coordinate |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use lineup_core::{
  assignment::{Assignment, Scenario, TimePoint},
  athlete::{Athlete, AthleteFilter, NewAthlete},
  store::RosterStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub customer_id: Uuid,
  /// Substring match against first or last name.
  pub search:      Option<String>,
  /// Substring match against the position field.
  pub position:    Option<String>,
}

/// `GET /athletes?customer_id=<id>[&search=...][&position=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Athlete>>, ApiError>
where
  S: RosterStore,
{
  let filter = AthleteFilter {
    search:   params.search,
    position: params.position,
  };
  let athletes = store
    .list_athletes(params.customer_id, &filter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(athletes))
}

/// `POST /athletes` — returns 201 + the stored [`Athlete`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewAthlete>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  let athlete = store
    .add_athlete(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(athlete)))
}

// ─── Assigned check ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssignedParams {
  pub customer_id: Uuid,
  pub year:        i32,
  pub month:       u8,
  /// Omitted or empty = baseline.
  pub scenario:    Option<String>,
}

/// Whether the athlete holds an explicit record at the queried coordinate.
#[derive(Debug, Serialize)]
pub struct AssignedStatus {
  pub is_assigned: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignment:  Option<Assignment>,
}

/// `GET /athletes/:id/assignment?customer_id=<id>&year=<y>&month=<m>[&scenario=...]`
///
/// Exact coordinate only — inherited presence does not count. Useful as a
/// pre-flight check before offering an athlete for assignment.
pub async fn assignment_status<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<AssignedParams>,
) -> Result<Json<AssignedStatus>, ApiError>
where
  S: RosterStore,
{
  let scenario = params.scenario.map(Scenario::named).unwrap_or_default();
  let assignment = store
    .athlete_assignment(
      params.customer_id,
      id,
      scenario,
      TimePoint::new(params.year, params.month),
    )
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(AssignedStatus {
    is_assigned: assignment.is_some(),
    assignment,
  }))
}
