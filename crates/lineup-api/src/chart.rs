//! Handlers for `/chart` endpoints — the resolved depth chart.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/chart` | Flat list of effective assignments |
//! | `GET` | `/chart/summary` | Grouped per sub-position, empty slots included |
//!
//! Both read a snapshot through the store and hand it to the pure resolution
//! engine; no resolution logic lives here.

use std::{collections::HashMap, sync::Arc};

use axum::{
  Json,
  extract::{Query, State},
};
use lineup_core::{
  assignment::Scenario,
  formation::SubPosition,
  store::RosterStore,
};
use lineup_engine::{ChartQuery, EffectiveAssignment};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Query-string form of [`ChartQuery`]. Kept flat and explicit because query
/// strings deserialize every value from text.
#[derive(Debug, Deserialize)]
pub struct ChartParams {
  pub customer_id:  Uuid,
  pub formation_id: Uuid,
  pub year:         i32,
  pub month:        u8,
  /// Omitted or empty = baseline.
  pub scenario:     Option<String>,
}

impl ChartParams {
  fn into_query(self) -> ChartQuery {
    ChartQuery {
      customer_id:  self.customer_id,
      formation_id: self.formation_id,
      scenario:     self
        .scenario
        .map(Scenario::named)
        .unwrap_or_default(),
      at:           lineup_core::assignment::TimePoint::new(
        self.year, self.month,
      ),
    }
  }
}

/// `GET /chart` — the effective roster as a flat list, slots in formation
/// order, athletes in depth order within each slot.
pub async fn chart<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ChartParams>,
) -> Result<Json<Vec<EffectiveAssignment>>, ApiError>
where
  S: RosterStore,
{
  let query = params.into_query();
  let (_, effective) = resolve_chart(store.as_ref(), &query).await?;
  Ok(Json(effective))
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// One slot's resolved depth order. Slots with no applicable history appear
/// with an empty athlete list.
#[derive(Debug, Serialize)]
pub struct SlotSummary {
  pub sub_position_id: Uuid,
  pub name:            String,
  pub x_coord:         f64,
  pub y_coord:         f64,
  pub athletes:        Vec<EffectiveAssignment>,
}

/// The resolved chart grouped by sub-position, echoing the query coordinate.
#[derive(Debug, Serialize)]
pub struct ChartSummary {
  pub formation_id: Uuid,
  pub scenario:     Scenario,
  pub year:         i32,
  pub month:        u8,
  pub slots:        Vec<SlotSummary>,
}

/// `GET /chart/summary`
pub async fn summary<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ChartParams>,
) -> Result<Json<ChartSummary>, ApiError>
where
  S: RosterStore,
{
  let query = params.into_query();
  let (slots, effective) = resolve_chart(store.as_ref(), &query).await?;

  let mut by_slot: HashMap<Uuid, Vec<EffectiveAssignment>> = HashMap::new();
  for ea in effective {
    by_slot
      .entry(ea.assignment.sub_position_id)
      .or_default()
      .push(ea);
  }

  // Slot order comes from the store listing, never from the map.
  let slots = slots
    .into_iter()
    .map(|sp| SlotSummary {
      athletes:        by_slot.remove(&sp.sub_position_id).unwrap_or_default(),
      sub_position_id: sp.sub_position_id,
      name:            sp.name,
      x_coord:         sp.x_coord,
      y_coord:         sp.y_coord,
    })
    .collect();

  Ok(Json(ChartSummary {
    formation_id: query.formation_id,
    scenario: query.scenario,
    year: query.at.year,
    month: query.at.month,
    slots,
  }))
}

/// Read the snapshot (active slots, full history, athlete join) and resolve.
async fn resolve_chart<S>(
  store: &S,
  query: &ChartQuery,
) -> Result<(Vec<SubPosition>, Vec<EffectiveAssignment>), ApiError>
where
  S: RosterStore,
{
  let slots = store
    .list_sub_positions(query.formation_id, false)
    .await
    .map_err(ApiError::from_store)?;
  let history = store
    .assignment_history(query.formation_id)
    .await
    .map_err(ApiError::from_store)?;

  let mut ids: Vec<Uuid> = history.iter().map(|a| a.athlete_id).collect();
  ids.sort_unstable();
  ids.dedup();
  let athletes: HashMap<Uuid, lineup_core::athlete::Athlete> = store
    .athletes_by_ids(query.customer_id, &ids)
    .await
    .map_err(ApiError::from_store)?
    .into_iter()
    .map(|a| (a.athlete_id, a))
    .collect();

  let effective = lineup_engine::resolve_with_athletes(
    query,
    &slots,
    &history,
    Some(&athletes),
  )?;
  Ok((slots, effective))
}
