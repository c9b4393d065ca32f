//! Provenance stamping — where a resolved record actually came from.
//!
//! Downstream consumers must be able to distinguish "current" data from
//! "carried forward" data, so every resolved record is tagged with the
//! coordinate it was found at. The pass is pure: no side effects, no
//! mutation of inputs.

use std::collections::HashMap;

use lineup_core::{
  assignment::{Assignment, Scenario, TimePoint},
  athlete::Athlete,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── EffectiveAssignment ─────────────────────────────────────────────────────

/// The as-of-a-point-in-time value for a slot — derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveAssignment {
  #[serde(flatten)]
  pub assignment:      Assignment,
  /// `false` only when the record matched the query coordinate exactly.
  pub is_inherited:    bool,
  /// The scenario the value was actually found in.
  pub source_scenario: Scenario,
  /// The year the value was drawn from — fallback may cross year boundaries.
  pub source_year:     i32,
  pub source_month:    u8,
  /// Display join supplied by the caller; opaque passthrough.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub athlete:         Option<Athlete>,
}

// ─── Slot source ─────────────────────────────────────────────────────────────

/// The coordinate a slot's records were resolved from.
#[derive(Debug, Clone)]
pub struct SlotSource {
  pub scenario:  Scenario,
  pub at:        TimePoint,
  pub inherited: bool,
}

/// Materialise [`EffectiveAssignment`] records for one slot from the chosen
/// assignments and the coordinate actually used.
pub fn annotate(
  chosen: &[&Assignment],
  source: &SlotSource,
  athletes: Option<&HashMap<Uuid, Athlete>>,
) -> Vec<EffectiveAssignment> {
  chosen
    .iter()
    .map(|a| EffectiveAssignment {
      assignment:      (*a).clone(),
      is_inherited:    source.inherited,
      source_scenario: source.scenario.clone(),
      source_year:     source.at.year,
      source_month:    source.at.month,
      athlete:         athletes
        .and_then(|m| m.get(&a.athlete_id))
        .cloned(),
    })
    .collect()
}
