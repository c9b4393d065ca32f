//! The resolve entry point — exact match, then temporal fallback, then the
//! baseline layer.

use std::collections::HashMap;

use lineup_core::{
  assignment::{Assignment, Scenario},
  athlete::Athlete,
  formation::SubPosition,
};
use uuid::Uuid;

use crate::{
  error::{ResolveError, Result},
  history::HistoryIndex,
  provenance::{self, EffectiveAssignment, SlotSource},
  query::ChartQuery,
  rank,
};

/// Resolve the effective roster for `query`.
///
/// `sub_positions` are the formation's slots; `history` is the full
/// assignment history for the formation (all scenarios, years, months).
/// The output lists each slot's athletes in depth order, slots in the order
/// they were supplied; slots with no applicable record are simply absent.
///
/// The result is a pure function of the inputs as *sets* — iteration order
/// of the supplied slices never changes the output.
pub fn resolve(
  query: &ChartQuery,
  sub_positions: &[SubPosition],
  history: &[Assignment],
) -> Result<Vec<EffectiveAssignment>> {
  resolve_with_athletes(query, sub_positions, history, None)
}

/// [`resolve`], additionally joining athlete display records onto the output.
/// The map is opaque passthrough data; athletes missing from it simply leave
/// the `athlete` field empty.
pub fn resolve_with_athletes(
  query: &ChartQuery,
  sub_positions: &[SubPosition],
  history: &[Assignment],
  athletes: Option<&HashMap<Uuid, Athlete>>,
) -> Result<Vec<EffectiveAssignment>> {
  query.validate()?;

  let slots: Vec<&SubPosition> = sub_positions
    .iter()
    .filter(|sp| sp.formation_id == query.formation_id)
    .collect();
  if slots.is_empty() {
    return Err(ResolveError::UnknownFormation(query.formation_id));
  }

  let index = HistoryIndex::new(history, query.customer_id);

  let mut out = Vec::new();
  for sp in slots {
    let Some((source, mut chosen)) =
      resolve_slot(&index, sp.sub_position_id, query)
    else {
      continue;
    };
    rank::depth_order(&mut chosen);
    out.extend(provenance::annotate(&chosen, &source, athletes));
  }
  Ok(out)
}

/// Resolve one slot independently of all others.
fn resolve_slot<'a>(
  index: &HistoryIndex<'a>,
  slot: Uuid,
  query: &'a ChartQuery,
) -> Option<(SlotSource, Vec<&'a Assignment>)> {
  let scenario = query.scenario.as_str();

  // 1. Exact match at the query coordinate.
  if let Some(entries) = index.exact(slot, scenario, query.at) {
    let source = SlotSource {
      scenario:  query.scenario.clone(),
      at:        query.at,
      inherited: false,
    };
    return Some((source, entries.clone()));
  }

  // 2. Same-scenario temporal fallback, strictly before the query.
  if let Some((at, entries)) = index.latest_before(slot, scenario, query.at) {
    let source = SlotSource {
      scenario: query.scenario.clone(),
      at,
      inherited: true,
    };
    return Some((source, entries.clone()));
  }

  // 3. Baseline layer, at or before the query. The inclusive bound differs
  //    from step 2: baseline data valid at the query's own month is visible
  //    to a scenario that never overrode the slot.
  if !query.scenario.is_baseline()
    && let Some((at, entries)) = index.latest_at_or_before(slot, "", query.at)
  {
    let source = SlotSource {
      scenario: Scenario::baseline(),
      at,
      inherited: true,
    };
    return Some((source, entries.clone()));
  }

  // 4. No data anywhere: the slot is absent from the result.
  None
}
