//! Depth ordering within a single slot.

use lineup_core::assignment::Assignment;

/// Total order for the athletes stacked at one slot: `ranking` ascending
/// (1 = top), ties broken by athlete id then assignment id.
///
/// The tie-break makes the output a function of the record *set* — two calls
/// over permutations of the same history produce identical output.
pub fn depth_order(entries: &mut [&Assignment]) {
  entries.sort_by(|a, b| {
    a.ranking
      .cmp(&b.ranking)
      .then_with(|| a.athlete_id.cmp(&b.athlete_id))
      .then_with(|| a.assignment_id.cmp(&b.assignment_id))
  });
}
