//! History index — the layered-lookup structure behind fallback search.
//!
//! Assignments are bucketed by `(sub_position_id, scenario)` into a
//! `BTreeMap` keyed by [`TimePoint`], so "latest coordinate at/before the
//! query" is a range scan rather than a linear pass over the full history.

use std::collections::{BTreeMap, HashMap};

use lineup_core::assignment::{Assignment, TimePoint};
use uuid::Uuid;

type Timeline<'a> = BTreeMap<TimePoint, Vec<&'a Assignment>>;

/// A read-only index over one formation's assignment history.
pub struct HistoryIndex<'a> {
  by_key: HashMap<(Uuid, &'a str), Timeline<'a>>,
}

impl<'a> HistoryIndex<'a> {
  /// Build the index from a history snapshot.
  ///
  /// Records belonging to a different customer are dropped here: the write
  /// path enforces that they cannot exist, but a caller handing us a mixed
  /// snapshot must not see another customer's athletes.
  pub fn new(history: &'a [Assignment], customer_id: Uuid) -> Self {
    let mut by_key: HashMap<(Uuid, &'a str), Timeline<'a>> = HashMap::new();
    for a in history {
      if a.customer_id != customer_id {
        continue;
      }
      by_key
        .entry((a.sub_position_id, a.scenario.as_str()))
        .or_default()
        .entry(a.at)
        .or_default()
        .push(a);
    }
    Self { by_key }
  }

  // Lookups take `&'a str` so the probe key matches the stored key type;
  // `HistoryIndex` is covariant in `'a`, so callers holding a longer-lived
  // index can still probe with a shorter-lived scenario label.
  fn timeline(&self, slot: Uuid, scenario: &'a str) -> Option<&Timeline<'a>> {
    self.by_key.get(&(slot, scenario))
  }

  /// All assignments recorded exactly at `at` for this slot and scenario.
  pub fn exact(
    &self,
    slot: Uuid,
    scenario: &'a str,
    at: TimePoint,
  ) -> Option<&Vec<&'a Assignment>> {
    self.timeline(slot, scenario)?.get(&at)
  }

  /// The latest coordinate strictly before `at`, with its assignments.
  pub fn latest_before(
    &self,
    slot: Uuid,
    scenario: &'a str,
    at: TimePoint,
  ) -> Option<(TimePoint, &Vec<&'a Assignment>)> {
    self
      .timeline(slot, scenario)?
      .range(..at)
      .next_back()
      .map(|(tp, entries)| (*tp, entries))
  }

  /// The latest coordinate at or before `at`, with its assignments.
  ///
  /// Used for the baseline layer: baseline data already valid *at* the
  /// query's own month must be visible to a named scenario that never
  /// touched the slot.
  pub fn latest_at_or_before(
    &self,
    slot: Uuid,
    scenario: &'a str,
    at: TimePoint,
  ) -> Option<(TimePoint, &Vec<&'a Assignment>)> {
    self
      .timeline(slot, scenario)?
      .range(..=at)
      .next_back()
      .map(|(tp, entries)| (*tp, entries))
  }
}
