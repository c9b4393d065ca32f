//! Assignment types — the fundamental unit of the depth-chart history.
//!
//! An assignment is an immutable record that an athlete occupied a slot at a
//! `(scenario, year, month)` coordinate. History is sparse and append-only:
//! a roster change at a later coordinate supersedes earlier records at read
//! time, it never rewrites them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Time coordinate ─────────────────────────────────────────────────────────

/// Years accepted on both the read and write paths. Wide enough for any real
/// roster, tight enough to catch zero/negative years from mangled input.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=9999;

/// A point on the roster timeline. `(year, month)` orders lexicographically
/// as a single timeline — the derived `Ord` relies on the field order here.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
pub struct TimePoint {
  pub year:  i32,
  /// Calendar month, 1–12.
  pub month: u8,
}

impl TimePoint {
  pub fn new(year: i32, month: u8) -> Self { Self { year, month } }

  /// Whether the month component is a real calendar month.
  pub fn month_in_range(&self) -> bool { (1..=12).contains(&self.month) }

  /// Whether the year component falls inside [`YEAR_RANGE`].
  pub fn year_in_range(&self) -> bool { YEAR_RANGE.contains(&self.year) }
}

impl std::fmt::Display for TimePoint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:04}-{:02}", self.year, self.month)
  }
}

// ─── Scenario ────────────────────────────────────────────────────────────────

/// A named alternate timeline branch overlaying the baseline.
///
/// The empty label denotes the baseline itself. Named scenarios are
/// copy-on-write: they read as "the baseline, except where explicitly
/// overridden".
#[derive(
  Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct Scenario(pub String);

impl Scenario {
  /// The baseline (empty-label) scenario.
  pub fn baseline() -> Self { Self(String::new()) }

  pub fn named(label: impl Into<String>) -> Self { Self(label.into()) }

  pub fn is_baseline(&self) -> bool { self.0.is_empty() }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for Scenario {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if self.is_baseline() {
      f.write_str("<baseline>")
    } else {
      f.write_str(&self.0)
    }
  }
}

// ─── Assignment ──────────────────────────────────────────────────────────────

/// An athlete occupying a slot at one time coordinate.
///
/// Immutable once recorded, with one carve-out: re-recording the same athlete
/// at the identical coordinate updates `ranking` in place. History at any
/// other coordinate is never touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
  pub assignment_id:   Uuid,
  pub athlete_id:      Uuid,
  pub sub_position_id: Uuid,
  pub customer_id:     Uuid,
  /// Depth order within the slot; 1 is the top. Uniqueness is not enforced —
  /// ties are broken deterministically at read time.
  pub ranking:         u32,
  pub scenario:        Scenario,
  #[serde(flatten)]
  pub at:              TimePoint,
  /// Server-assigned; never changes after creation.
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

// ─── NewAssignment ───────────────────────────────────────────────────────────

/// Input to [`crate::store::RosterStore::record_assignment`].
/// Timestamps are always set by the store; they are not accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignment {
  pub athlete_id:      Uuid,
  pub sub_position_id: Uuid,
  pub customer_id:     Uuid,
  pub ranking:         u32,
  #[serde(default)]
  pub scenario:        Scenario,
  #[serde(flatten)]
  pub at:              TimePoint,
}

// ─── MoveRanking ─────────────────────────────────────────────────────────────

/// One step along the depth order within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
  /// Toward ranking 1.
  Up,
  Down,
}

/// Input to [`crate::store::RosterStore::move_ranking`] — nudge an athlete
/// one step up or down the slot's depth order, swapping rankings with the
/// occupant of the target rank if there is one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRanking {
  pub athlete_id:      Uuid,
  pub sub_position_id: Uuid,
  pub customer_id:     Uuid,
  #[serde(default)]
  pub scenario:        Scenario,
  #[serde(flatten)]
  pub at:              TimePoint,
  pub direction:       MoveDirection,
}

// ─── RemoveAssignment ────────────────────────────────────────────────────────

/// Input to [`crate::store::RosterStore::remove_assignment`] — identifies the
/// athlete/slot/coordinate to vacate. Removal is recorded as new explicit
/// state at the coordinate, not as a rewrite of history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveAssignment {
  pub athlete_id:      Uuid,
  pub sub_position_id: Uuid,
  pub customer_id:     Uuid,
  #[serde(default)]
  pub scenario:        Scenario,
  #[serde(flatten)]
  pub at:              TimePoint,
}
