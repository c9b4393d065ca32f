//! The `RosterStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `lineup-store-sqlite`).
//! Higher layers (`lineup-api`) depend on this abstraction, not on any
//! concrete backend. The resolution engine itself never touches the store —
//! it is a pure function over a snapshot the caller reads through these
//! methods.

use std::future::Future;

use uuid::Uuid;

use crate::{
  assignment::{
    Assignment, MoveRanking, NewAssignment, RemoveAssignment, Scenario,
    TimePoint,
  },
  athlete::{Athlete, AthleteFilter, NewAthlete},
  formation::{Formation, NewFormation, NewSubPosition, SubPosition},
};

/// Abstraction over a depth-chart store backend.
///
/// Assignment history is append-only per time coordinate: recording at a new
/// coordinate adds a record, re-recording at an identical coordinate updates
/// the ranking of the existing record, and removal writes new explicit state
/// at the coordinate rather than rewriting older months.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Formations ────────────────────────────────────────────────────────

  /// Create and persist a new formation.
  fn add_formation(
    &self,
    input: NewFormation,
  ) -> impl Future<Output = Result<Formation, Self::Error>> + Send + '_;

  /// Retrieve a formation by id. Returns `None` if not found.
  fn get_formation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Formation>, Self::Error>> + Send + '_;

  /// List a customer's formations ordered by display order.
  ///
  /// Ended formations are excluded unless `include_ended` is set.
  fn list_formations(
    &self,
    customer_id: Uuid,
    include_ended: bool,
  ) -> impl Future<Output = Result<Vec<Formation>, Self::Error>> + Send + '_;

  /// Soft-terminate a formation (set `ended_at`).
  ///
  /// Returns an error if the formation does not exist or is already ended.
  fn end_formation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Formation, Self::Error>> + Send + '_;

  // ── Sub-positions ─────────────────────────────────────────────────────

  /// Create and persist a slot within a formation.
  fn add_sub_position(
    &self,
    input: NewSubPosition,
  ) -> impl Future<Output = Result<SubPosition, Self::Error>> + Send + '_;

  /// List a formation's slots, oldest first.
  fn list_sub_positions(
    &self,
    formation_id: Uuid,
    include_ended: bool,
  ) -> impl Future<Output = Result<Vec<SubPosition>, Self::Error>> + Send + '_;

  /// Soft-terminate a slot (set `ended_at`).
  fn end_sub_position(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<SubPosition, Self::Error>> + Send + '_;

  // ── Assignments ───────────────────────────────────────────────────────

  /// Record an athlete at a slot/coordinate and return the persisted record.
  ///
  /// If a record already exists for the same athlete, slot, and coordinate,
  /// its ranking is updated in place; otherwise a new record is inserted.
  /// Timestamps are set by the store.
  fn record_assignment(
    &self,
    input: NewAssignment,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  /// Vacate an athlete from a slot at a coordinate by writing new explicit
  /// state there (pinning inherited survivors), never by rewriting history.
  fn remove_assignment(
    &self,
    input: RemoveAssignment,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Move an athlete one step along the slot's depth order at a coordinate,
  /// swapping rankings with the occupant of the target rank. Moving above
  /// rank 1 is a no-op. When the slot's state at the coordinate is
  /// inherited, it is pinned explicitly first, so the move never rewrites
  /// earlier months. Returns the athlete's updated record.
  fn move_ranking(
    &self,
    input: MoveRanking,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  /// The full assignment history for a formation — every scenario, year, and
  /// month. This is the snapshot the resolution engine consumes.
  fn assignment_history(
    &self,
    formation_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  // ── Athletes ──────────────────────────────────────────────────────────

  /// Persist an athlete display record.
  fn add_athlete(
    &self,
    input: NewAthlete,
  ) -> impl Future<Output = Result<Athlete, Self::Error>> + Send + '_;

  /// List a customer's athletes, optionally filtered by name search and
  /// position.
  fn list_athletes<'a>(
    &'a self,
    customer_id: Uuid,
    filter: &'a AthleteFilter,
  ) -> impl Future<Output = Result<Vec<Athlete>, Self::Error>> + Send + 'a;

  /// Fetch specific athletes for the display join. Unknown ids are skipped.
  fn athletes_by_ids<'a>(
    &'a self,
    customer_id: Uuid,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Athlete>, Self::Error>> + Send + 'a;

  /// The athlete's explicit assignment at the exact coordinate, if any —
  /// a pre-flight check before offering an athlete for assignment. Exact
  /// coordinate only; inherited presence does not count.
  fn athlete_assignment(
    &self,
    customer_id: Uuid,
    athlete_id: Uuid,
    scenario: Scenario,
    at: TimePoint,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;
}
