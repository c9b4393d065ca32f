//! Error types for `lineup-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::assignment::TimePoint;

#[derive(Debug, Error)]
pub enum Error {
  #[error("formation not found: {0}")]
  FormationNotFound(Uuid),

  #[error("sub-position not found: {0}")]
  SubPositionNotFound(Uuid),

  #[error("athlete not found: {0}")]
  AthleteNotFound(Uuid),

  #[error("no assignment for athlete {athlete_id} at {at}")]
  AssignmentNotFound { athlete_id: Uuid, at: TimePoint },

  #[error("{0} is already ended")]
  AlreadyEnded(Uuid),

  #[error("month out of range: {0} (expected 1..=12)")]
  MonthOutOfRange(u8),

  #[error("year out of range: {0}")]
  YearOutOfRange(i32),

  #[error("ranking must be positive")]
  RankingNotPositive,

  #[error(
    "customer {given} does not own sub-position {sub_position_id} \
     (owned by {owner})"
  )]
  CustomerMismatch {
    given:           Uuid,
    owner:           Uuid,
    sub_position_id: Uuid,
  },

  /// Removing the only effective athlete when that athlete is inherited:
  /// there is no explicit record to delete and no survivor to pin, so the
  /// slot would silently resurrect the athlete from history.
  #[error(
    "cannot vacate slot {sub_position_id} at {at}: athlete {athlete_id} is \
     inherited and no explicit state would remain"
  )]
  CannotVacate {
    athlete_id:      Uuid,
    sub_position_id: Uuid,
    at:              TimePoint,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
