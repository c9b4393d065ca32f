//! Error types for `lineup-engine`.
//!
//! Two failure modes exist, and only two: a malformed query (rejected before
//! any resolution work) and a formation with no supplied slots. Absence of
//! data for a slot is a valid outcome, never an error.

use thiserror::Error;
use uuid::Uuid;

/// A query rejected before resolution begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQuery {
  #[error("month out of range: {0} (expected 1..=12)")]
  MonthOutOfRange(u8),

  #[error("year out of range: {0}")]
  YearOutOfRange(i32),

  #[error("customer id is nil")]
  NilCustomer,

  #[error("formation id is nil")]
  NilFormation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  #[error("invalid query: {0}")]
  InvalidQuery(#[from] InvalidQuery),

  /// No supplied sub-position belongs to the queried formation — a
  /// data-consistency problem in the caller, not recoverable here.
  #[error("unknown formation: no sub-positions supplied for {0}")]
  UnknownFormation(Uuid),
}

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
