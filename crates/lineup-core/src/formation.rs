//! Formation and sub-position types.
//!
//! Both carry a validity window `[created_at, ended_at)` and are
//! soft-terminated rather than deleted, so historical queries keep resolving
//! against the slots that existed at the time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Formation ───────────────────────────────────────────────────────────────

/// A named arrangement of roster slots (e.g. a defensive scheme).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
  pub formation_id:  Uuid,
  pub customer_id:   Uuid,
  pub name:          String,
  /// Position in customer-facing listings; not related to depth order.
  pub display_order: i64,
  pub created_at:    DateTime<Utc>,
  /// `None` while the formation is active.
  pub ended_at:      Option<DateTime<Utc>>,
}

impl Formation {
  pub fn is_active(&self) -> bool { self.ended_at.is_none() }
}

/// Input to [`crate::store::RosterStore::add_formation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFormation {
  pub customer_id:   Uuid,
  pub name:          String,
  #[serde(default)]
  pub display_order: i64,
}

// ─── SubPosition ─────────────────────────────────────────────────────────────

/// One slot within a formation that can hold one or more ranked athletes.
///
/// The layout coordinates exist for visualisation only and are opaque to
/// resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubPosition {
  pub sub_position_id: Uuid,
  pub formation_id:    Uuid,
  pub name:            String,
  pub x_coord:         f64,
  pub y_coord:         f64,
  pub created_at:      DateTime<Utc>,
  pub ended_at:        Option<DateTime<Utc>>,
}

impl SubPosition {
  pub fn is_active(&self) -> bool { self.ended_at.is_none() }
}

/// Input to [`crate::store::RosterStore::add_sub_position`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubPosition {
  pub formation_id: Uuid,
  pub name:         String,
  #[serde(default)]
  pub x_coord:      f64,
  #[serde(default)]
  pub y_coord:      f64,
}
