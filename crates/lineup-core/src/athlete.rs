//! Athlete display records.
//!
//! Athletes are managed elsewhere in the surrounding application; the
//! depth-chart service only keeps the display fields needed to join resolved
//! assignments for presentation. The engine treats them as opaque
//! passthrough data.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Denormalised athlete display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
  pub athlete_id:  Uuid,
  pub customer_id: Uuid,
  pub first_name:  String,
  pub last_name:   String,
  pub image_url:   Option<String>,
  pub position:    Option<String>,
}

/// Input to [`crate::store::RosterStore::add_athlete`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAthlete {
  pub customer_id: Uuid,
  pub first_name:  String,
  pub last_name:   String,
  pub image_url:   Option<String>,
  pub position:    Option<String>,
}

/// Filter for [`crate::store::RosterStore::list_athletes`].
#[derive(Debug, Clone, Default)]
pub struct AthleteFilter {
  /// Case-insensitive substring match against first or last name.
  pub search:   Option<String>,
  /// Case-insensitive substring match against the position field.
  pub position: Option<String>,
}
