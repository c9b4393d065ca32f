//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Scenario labels are stored verbatim (the
//! empty string is the baseline).

use chrono::{DateTime, Utc};
use lineup_core::{
  assignment::{Assignment, Scenario, TimePoint},
  athlete::Athlete,
  formation::{Formation, SubPosition},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_opt_dt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `formations` row.
pub struct RawFormation {
  pub formation_id:  String,
  pub customer_id:   String,
  pub name:          String,
  pub display_order: i64,
  pub created_at:    String,
  pub ended_at:      Option<String>,
}

impl RawFormation {
  pub fn into_formation(self) -> Result<Formation> {
    Ok(Formation {
      formation_id:  decode_uuid(&self.formation_id)?,
      customer_id:   decode_uuid(&self.customer_id)?,
      name:          self.name,
      display_order: self.display_order,
      created_at:    decode_dt(&self.created_at)?,
      ended_at:      decode_opt_dt(self.ended_at.as_deref())?,
    })
  }
}

/// Raw strings read directly from a `sub_positions` row.
pub struct RawSubPosition {
  pub sub_position_id: String,
  pub formation_id:    String,
  pub name:            String,
  pub x_coord:         f64,
  pub y_coord:         f64,
  pub created_at:      String,
  pub ended_at:        Option<String>,
}

impl RawSubPosition {
  pub fn into_sub_position(self) -> Result<SubPosition> {
    Ok(SubPosition {
      sub_position_id: decode_uuid(&self.sub_position_id)?,
      formation_id:    decode_uuid(&self.formation_id)?,
      name:            self.name,
      x_coord:         self.x_coord,
      y_coord:         self.y_coord,
      created_at:      decode_dt(&self.created_at)?,
      ended_at:        decode_opt_dt(self.ended_at.as_deref())?,
    })
  }
}

/// Raw strings read directly from an `assignments` row.
pub struct RawAssignment {
  pub assignment_id:   String,
  pub athlete_id:      String,
  pub sub_position_id: String,
  pub customer_id:     String,
  pub ranking:         i64,
  pub scenario:        String,
  pub year:            i64,
  pub month:           i64,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawAssignment {
  pub fn into_assignment(self) -> Result<Assignment> {
    let ranking = u32::try_from(self.ranking)
      .map_err(|_| Error::Decode(format!("bad ranking: {}", self.ranking)))?;
    let year = i32::try_from(self.year)
      .map_err(|_| Error::Decode(format!("bad year: {}", self.year)))?;
    let month = u8::try_from(self.month)
      .map_err(|_| Error::Decode(format!("bad month: {}", self.month)))?;

    Ok(Assignment {
      assignment_id:   decode_uuid(&self.assignment_id)?,
      athlete_id:      decode_uuid(&self.athlete_id)?,
      sub_position_id: decode_uuid(&self.sub_position_id)?,
      customer_id:     decode_uuid(&self.customer_id)?,
      ranking,
      scenario:        Scenario(self.scenario),
      at:              TimePoint::new(year, month),
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from an `athletes` row.
pub struct RawAthlete {
  pub athlete_id:  String,
  pub customer_id: String,
  pub first_name:  String,
  pub last_name:   String,
  pub image_url:   Option<String>,
  pub position:    Option<String>,
}

impl RawAthlete {
  pub fn into_athlete(self) -> Result<Athlete> {
    Ok(Athlete {
      athlete_id:  decode_uuid(&self.athlete_id)?,
      customer_id: decode_uuid(&self.customer_id)?,
      first_name:  self.first_name,
      last_name:   self.last_name,
      image_url:   self.image_url,
      position:    self.position,
    })
  }
}
