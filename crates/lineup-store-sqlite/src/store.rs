//! [`SqliteStore`] — the SQLite implementation of [`RosterStore`].

use std::path::Path;

use chrono::Utc;
use lineup_engine::ChartQuery;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use lineup_core::{
  assignment::{
    Assignment, MoveDirection, MoveRanking, NewAssignment, RemoveAssignment,
    Scenario, TimePoint,
  },
  athlete::{Athlete, AthleteFilter, NewAthlete},
  formation::{Formation, NewFormation, NewSubPosition, SubPosition},
  store::RosterStore,
};

use crate::{
  Error, Result,
  encode::{
    RawAssignment, RawAthlete, RawFormation, RawSubPosition, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

const FORMATION_COLS: &str =
  "formation_id, customer_id, name, display_order, created_at, ended_at";
const SUB_POSITION_COLS: &str =
  "sub_position_id, formation_id, name, x_coord, y_coord, created_at, \
   ended_at";
const ASSIGNMENT_COLS: &str =
  "assignment_id, athlete_id, sub_position_id, customer_id, ranking, \
   scenario, year, month, created_at, updated_at";
const ATHLETE_COLS: &str =
  "athlete_id, customer_id, first_name, last_name, image_url, position";

fn formation_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFormation> {
  Ok(RawFormation {
    formation_id:  row.get(0)?,
    customer_id:   row.get(1)?,
    name:          row.get(2)?,
    display_order: row.get(3)?,
    created_at:    row.get(4)?,
    ended_at:      row.get(5)?,
  })
}

fn sub_position_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawSubPosition> {
  Ok(RawSubPosition {
    sub_position_id: row.get(0)?,
    formation_id:    row.get(1)?,
    name:            row.get(2)?,
    x_coord:         row.get(3)?,
    y_coord:         row.get(4)?,
    created_at:      row.get(5)?,
    ended_at:        row.get(6)?,
  })
}

fn assignment_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawAssignment> {
  Ok(RawAssignment {
    assignment_id:   row.get(0)?,
    athlete_id:      row.get(1)?,
    sub_position_id: row.get(2)?,
    customer_id:     row.get(3)?,
    ranking:         row.get(4)?,
    scenario:        row.get(5)?,
    year:            row.get(6)?,
    month:           row.get(7)?,
    created_at:      row.get(8)?,
    updated_at:      row.get(9)?,
  })
}

fn athlete_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAthlete> {
  Ok(RawAthlete {
    athlete_id:  row.get(0)?,
    customer_id: row.get(1)?,
    first_name:  row.get(2)?,
    last_name:   row.get(3)?,
    image_url:   row.get(4)?,
    position:    row.get(5)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Lineup roster store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_formation(&self, id: Uuid) -> Result<Option<Formation>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawFormation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {FORMATION_COLS} FROM formations \
                 WHERE formation_id = ?1"
              ),
              rusqlite::params![id_str],
              formation_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawFormation::into_formation).transpose()
  }

  async fn fetch_sub_position(&self, id: Uuid) -> Result<Option<SubPosition>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawSubPosition> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SUB_POSITION_COLS} FROM sub_positions \
                 WHERE sub_position_id = ?1"
              ),
              rusqlite::params![id_str],
              sub_position_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawSubPosition::into_sub_position).transpose()
  }

  async fn fetch_assignment(&self, id: Uuid) -> Result<Option<Assignment>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawAssignment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ASSIGNMENT_COLS} FROM assignments \
                 WHERE assignment_id = ?1"
              ),
              rusqlite::params![id_str],
              assignment_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawAssignment::into_assignment).transpose()
  }

  /// Check that the slot exists and is owned by `customer_id`; returns the
  /// slot on success.
  async fn owned_sub_position(
    &self,
    sub_position_id: Uuid,
    customer_id: Uuid,
  ) -> Result<SubPosition> {
    let sp = self
      .fetch_sub_position(sub_position_id)
      .await?
      .ok_or(lineup_core::Error::SubPositionNotFound(sub_position_id))?;
    let formation = self
      .fetch_formation(sp.formation_id)
      .await?
      .ok_or(lineup_core::Error::FormationNotFound(sp.formation_id))?;
    if formation.customer_id != customer_id {
      return Err(
        lineup_core::Error::CustomerMismatch {
          given: customer_id,
          owner: formation.customer_id,
          sub_position_id,
        }
        .into(),
      );
    }
    Ok(sp)
  }

}

// ─── Transaction-scoped write path ───────────────────────────────────────────
//
// `remove_assignment` and `move_ranking` must observe and write one
// consistent snapshot: the resolve, the pinning, and the final write all run
// inside a single transaction on the connection thread, so two concurrent
// writers serialise instead of reading the same state.

/// Fetch the slot and verify the formation's owner inside the transaction.
fn owned_slot_in_tx(
  tx: &rusqlite::Transaction<'_>,
  sub_position_id: Uuid,
  customer_id: Uuid,
) -> Result<SubPosition> {
  let slot_str = encode_uuid(sub_position_id);
  let raw: Option<RawSubPosition> = tx
    .query_row(
      &format!(
        "SELECT {SUB_POSITION_COLS} FROM sub_positions \
         WHERE sub_position_id = ?1"
      ),
      rusqlite::params![slot_str],
      sub_position_from_row,
    )
    .optional()?;
  let sp = raw
    .map(RawSubPosition::into_sub_position)
    .transpose()?
    .ok_or(lineup_core::Error::SubPositionNotFound(sub_position_id))?;

  let formation_str = encode_uuid(sp.formation_id);
  let raw: Option<RawFormation> = tx
    .query_row(
      &format!(
        "SELECT {FORMATION_COLS} FROM formations WHERE formation_id = ?1"
      ),
      rusqlite::params![formation_str],
      formation_from_row,
    )
    .optional()?;
  let formation = raw
    .map(RawFormation::into_formation)
    .transpose()?
    .ok_or(lineup_core::Error::FormationNotFound(sp.formation_id))?;

  if formation.customer_id != customer_id {
    return Err(
      lineup_core::Error::CustomerMismatch {
        given: customer_id,
        owner: formation.customer_id,
        sub_position_id,
      }
      .into(),
    );
  }
  Ok(sp)
}

/// The formation's full assignment history, read inside the transaction.
fn history_in_tx(
  tx: &rusqlite::Transaction<'_>,
  formation_id: Uuid,
) -> Result<Vec<Assignment>> {
  let formation_str = encode_uuid(formation_id);
  let mut stmt = tx.prepare(
    "SELECT
       a.assignment_id, a.athlete_id, a.sub_position_id, a.customer_id,
       a.ranking, a.scenario, a.year, a.month, a.created_at, a.updated_at
     FROM assignments a
     JOIN sub_positions sp ON sp.sub_position_id = a.sub_position_id
     WHERE sp.formation_id = ?1
     ORDER BY a.year, a.month, a.created_at",
  )?;
  let raws = stmt
    .query_map(rusqlite::params![formation_str], assignment_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws
    .into_iter()
    .map(RawAssignment::into_assignment)
    .collect()
}

/// Upsert one athlete's record at the coordinate (the pinning write);
/// returns the row's assignment id.
fn pin_in_tx(
  tx: &rusqlite::Transaction<'_>,
  athlete_id: Uuid,
  ranking: u32,
  customer_id: Uuid,
  sub_position_id: Uuid,
  scenario: &Scenario,
  at: TimePoint,
) -> Result<String> {
  let athlete_str = encode_uuid(athlete_id);
  let slot_str = encode_uuid(sub_position_id);
  let (year, month) = (at.year, i64::from(at.month));
  let now_str = encode_dt(Utc::now());

  let existing: Option<String> = tx
    .query_row(
      "SELECT assignment_id FROM assignments
       WHERE athlete_id = ?1 AND sub_position_id = ?2
         AND scenario = ?3 AND year = ?4 AND month = ?5",
      rusqlite::params![athlete_str, slot_str, scenario.as_str(), year, month],
      |row| row.get(0),
    )
    .optional()?;

  if let Some(id_str) = existing {
    tx.execute(
      "UPDATE assignments SET ranking = ?2, updated_at = ?3
       WHERE assignment_id = ?1",
      rusqlite::params![id_str, i64::from(ranking), now_str],
    )?;
    return Ok(id_str);
  }

  let id_str = encode_uuid(Uuid::new_v4());
  tx.execute(
    "INSERT INTO assignments
       (assignment_id, athlete_id, sub_position_id, customer_id,
        ranking, scenario, year, month, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    rusqlite::params![
      id_str,
      athlete_str,
      slot_str,
      encode_uuid(customer_id),
      i64::from(ranking),
      scenario.as_str(),
      year,
      month,
      now_str,
      now_str,
    ],
  )?;
  Ok(id_str)
}

/// Resolve the slot at the coordinate and write the removal as new explicit
/// state: pin inherited survivors, delete the target's exact record.
fn remove_in_tx(
  tx: &rusqlite::Transaction<'_>,
  input: &RemoveAssignment,
) -> Result<()> {
  let sp = owned_slot_in_tx(tx, input.sub_position_id, input.customer_id)?;
  let history = history_in_tx(tx, sp.formation_id)?;
  let query = ChartQuery {
    customer_id:  input.customer_id,
    formation_id: sp.formation_id,
    scenario:     input.scenario.clone(),
    at:           input.at,
  };
  let effective =
    lineup_engine::resolve(&query, std::slice::from_ref(&sp), &history)?;

  let (target, survivors): (Vec<_>, Vec<_>) = effective
    .into_iter()
    .partition(|e| e.assignment.athlete_id == input.athlete_id);
  let Some(target) = target.into_iter().next() else {
    return Err(
      lineup_core::Error::AssignmentNotFound {
        athlete_id: input.athlete_id,
        at:         input.at,
      }
      .into(),
    );
  };

  if target.is_inherited && survivors.is_empty() {
    // Nothing explicit to delete and nothing to pin: the slot would
    // resurrect the athlete from history on the next read.
    return Err(
      lineup_core::Error::CannotVacate {
        athlete_id:      input.athlete_id,
        sub_position_id: input.sub_position_id,
        at:              input.at,
      }
      .into(),
    );
  }

  // Pin inherited survivors as explicit records at the coordinate so the
  // new state shadows older months.
  for s in survivors.iter().filter(|s| s.is_inherited) {
    pin_in_tx(
      tx,
      s.assignment.athlete_id,
      s.assignment.ranking,
      input.customer_id,
      input.sub_position_id,
      &input.scenario,
      input.at,
    )?;
  }

  if !target.is_inherited {
    tx.execute(
      "DELETE FROM assignments
       WHERE athlete_id = ?1 AND sub_position_id = ?2
         AND scenario = ?3 AND year = ?4 AND month = ?5",
      rusqlite::params![
        encode_uuid(input.athlete_id),
        encode_uuid(input.sub_position_id),
        input.scenario.as_str(),
        input.at.year,
        i64::from(input.at.month),
      ],
    )?;
  }
  Ok(())
}

/// Nudge the athlete one rank, swapping with the occupant of the target
/// rank. Inherited state is pinned explicitly first so the swap lands at
/// the coordinate rather than rewriting earlier months.
fn move_in_tx(
  tx: &rusqlite::Transaction<'_>,
  input: &MoveRanking,
) -> Result<Assignment> {
  let sp = owned_slot_in_tx(tx, input.sub_position_id, input.customer_id)?;
  let history = history_in_tx(tx, sp.formation_id)?;
  let query = ChartQuery {
    customer_id:  input.customer_id,
    formation_id: sp.formation_id,
    scenario:     input.scenario.clone(),
    at:           input.at,
  };
  let effective =
    lineup_engine::resolve(&query, std::slice::from_ref(&sp), &history)?;

  let Some(target) = effective
    .iter()
    .find(|e| e.assignment.athlete_id == input.athlete_id)
  else {
    return Err(
      lineup_core::Error::AssignmentNotFound {
        athlete_id: input.athlete_id,
        at:         input.at,
      }
      .into(),
    );
  };

  let current = target.assignment.ranking;
  let new_ranking = match input.direction {
    MoveDirection::Up => current - 1,
    MoveDirection::Down => current + 1,
  };
  if new_ranking == 0 {
    // Already at the top; nothing to write.
    return Ok(target.assignment.clone());
  }

  // Make every entry explicit at the coordinate before touching rankings.
  // A slot resolves from a single source layer, so inheritance is uniform
  // across entries.
  let mut row_ids: Vec<(Uuid, u32, String)> = Vec::new();
  for e in &effective {
    let id_str = if target.is_inherited {
      pin_in_tx(
        tx,
        e.assignment.athlete_id,
        e.assignment.ranking,
        input.customer_id,
        input.sub_position_id,
        &input.scenario,
        input.at,
      )?
    } else {
      encode_uuid(e.assignment.assignment_id)
    };
    row_ids.push((e.assignment.athlete_id, e.assignment.ranking, id_str));
  }

  let now_str = encode_dt(Utc::now());

  // Swap with the first occupant of the target rank in depth order, if any.
  if let Some((_, _, occupant_id)) = row_ids
    .iter()
    .find(|(id, r, _)| *r == new_ranking && *id != input.athlete_id)
  {
    tx.execute(
      "UPDATE assignments SET ranking = ?2, updated_at = ?3
       WHERE assignment_id = ?1",
      rusqlite::params![occupant_id, i64::from(current), now_str],
    )?;
  }

  let (_, _, target_id) = row_ids
    .iter()
    .find(|(id, _, _)| *id == input.athlete_id)
    .ok_or(lineup_core::Error::AssignmentNotFound {
      athlete_id: input.athlete_id,
      at:         input.at,
    })?;
  tx.execute(
    "UPDATE assignments SET ranking = ?2, updated_at = ?3
     WHERE assignment_id = ?1",
    rusqlite::params![target_id, i64::from(new_ranking), now_str],
  )?;

  let raw = tx.query_row(
    &format!(
      "SELECT {ASSIGNMENT_COLS} FROM assignments WHERE assignment_id = ?1"
    ),
    rusqlite::params![target_id],
    assignment_from_row,
  )?;
  raw.into_assignment()
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = Error;

  // ── Formations ────────────────────────────────────────────────────────────

  async fn add_formation(&self, input: NewFormation) -> Result<Formation> {
    let formation = Formation {
      formation_id:  Uuid::new_v4(),
      customer_id:   input.customer_id,
      name:          input.name,
      display_order: input.display_order,
      created_at:    Utc::now(),
      ended_at:      None,
    };

    let id_str       = encode_uuid(formation.formation_id);
    let customer_str = encode_uuid(formation.customer_id);
    let name         = formation.name.clone();
    let order        = formation.display_order;
    let at_str       = encode_dt(formation.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO formations
             (formation_id, customer_id, name, display_order, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, customer_str, name, order, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(formation)
  }

  async fn get_formation(&self, id: Uuid) -> Result<Option<Formation>> {
    self.fetch_formation(id).await
  }

  async fn list_formations(
    &self,
    customer_id: Uuid,
    include_ended: bool,
  ) -> Result<Vec<Formation>> {
    let customer_str = encode_uuid(customer_id);

    let raws: Vec<RawFormation> = self
      .conn
      .call(move |conn| {
        let ended_clause =
          if include_ended { "" } else { "AND ended_at IS NULL" };
        let mut stmt = conn.prepare(&format!(
          "SELECT {FORMATION_COLS} FROM formations \
           WHERE customer_id = ?1 {ended_clause} \
           ORDER BY display_order, created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![customer_str], formation_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFormation::into_formation).collect()
  }

  async fn end_formation(&self, id: Uuid) -> Result<Formation> {
    let mut formation = self
      .fetch_formation(id)
      .await?
      .ok_or(lineup_core::Error::FormationNotFound(id))?;
    if formation.ended_at.is_some() {
      return Err(lineup_core::Error::AlreadyEnded(id).into());
    }

    formation.ended_at = Some(Utc::now());
    let id_str = encode_uuid(id);
    let at_str = formation.ended_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE formations SET ended_at = ?2 WHERE formation_id = ?1",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(formation)
  }

  // ── Sub-positions ─────────────────────────────────────────────────────────

  async fn add_sub_position(
    &self,
    input: NewSubPosition,
  ) -> Result<SubPosition> {
    self
      .fetch_formation(input.formation_id)
      .await?
      .ok_or(lineup_core::Error::FormationNotFound(input.formation_id))?;

    let sp = SubPosition {
      sub_position_id: Uuid::new_v4(),
      formation_id:    input.formation_id,
      name:            input.name,
      x_coord:         input.x_coord,
      y_coord:         input.y_coord,
      created_at:      Utc::now(),
      ended_at:        None,
    };

    let id_str        = encode_uuid(sp.sub_position_id);
    let formation_str = encode_uuid(sp.formation_id);
    let name          = sp.name.clone();
    let (x, y)        = (sp.x_coord, sp.y_coord);
    let at_str        = encode_dt(sp.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sub_positions
             (sub_position_id, formation_id, name, x_coord, y_coord,
              created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, formation_str, name, x, y, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(sp)
  }

  async fn list_sub_positions(
    &self,
    formation_id: Uuid,
    include_ended: bool,
  ) -> Result<Vec<SubPosition>> {
    let formation_str = encode_uuid(formation_id);

    let raws: Vec<RawSubPosition> = self
      .conn
      .call(move |conn| {
        let ended_clause =
          if include_ended { "" } else { "AND ended_at IS NULL" };
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUB_POSITION_COLS} FROM sub_positions \
           WHERE formation_id = ?1 {ended_clause} \
           ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![formation_str], sub_position_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawSubPosition::into_sub_position)
      .collect()
  }

  async fn end_sub_position(&self, id: Uuid) -> Result<SubPosition> {
    let mut sp = self
      .fetch_sub_position(id)
      .await?
      .ok_or(lineup_core::Error::SubPositionNotFound(id))?;
    if sp.ended_at.is_some() {
      return Err(lineup_core::Error::AlreadyEnded(id).into());
    }

    sp.ended_at = Some(Utc::now());
    let id_str = encode_uuid(id);
    let at_str = sp.ended_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE sub_positions SET ended_at = ?2 WHERE sub_position_id = ?1",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(sp)
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  async fn record_assignment(
    &self,
    input: NewAssignment,
  ) -> Result<Assignment> {
    if !input.at.month_in_range() {
      return Err(lineup_core::Error::MonthOutOfRange(input.at.month).into());
    }
    if !input.at.year_in_range() {
      return Err(lineup_core::Error::YearOutOfRange(input.at.year).into());
    }
    if input.ranking == 0 {
      return Err(lineup_core::Error::RankingNotPositive.into());
    }
    self
      .owned_sub_position(input.sub_position_id, input.customer_id)
      .await?;

    // One record per athlete/slot/coordinate: re-recording updates the
    // ranking in place, history at other coordinates is untouched.
    let athlete_str  = encode_uuid(input.athlete_id);
    let slot_str     = encode_uuid(input.sub_position_id);
    let scenario     = input.scenario.as_str().to_owned();
    let (year, month) = (input.at.year, i64::from(input.at.month));

    let existing: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT assignment_id FROM assignments
               WHERE athlete_id = ?1 AND sub_position_id = ?2
                 AND scenario = ?3 AND year = ?4 AND month = ?5",
              rusqlite::params![athlete_str, slot_str, scenario, year, month],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    if let Some(id_str) = existing {
      let id = Uuid::parse_str(&id_str)?;
      let ranking = i64::from(input.ranking);
      let updated_str = encode_dt(Utc::now());

      self
        .conn
        .call(move |conn| {
          conn.execute(
            "UPDATE assignments SET ranking = ?2, updated_at = ?3
             WHERE assignment_id = ?1",
            rusqlite::params![id_str, ranking, updated_str],
          )?;
          Ok(())
        })
        .await?;

      return self
        .fetch_assignment(id)
        .await?
        .ok_or_else(|| Error::Decode(format!("assignment {id} vanished")));
    }

    let now = Utc::now();
    let assignment = Assignment {
      assignment_id:   Uuid::new_v4(),
      athlete_id:      input.athlete_id,
      sub_position_id: input.sub_position_id,
      customer_id:     input.customer_id,
      ranking:         input.ranking,
      scenario:        input.scenario,
      at:              input.at,
      created_at:      now,
      updated_at:      now,
    };

    let id_str       = encode_uuid(assignment.assignment_id);
    let athlete_str  = encode_uuid(assignment.athlete_id);
    let slot_str     = encode_uuid(assignment.sub_position_id);
    let customer_str = encode_uuid(assignment.customer_id);
    let ranking      = i64::from(assignment.ranking);
    let scenario     = assignment.scenario.as_str().to_owned();
    let (year, month) =
      (assignment.at.year, i64::from(assignment.at.month));
    let created_str  = encode_dt(assignment.created_at);
    let updated_str  = encode_dt(assignment.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO assignments
             (assignment_id, athlete_id, sub_position_id, customer_id,
              ranking, scenario, year, month, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            athlete_str,
            slot_str,
            customer_str,
            ranking,
            scenario,
            year,
            month,
            created_str,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(assignment)
  }

  async fn remove_assignment(&self, input: RemoveAssignment) -> Result<()> {
    if !input.at.month_in_range() {
      return Err(lineup_core::Error::MonthOutOfRange(input.at.month).into());
    }
    if !input.at.year_in_range() {
      return Err(lineup_core::Error::YearOutOfRange(input.at.year).into());
    }

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match remove_in_tx(&tx, &input) {
          Ok(()) => {
            tx.commit()?;
            Ok(Ok(()))
          }
          // Dropping the transaction rolls back any pinning writes.
          Err(e) => Ok(Err(e)),
        }
      })
      .await??;
    Ok(())
  }

  async fn move_ranking(&self, input: MoveRanking) -> Result<Assignment> {
    if !input.at.month_in_range() {
      return Err(lineup_core::Error::MonthOutOfRange(input.at.month).into());
    }
    if !input.at.year_in_range() {
      return Err(lineup_core::Error::YearOutOfRange(input.at.year).into());
    }

    let assignment = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match move_in_tx(&tx, &input) {
          Ok(a) => {
            tx.commit()?;
            Ok(Ok(a))
          }
          Err(e) => Ok(Err(e)),
        }
      })
      .await??;
    Ok(assignment)
  }

  async fn assignment_history(
    &self,
    formation_id: Uuid,
  ) -> Result<Vec<Assignment>> {
    let formation_str = encode_uuid(formation_id);

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             a.assignment_id, a.athlete_id, a.sub_position_id, a.customer_id,
             a.ranking, a.scenario, a.year, a.month, a.created_at,
             a.updated_at
           FROM assignments a
           JOIN sub_positions sp ON sp.sub_position_id = a.sub_position_id
           WHERE sp.formation_id = ?1
           ORDER BY a.year, a.month, a.created_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![formation_str], assignment_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawAssignment::into_assignment)
      .collect()
  }

  // ── Athletes ──────────────────────────────────────────────────────────────

  async fn add_athlete(&self, input: NewAthlete) -> Result<Athlete> {
    let athlete = Athlete {
      athlete_id:  Uuid::new_v4(),
      customer_id: input.customer_id,
      first_name:  input.first_name,
      last_name:   input.last_name,
      image_url:   input.image_url,
      position:    input.position,
    };

    let id_str       = encode_uuid(athlete.athlete_id);
    let customer_str = encode_uuid(athlete.customer_id);
    let first        = athlete.first_name.clone();
    let last         = athlete.last_name.clone();
    let image        = athlete.image_url.clone();
    let position     = athlete.position.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO athletes
             (athlete_id, customer_id, first_name, last_name, image_url,
              position)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, customer_str, first, last, image, position],
        )?;
        Ok(())
      })
      .await?;

    Ok(athlete)
  }

  async fn list_athletes(
    &self,
    customer_id: Uuid,
    filter: &AthleteFilter,
  ) -> Result<Vec<Athlete>> {
    let customer_str = encode_uuid(customer_id);
    let search   = filter.search.clone();
    let position = filter.position.clone();

    let raws: Vec<RawAthlete> = self
      .conn
      .call(move |conn| {
        // LIKE is case-insensitive for ASCII in SQLite.
        let mut stmt = conn.prepare(&format!(
          "SELECT {ATHLETE_COLS} FROM athletes
           WHERE customer_id = ?1
             AND (?2 IS NULL
                  OR first_name LIKE '%' || ?2 || '%'
                  OR last_name  LIKE '%' || ?2 || '%')
             AND (?3 IS NULL OR position LIKE '%' || ?3 || '%')
           ORDER BY last_name, first_name"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![customer_str, search, position],
            athlete_from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAthlete::into_athlete).collect()
  }

  async fn athletes_by_ids(
    &self,
    customer_id: Uuid,
    ids: &[Uuid],
  ) -> Result<Vec<Athlete>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let customer_str = encode_uuid(customer_id);
    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();

    let raws: Vec<RawAthlete> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; id_strs.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
          "SELECT {ATHLETE_COLS} FROM athletes
           WHERE customer_id = ? AND athlete_id IN ({placeholders})"
        ))?;
        let params = std::iter::once(customer_str).chain(id_strs);
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), athlete_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAthlete::into_athlete).collect()
  }

  async fn athlete_assignment(
    &self,
    customer_id: Uuid,
    athlete_id: Uuid,
    scenario: Scenario,
    at: TimePoint,
  ) -> Result<Option<Assignment>> {
    let customer_str = encode_uuid(customer_id);
    let athlete_str = encode_uuid(athlete_id);
    let scenario = scenario.as_str().to_owned();
    let (year, month) = (at.year, i64::from(at.month));

    let raw: Option<RawAssignment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ASSIGNMENT_COLS} FROM assignments \
                 WHERE customer_id = ?1 AND athlete_id = ?2 \
                   AND scenario = ?3 AND year = ?4 AND month = ?5 \
                 ORDER BY created_at, assignment_id LIMIT 1"
              ),
              rusqlite::params![
                customer_str,
                athlete_str,
                scenario,
                year,
                month
              ],
              assignment_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawAssignment::into_assignment).transpose()
  }
}
