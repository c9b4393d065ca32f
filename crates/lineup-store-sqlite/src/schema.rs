//! SQL schema for the Lineup SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Formations and their slots are soft-terminated (ended_at set), never
-- deleted, so historical queries keep resolving.
CREATE TABLE IF NOT EXISTS formations (
    formation_id  TEXT PRIMARY KEY,
    customer_id   TEXT NOT NULL,
    name          TEXT NOT NULL,
    display_order INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,    -- ISO 8601 UTC; server-assigned
    ended_at      TEXT              -- NULL while active
);

CREATE TABLE IF NOT EXISTS sub_positions (
    sub_position_id TEXT PRIMARY KEY,
    formation_id    TEXT NOT NULL REFERENCES formations(formation_id),
    name            TEXT NOT NULL,
    x_coord         REAL NOT NULL DEFAULT 0,   -- layout only
    y_coord         REAL NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL,
    ended_at        TEXT
);

-- One row per athlete/slot/coordinate. Re-recording at the identical
-- coordinate updates ranking in place; rows at other coordinates are never
-- rewritten.
CREATE TABLE IF NOT EXISTS assignments (
    assignment_id   TEXT PRIMARY KEY,
    athlete_id      TEXT NOT NULL,
    sub_position_id TEXT NOT NULL REFERENCES sub_positions(sub_position_id),
    customer_id     TEXT NOT NULL,
    ranking         INTEGER NOT NULL,
    scenario        TEXT NOT NULL DEFAULT '',  -- '' = baseline
    year            INTEGER NOT NULL,
    month           INTEGER NOT NULL,          -- 1..12
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    UNIQUE (athlete_id, sub_position_id, scenario, year, month)
);

CREATE TABLE IF NOT EXISTS athletes (
    athlete_id  TEXT PRIMARY KEY,
    customer_id TEXT NOT NULL,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    image_url   TEXT,
    position    TEXT
);

CREATE INDEX IF NOT EXISTS formations_customer_idx
  ON formations(customer_id);
CREATE INDEX IF NOT EXISTS sub_positions_formation_idx
  ON sub_positions(formation_id);
CREATE INDEX IF NOT EXISTS assignments_coordinate_idx
  ON assignments(sub_position_id, scenario, year, month);
CREATE INDEX IF NOT EXISTS athletes_customer_idx
  ON athletes(customer_id);

PRAGMA user_version = 1;
";
