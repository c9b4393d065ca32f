//! Error type for `lineup-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] lineup_core::Error),

  /// Surfaced by `remove_assignment`, which resolves the slot at the
  /// coordinate before writing.
  #[error("resolve error: {0}")]
  Resolve(#[from] lineup_engine::ResolveError),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// Raised inside transaction-scoped write paths, where statements run
  /// against the raw connection.
  #[error("database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("column decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
