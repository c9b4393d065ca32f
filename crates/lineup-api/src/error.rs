//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store error by walking its source chain for domain errors
  /// worth a 4xx; anything else is a 500.
  pub fn from_store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let mut cur: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(e) = cur {
      if let Some(core) = e.downcast_ref::<lineup_core::Error>() {
        use lineup_core::Error as Core;
        return match core {
          Core::FormationNotFound(_)
          | Core::SubPositionNotFound(_)
          | Core::AthleteNotFound(_)
          | Core::AssignmentNotFound { .. } => Self::NotFound(core.to_string()),
          Core::MonthOutOfRange(_)
          | Core::YearOutOfRange(_)
          | Core::RankingNotPositive => Self::BadRequest(core.to_string()),
          Core::AlreadyEnded(_)
          | Core::CustomerMismatch { .. }
          | Core::CannotVacate { .. } => Self::Conflict(core.to_string()),
        };
      }
      if let Some(resolve) = e.downcast_ref::<lineup_engine::ResolveError>() {
        return Self::from(resolve.clone());
      }
      cur = e.source();
    }
    Self::Store(Box::new(err))
  }
}

impl From<lineup_engine::ResolveError> for ApiError {
  fn from(err: lineup_engine::ResolveError) -> Self {
    use lineup_engine::ResolveError;
    match err {
      ResolveError::InvalidQuery(_) => Self::BadRequest(err.to_string()),
      ResolveError::UnknownFormation(_) => Self::NotFound(err.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
