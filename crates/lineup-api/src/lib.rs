//! JSON REST API for the lineup depth-chart service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`lineup_core::store::RosterStore`]. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lineup_api::api_router(store.clone()))
//! ```

pub mod assignments;
pub mod athletes;
pub mod chart;
pub mod error;
pub mod formations;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use lineup_core::store::RosterStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Server configuration, deserialised from `config.toml` and the `LINEUP_*`
/// environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RosterStore + 'static,
{
  Router::new()
    // Formations
    .route(
      "/formations",
      get(formations::list::<S>).post(formations::create::<S>),
    )
    .route("/formations/{id}", get(formations::get_one::<S>))
    .route("/formations/{id}/end", post(formations::end_one::<S>))
    .route(
      "/formations/{id}/sub-positions",
      get(formations::list_slots::<S>).post(formations::create_slot::<S>),
    )
    .route("/sub-positions/{id}/end", post(formations::end_slot::<S>))
    // Assignments
    .route("/assignments", post(assignments::record::<S>))
    .route("/assignments/remove", post(assignments::remove::<S>))
    .route("/assignments/move", post(assignments::move_ranking::<S>))
    // Athletes
    .route(
      "/athletes",
      get(athletes::list::<S>).post(athletes::create::<S>),
    )
    .route(
      "/athletes/{id}/assignment",
      get(athletes::assignment_status::<S>),
    )
    // Resolved chart
    .route("/chart", get(chart::chart::<S>))
    .route("/chart/summary", get(chart::summary::<S>))
    .with_state(store)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use lineup_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn app() -> Router<()> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(
    app: &Router<()>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder =
          builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app
      .clone()
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  /// Create a formation with one sub-position; returns (formation, slot) ids.
  async fn formation_with_slot(
    app: &Router<()>,
    customer_id: Uuid,
  ) -> (Uuid, Uuid) {
    let (status, formation) = send(
      app,
      "POST",
      "/formations",
      Some(json!({
        "customer_id":   customer_id,
        "name":          "4-3 Defense",
        "display_order": 1,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let formation_id = formation["formation_id"].as_str().unwrap().to_string();

    let (status, slot) = send(
      app,
      "POST",
      &format!("/formations/{formation_id}/sub-positions"),
      Some(json!({ "name": "MLB", "x_coord": 0.5, "y_coord": 0.3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (
      formation_id.parse().unwrap(),
      slot["sub_position_id"].as_str().unwrap().parse().unwrap(),
    )
  }

  async fn record(
    app: &Router<()>,
    customer_id: Uuid,
    slot: Uuid,
    athlete_id: Uuid,
    scenario: &str,
    year: i32,
    month: u8,
    ranking: u32,
  ) -> (StatusCode, Value) {
    send(
      app,
      "POST",
      "/assignments",
      Some(json!({
        "athlete_id":      athlete_id,
        "sub_position_id": slot,
        "customer_id":     customer_id,
        "ranking":         ranking,
        "scenario":        scenario,
        "year":            year,
        "month":           month,
      })),
    )
    .await
  }

  fn chart_uri(customer_id: Uuid, formation_id: Uuid, year: i32, month: u8) -> String {
    format!(
      "/chart?customer_id={customer_id}&formation_id={formation_id}\
       &year={year}&month={month}"
    )
  }

  // ── Formations ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_then_get_formation() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (formation_id, _) = formation_with_slot(&app, customer).await;

    let (status, body) =
      send(&app, "GET", &format!("/formations/{formation_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "4-3 Defense");
  }

  #[tokio::test]
  async fn get_missing_formation_is_404() {
    let app = app().await;
    let (status, body) =
      send(&app, "GET", &format!("/formations/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn ending_a_formation_twice_is_409() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (formation_id, _) = formation_with_slot(&app, customer).await;
    let uri = format!("/formations/{formation_id}/end");

    let (status, _) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn list_formations_respects_include_ended() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (formation_id, _) = formation_with_slot(&app, customer).await;
    send(&app, "POST", &format!("/formations/{formation_id}/end"), None)
      .await;

    let (_, body) = send(
      &app,
      "GET",
      &format!("/formations?customer_id={customer}"),
      None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (_, body) = send(
      &app,
      "GET",
      &format!("/formations?customer_id={customer}&include_ended=true"),
      None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
  }

  // ── Assignments ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn recording_returns_201_with_record() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (_, slot) = formation_with_slot(&app, customer).await;
    let athlete = Uuid::new_v4();

    let (status, body) =
      record(&app, customer, slot, athlete, "", 2024, 6, 1).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ranking"], 1);
    assert_eq!(body["year"], 2024);
    assert_eq!(body["month"], 6);
  }

  #[tokio::test]
  async fn zero_ranking_is_400() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (_, slot) = formation_with_slot(&app, customer).await;

    let (status, _) =
      record(&app, customer, slot, Uuid::new_v4(), "", 2024, 6, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn removing_an_unassigned_athlete_is_404() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (_, slot) = formation_with_slot(&app, customer).await;

    let (status, _) = send(
      &app,
      "POST",
      "/assignments/remove",
      Some(json!({
        "athlete_id":      Uuid::new_v4(),
        "sub_position_id": slot,
        "customer_id":     customer,
        "year":            2024,
        "month":           6,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn removing_an_explicit_record_is_204() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (_, slot) = formation_with_slot(&app, customer).await;
    let athlete = Uuid::new_v4();
    record(&app, customer, slot, athlete, "", 2024, 6, 1).await;

    let (status, _) = send(
      &app,
      "POST",
      "/assignments/remove",
      Some(json!({
        "athlete_id":      athlete,
        "sub_position_id": slot,
        "customer_id":     customer,
        "year":            2024,
        "month":           6,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
  }

  #[tokio::test]
  async fn vacating_the_sole_inherited_athlete_is_409() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (_, slot) = formation_with_slot(&app, customer).await;
    let athlete = Uuid::new_v4();
    record(&app, customer, slot, athlete, "", 2024, 3, 1).await;

    // June only inherits March; vacating would resurrect it from history.
    let (status, _) = send(
      &app,
      "POST",
      "/assignments/remove",
      Some(json!({
        "athlete_id":      athlete,
        "sub_position_id": slot,
        "customer_id":     customer,
        "year":            2024,
        "month":           6,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn moving_a_ranking_swaps_the_depth_order() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (formation_id, slot) = formation_with_slot(&app, customer).await;
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    record(&app, customer, slot, a, "", 2024, 3, 1).await;
    record(&app, customer, slot, b, "", 2024, 3, 2).await;

    let (status, body) = send(
      &app,
      "POST",
      "/assignments/move",
      Some(json!({
        "athlete_id":      b,
        "sub_position_id": slot,
        "customer_id":     customer,
        "year":            2024,
        "month":           3,
        "direction":       "up",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ranking"], 1);

    let (_, chart) =
      send(&app, "GET", &chart_uri(customer, formation_id, 2024, 3), None)
        .await;
    let rows = chart.as_array().unwrap();
    assert_eq!(rows[0]["athlete_id"], json!(b));
    assert_eq!(rows[1]["athlete_id"], json!(a));
  }

  #[tokio::test]
  async fn assignment_status_reports_exact_coordinate_only() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (_, slot) = formation_with_slot(&app, customer).await;
    let athlete = Uuid::new_v4();
    record(&app, customer, slot, athlete, "", 2024, 3, 1).await;

    let uri = |month: u8| {
      format!(
        "/athletes/{athlete}/assignment?customer_id={customer}\
         &year=2024&month={month}"
      )
    };

    let (status, body) = send(&app, "GET", &uri(3), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_assigned"], true);
    assert_eq!(body["assignment"]["ranking"], 1);

    // June only inherits March; no explicit record there.
    let (_, body) = send(&app, "GET", &uri(6), None).await;
    assert_eq!(body["is_assigned"], false);
    assert!(body.get("assignment").is_none());
  }

  // ── Chart ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn chart_returns_exact_match_not_inherited() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (formation_id, slot) = formation_with_slot(&app, customer).await;
    let athlete = Uuid::new_v4();
    record(&app, customer, slot, athlete, "", 2024, 6, 1).await;

    let (status, body) =
      send(&app, "GET", &chart_uri(customer, formation_id, 2024, 6), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["athlete_id"], json!(athlete));
    assert_eq!(rows[0]["is_inherited"], false);
    assert_eq!(rows[0]["source_month"], 6);
  }

  #[tokio::test]
  async fn chart_inherits_from_an_earlier_month() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (formation_id, slot) = formation_with_slot(&app, customer).await;
    record(&app, customer, slot, Uuid::new_v4(), "", 2024, 3, 1).await;

    let (status, body) =
      send(&app, "GET", &chart_uri(customer, formation_id, 2024, 6), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["is_inherited"], true);
    assert_eq!(rows[0]["source_year"], 2024);
    assert_eq!(rows[0]["source_month"], 3);
  }

  #[tokio::test]
  async fn chart_scenario_falls_back_to_baseline() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (formation_id, slot) = formation_with_slot(&app, customer).await;
    record(&app, customer, slot, Uuid::new_v4(), "", 2024, 6, 1).await;

    let uri = format!(
      "{}&scenario=trade",
      chart_uri(customer, formation_id, 2024, 6)
    );
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["is_inherited"], true);
    assert_eq!(rows[0]["source_scenario"], "");
  }

  #[tokio::test]
  async fn chart_with_month_zero_is_400() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (formation_id, _) = formation_with_slot(&app, customer).await;

    let (status, _) =
      send(&app, "GET", &chart_uri(customer, formation_id, 2024, 0), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn chart_for_unknown_formation_is_404() {
    let app = app().await;
    let (status, _) = send(
      &app,
      "GET",
      &chart_uri(Uuid::new_v4(), Uuid::new_v4(), 2024, 6),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn chart_joins_athlete_records() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (formation_id, slot) = formation_with_slot(&app, customer).await;

    let (status, athlete) = send(
      &app,
      "POST",
      "/athletes",
      Some(json!({
        "customer_id": customer,
        "first_name":  "Jamal",
        "last_name":   "Carter",
        "position":    "LB",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let athlete_id: Uuid =
      athlete["athlete_id"].as_str().unwrap().parse().unwrap();
    record(&app, customer, slot, athlete_id, "", 2024, 6, 1).await;

    let (_, body) =
      send(&app, "GET", &chart_uri(customer, formation_id, 2024, 6), None)
        .await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows[0]["athlete"]["last_name"], "Carter");
  }

  #[tokio::test]
  async fn summary_includes_empty_slots() {
    let app = app().await;
    let customer = Uuid::new_v4();
    let (formation_id, slot) = formation_with_slot(&app, customer).await;

    // Second slot never assigned.
    let (_, extra) = send(
      &app,
      "POST",
      &format!("/formations/{formation_id}/sub-positions"),
      Some(json!({ "name": "WLB", "x_coord": 0.2, "y_coord": 0.3 })),
    )
    .await;
    let extra_id = extra["sub_position_id"].as_str().unwrap();

    record(&app, customer, slot, Uuid::new_v4(), "", 2024, 6, 1).await;

    let uri = format!(
      "/chart/summary?customer_id={customer}&formation_id={formation_id}\
       &year=2024&month=6"
    );
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["formation_id"], json!(formation_id));
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["athletes"].as_array().unwrap().len(), 1);
    assert_eq!(slots[1]["sub_position_id"], extra_id);
    assert_eq!(slots[1]["athletes"].as_array().unwrap().len(), 0);
  }

  // ── Athletes ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn athlete_search_filters_by_name() {
    let app = app().await;
    let customer = Uuid::new_v4();
    for (first, last) in [("Jamal", "Carter"), ("Luis", "Ortega")] {
      send(
        &app,
        "POST",
        "/athletes",
        Some(json!({
          "customer_id": customer,
          "first_name":  first,
          "last_name":   last,
          "position":    "LB",
        })),
      )
      .await;
    }

    let (_, body) = send(
      &app,
      "GET",
      &format!("/athletes?customer_id={customer}&search=orte"),
      None,
    )
    .await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["last_name"], "Ortega");
  }
}
