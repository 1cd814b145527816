//! Session creation and step-by-step catalog narrowing.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::engine::{EngineError, QuizSession, SelectionStep};
use crate::session;
use crate::state::AppState;

use super::ApiError;

/// Top-page genre buttons
pub async fn genres() -> Json<serde_json::Value> {
  Json(serde_json::json!({ "genres": config::GENRES }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResponse {
  pub session_id: String,
  pub genres: Vec<&'static str>,
  pub question_count: usize,
}

/// Create a fresh session. The catalog is fetched once here; every later
/// step filters locally.
pub async fn create_session(
  State(state): State<AppState>,
) -> Result<Json<NewSessionResponse>, ApiError> {
  let catalog = state
    .source
    .fetch_catalog()
    .await
    .map_err(|e| ApiError::Backend(e.to_string()))?;
  let question_count = catalog.len();

  let session_id = session::generate_session_id();
  session::insert_session(&session_id, QuizSession::new(catalog, state.features));
  tracing::debug!("Created session {} ({} rows)", session_id, question_count);

  Ok(Json(NewSessionResponse {
    session_id,
    genres: config::GENRES.to_vec(),
    question_count,
  }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
  pub session_id: String,
  pub value: String,
}

pub async fn choose_genre(
  Json(req): Json<SelectRequest>,
) -> Result<Json<SelectionStep>, ApiError> {
  apply_selection(&req, |s, v| s.choose_genre(v))
}

pub async fn choose_detail(
  Json(req): Json<SelectRequest>,
) -> Result<Json<SelectionStep>, ApiError> {
  apply_selection(&req, |s, v| s.choose_detail(v))
}

pub async fn choose_sub_category(
  Json(req): Json<SelectRequest>,
) -> Result<Json<SelectionStep>, ApiError> {
  apply_selection(&req, |s, v| s.choose_sub_category(v))
}

pub async fn choose_level(
  Json(req): Json<SelectRequest>,
) -> Result<Json<SelectionStep>, ApiError> {
  apply_selection(&req, |s, v| s.choose_level(v))
}

fn apply_selection(
  req: &SelectRequest,
  f: impl FnOnce(&mut QuizSession, &str) -> Result<SelectionStep, EngineError>,
) -> Result<Json<SelectionStep>, ApiError> {
  let step = session::with_session(&req.session_id, |s| f(s, &req.value))
    .ok_or(ApiError::UnknownSession)??;
  Ok(Json(step))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_select_request_accepts_camel_case() {
    let req: SelectRequest =
      serde_json::from_str(r#"{"sessionId": "abc", "value": "歴史"}"#).unwrap();
    assert_eq!(req.session_id, "abc");
    assert_eq!(req.value, "歴史");
  }

  #[test]
  fn test_selection_step_serializes_with_step_tag() {
    let step = SelectionStep::ChooseCount { available: 12 };
    let json = serde_json::to_value(&step).unwrap();
    assert_eq!(json["step"], "choose_count");
    assert_eq!(json["available"], 12);
  }
}
