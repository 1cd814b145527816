//! Pass lifecycle: start, answer, deferred advance, state polling, restart.
//!
//! The pause between verdict and next question runs server-side: the answer
//! handler schedules an advance task instead of trusting the client to call
//! back. Every deferred task captures the session epoch at scheduling time
//! and rechecks it before acting, so a restart strands stale timers.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::catalog::CountSelection;
use crate::config;
use crate::engine::SubmitOutcome;
use crate::session;
use crate::state::AppState;

use super::{ApiError, QuizState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
  pub session_id: String,
  /// Omitted means the whole filtered pool
  pub count: Option<usize>,
  #[serde(default)]
  pub random_order: bool,
  #[serde(default)]
  pub memorize: bool,
}

pub async fn start(Json(req): Json<StartRequest>) -> Result<Json<QuizState>, ApiError> {
  let count = match req.count {
    Some(n) => CountSelection::First(n),
    None => CountSelection::All,
  };

  let (snapshot, study_epoch) = session::with_session(&req.session_id, |s| {
    s.start_pass(count, req.random_order, req.memorize, &mut rand::rng())
      .map(|_| {
        let epoch = s.in_memorize_study().then_some(s.epoch);
        (QuizState::snapshot(s), epoch)
      })
  })
  .ok_or(ApiError::UnknownSession)??;

  if let Some(epoch) = study_epoch {
    schedule_study_dwell(req.session_id, epoch);
  }
  Ok(Json(snapshot))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
  pub session_id: String,
  pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
  /// False when the submission was ignored (feedback still pending)
  pub accepted: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub correct: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub canonical_answer: Option<String>,
  pub effect_ms: u64,
  pub state: QuizState,
}

pub async fn answer(
  State(state): State<AppState>,
  Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
  let (outcome, epoch, snapshot) = session::with_session(&req.session_id, |s| {
    let outcome = s.submit_answer(&req.answer, &mut rand::rng());
    (outcome, s.epoch, QuizState::snapshot(s))
  })
  .ok_or(ApiError::UnknownSession)?;

  match outcome {
    SubmitOutcome::Ignored => Ok(Json(AnswerResponse {
      accepted: false,
      correct: None,
      canonical_answer: None,
      effect_ms: config::EFFECT_DURATION_MS,
      state: snapshot,
    })),
    SubmitOutcome::Answered {
      correct,
      canonical_answer,
      recording_id,
    } => {
      state.recorder.record(&req.session_id, &recording_id, correct);
      schedule_feedback_advance(req.session_id, epoch);
      Ok(Json(AnswerResponse {
        accepted: true,
        correct: Some(correct),
        canonical_answer: Some(canonical_answer),
        effect_ms: config::EFFECT_DURATION_MS,
        state: snapshot,
      }))
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
  pub session_id: String,
}

pub async fn current_state(Json(req): Json<SessionRequest>) -> Result<Json<QuizState>, ApiError> {
  let snapshot = session::with_session(&req.session_id, |s| QuizState::snapshot(s))
    .ok_or(ApiError::UnknownSession)?;
  Ok(Json(snapshot))
}

/// Back to genre selection; the epoch bump invalidates pending timers
pub async fn restart(Json(req): Json<SessionRequest>) -> Result<Json<QuizState>, ApiError> {
  let snapshot = session::with_session(&req.session_id, |s| {
    s.restart();
    QuizState::snapshot(s)
  })
  .ok_or(ApiError::UnknownSession)?;
  Ok(Json(snapshot))
}

/// Advance after the verdict pause. Checks the epoch and lock under the
/// store lock so a restart or an already-run advance makes this a no-op.
fn schedule_feedback_advance(session_id: String, epoch: u64) {
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(config::FEEDBACK_DELAY_MS)).await;
    let resumed_study = session::with_session(&session_id, |s| {
      if s.epoch != epoch || !s.is_locked() {
        return false;
      }
      s.advance();
      s.in_memorize_study()
    })
    .unwrap_or(false);

    if resumed_study {
      schedule_study_dwell(session_id, epoch);
    }
  });
}

/// Hide a study card's answer once the dwell elapses. The card then waits
/// for the user's recall submission; the feedback advance after that
/// submission schedules the next card's dwell.
fn schedule_study_dwell(session_id: String, epoch: u64) {
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(config::MEMORIZE_DWELL_MS)).await;
    let _ = session::with_session(&session_id, |s| {
      if s.epoch == epoch {
        s.end_study_dwell();
      }
    });
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_start_request_defaults() {
    let req: StartRequest = serde_json::from_str(r#"{"sessionId": "abc"}"#).unwrap();
    assert_eq!(req.count, None);
    assert!(!req.random_order);
    assert!(!req.memorize);
  }

  #[test]
  fn test_start_request_full() {
    let req: StartRequest = serde_json::from_str(
      r#"{"sessionId": "abc", "count": 10, "randomOrder": true, "memorize": true}"#,
    )
    .unwrap();
    assert_eq!(req.count, Some(10));
    assert!(req.random_order);
    assert!(req.memorize);
  }
}
