//! The progression state machine for a quiz session.
//!
//! One tagged-union phase replaces the pile of show-this/show-that booleans
//! the UI used to thread around: each selection step holds the pool it
//! narrowed, and `InPass` owns the working set, position, and tracker. The
//! tracker mutation for an answer happens synchronously inside
//! `submit_answer`, so the end-of-pass decision in `advance` always sees the
//! final answer's write; there is no deferred read-back to race against.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{self, CountSelection};
use crate::config::{self, QuizFeatures};
use crate::domain::chat::{self, ChatMessage, NORMAL_FACE};
use crate::domain::{Question, QuestionKind};
use crate::evaluator;

use super::memorize::{MemorizePhase, MemorizeScheduler, MemorizeStep};
use super::tracker::MissedTracker;

const MSG_NO_QUESTIONS: &str = "問題がありません";
const MSG_CORRECT: &str = "正解！";
const MSG_SESSION_COMPLETE: &str = "全ての問題が終了しました！お疲れさまでした。";
const MSG_FULLY_MASTERED: &str = "全問正解です！すべての問題をマスターしました！";
const MSG_RECHECK_WINDOW: &str = "ここまでの3問を覚えているか確認しましょう！";
const MSG_FINAL_TEST: &str = "覚えられたかな？それでは最終テストです！";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
  #[error("operation is not valid in the current phase")]
  WrongPhase,
}

/// Session phase. Selection variants carry the pool they narrowed so a
/// transition can never observe a stale filter result.
#[derive(Debug, Clone)]
pub enum Phase {
  SelectingGenre,
  SelectingDetail { pool: Vec<Question> },
  SelectingSub { pool: Vec<Question> },
  SelectingLevel { pool: Vec<Question> },
  SelectingCount { pool: Vec<Question> },
  InPass,
  Finished,
  /// Filtering produced an empty set before any pass started; terminal,
  /// distinct from `Finished`.
  NoQuestions,
}

impl Phase {
  pub fn name(&self) -> &'static str {
    match self {
      Self::SelectingGenre => "selecting_genre",
      Self::SelectingDetail { .. } => "selecting_detail",
      Self::SelectingSub { .. } => "selecting_sub_category",
      Self::SelectingLevel { .. } => "selecting_level",
      Self::SelectingCount { .. } => "selecting_count",
      Self::InPass => "in_pass",
      Self::Finished => "finished",
      Self::NoQuestions => "no_questions",
    }
  }
}

/// What the UI should ask for next after a selection step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum SelectionStep {
  ChooseDetail { options: Vec<String> },
  ChooseSubCategory { options: Vec<String> },
  ChooseLevel { options: Vec<String> },
  ChooseCount { available: usize },
  NoQuestions,
}

/// Everything the UI needs to present the current question
#[derive(Debug, Clone, Serialize)]
pub struct Prompt {
  pub question_id: String,
  pub text: String,
  pub kind: QuestionKind,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub choices: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hint: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  /// Memorize study phase only: show this answer for the dwell, then hide
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reveal_answer: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dwell_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
  /// Locked, finished, or wrong phase; duplicate rapid-fire submissions land here
  Ignored,
  Answered {
    correct: bool,
    canonical_answer: String,
    /// Id to report to the answer-recording sink; resolved through
    /// `original_index` when display order was randomized
    recording_id: String,
  },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
  Ignored,
  NextQuestion,
  ReviewRoundStarted { round: u32, count: usize },
  FinalTestStarted,
  Finished { mastered: bool },
}

/// A quiz session from genre selection through the final review round.
#[derive(Debug, Clone)]
pub struct QuizSession {
  /// Bumped on restart; pending timers compare against it and drop out
  pub epoch: u64,
  catalog: Vec<Question>,
  phase: Phase,
  /// Pre-shuffle selection backing `original_index` lookups; fixed for the
  /// whole pass cycle, including review rounds
  base_set: Vec<Question>,
  working_set: Vec<Question>,
  position: usize,
  tracker: MissedTracker,
  review_round: u32,
  /// Set after a submission until the deferred advance runs
  locked: bool,
  memorize: Option<MemorizeScheduler>,
  /// Study card sub-state: answer shown during the dwell, hidden afterwards
  /// while the card waits for the recall submission
  study_revealed: bool,
  features: QuizFeatures,
  pub chat: Vec<ChatMessage>,
}

impl QuizSession {
  pub fn new(catalog: Vec<Question>, features: QuizFeatures) -> Self {
    Self {
      epoch: 0,
      catalog,
      phase: Phase::SelectingGenre,
      base_set: Vec::new(),
      working_set: Vec::new(),
      position: 0,
      tracker: MissedTracker::new(),
      review_round: 0,
      locked: false,
      memorize: None,
      study_revealed: false,
      features,
      chat: Vec::new(),
    }
  }

  pub fn phase(&self) -> &Phase {
    &self.phase
  }

  pub fn is_locked(&self) -> bool {
    self.locked
  }

  pub fn review_round(&self) -> u32 {
    self.review_round
  }

  // ==================== Selection ====================

  pub fn choose_genre(&mut self, genre: &str) -> Result<SelectionStep, EngineError> {
    if !matches!(self.phase, Phase::SelectingGenre) {
      return Err(EngineError::WrongPhase);
    }
    let pool = catalog::filter_by_genre(&self.catalog, genre);
    if pool.is_empty() {
      return Ok(self.no_questions());
    }
    let options = catalog::detail_categories(&pool);
    if options.is_empty() {
      // Sheet rows without detail categories: narrow no further
      return Ok(self.after_detail(pool));
    }
    self.phase = Phase::SelectingDetail { pool };
    Ok(SelectionStep::ChooseDetail { options })
  }

  pub fn choose_detail(&mut self, detail: &str) -> Result<SelectionStep, EngineError> {
    let Phase::SelectingDetail { pool } = &self.phase else {
      return Err(EngineError::WrongPhase);
    };
    let filtered = catalog::filter_by_detail(pool, detail);
    if filtered.is_empty() {
      return Ok(self.no_questions());
    }
    Ok(self.after_detail(filtered))
  }

  pub fn choose_sub_category(&mut self, sub: &str) -> Result<SelectionStep, EngineError> {
    let Phase::SelectingSub { pool } = &self.phase else {
      return Err(EngineError::WrongPhase);
    };
    let filtered = catalog::filter_by_sub_category(pool, sub);
    if filtered.is_empty() {
      return Ok(self.no_questions());
    }
    Ok(self.after_sub(filtered))
  }

  pub fn choose_level(&mut self, level: &str) -> Result<SelectionStep, EngineError> {
    let Phase::SelectingLevel { pool } = &self.phase else {
      return Err(EngineError::WrongPhase);
    };
    let filtered = catalog::filter_by_level(pool, level);
    if filtered.is_empty() {
      return Ok(self.no_questions());
    }
    let available = filtered.len();
    self.phase = Phase::SelectingCount { pool: filtered };
    Ok(SelectionStep::ChooseCount { available })
  }

  /// Sub-category selection is offered only when it is a meaningful choice
  fn after_detail(&mut self, pool: Vec<Question>) -> SelectionStep {
    if self.features.sub_category && catalog::needs_sub_category(&pool) {
      let options = catalog::sub_categories(&pool);
      self.phase = Phase::SelectingSub { pool };
      SelectionStep::ChooseSubCategory { options }
    } else {
      self.after_sub(pool)
    }
  }

  fn after_sub(&mut self, pool: Vec<Question>) -> SelectionStep {
    let options = catalog::levels(&pool);
    if options.is_empty() {
      // No level values recorded for these rows: go straight to count
      let available = pool.len();
      self.phase = Phase::SelectingCount { pool };
      return SelectionStep::ChooseCount { available };
    }
    self.phase = Phase::SelectingLevel { pool };
    SelectionStep::ChooseLevel { options }
  }

  fn no_questions(&mut self) -> SelectionStep {
    self.phase = Phase::NoQuestions;
    self
      .chat
      .push(ChatMessage::sensei(MSG_NO_QUESTIONS, NORMAL_FACE));
    SelectionStep::NoQuestions
  }

  // ==================== Pass lifecycle ====================

  /// Finalize the working set and begin the first pass.
  pub fn start_pass<R: Rng + ?Sized>(
    &mut self,
    count: CountSelection,
    random_order: bool,
    memorize: bool,
    rng: &mut R,
  ) -> Result<(), EngineError> {
    let Phase::SelectingCount { pool } = &self.phase else {
      return Err(EngineError::WrongPhase);
    };
    let pool = pool.clone();

    let take = match count {
      CountSelection::All => pool.len(),
      CountSelection::First(n) => n.min(pool.len()),
    };
    let working = catalog::finalize_with(&pool, count, random_order, rng);
    if working.is_empty() {
      self.no_questions();
      return Ok(());
    }

    self.base_set = pool[..take].to_vec();
    self.working_set = working;
    self.position = 0;
    self.tracker.clear();
    self.review_round = 0;
    self.locked = false;
    self.memorize = (memorize && self.features.memorize_mode)
      .then(|| MemorizeScheduler::new(self.working_set.len()));
    self.study_revealed = self.memorize.is_some();
    self.phase = Phase::InPass;

    self.push_question_chat();
    Ok(())
  }

  /// The question currently being asked, if any
  pub fn current_question(&self) -> Option<&Question> {
    if !matches!(self.phase, Phase::InPass) {
      return None;
    }
    let index = match &self.memorize {
      Some(scheduler) => match scheduler.current_step() {
        MemorizeStep::Study { index } | MemorizeStep::Review { index } => index,
        MemorizeStep::Complete => return None,
      },
      None => self.position,
    };
    self.working_set.get(index)
  }

  pub fn current_prompt(&self) -> Option<Prompt> {
    let question = self.current_question()?;
    let revealed = self.in_memorize_study() && self.study_revealed;

    let choices = if self.features.choice_questions && question.kind() == QuestionKind::Choice {
      question.choices()
    } else {
      Vec::new()
    };

    Some(Prompt {
      question_id: question.id.clone(),
      text: question.question.clone(),
      kind: question.kind(),
      choices,
      hint: question.hint.clone(),
      image_url: question.image().map(String::from),
      reveal_answer: revealed.then(|| question.answer.clone()),
      dwell_ms: revealed.then_some(config::MEMORIZE_DWELL_MS),
    })
  }

  // ==================== Answering ====================

  /// Judge a submission and update the tracker.
  ///
  /// Ignored while feedback for a previous submission is pending, so
  /// rapid-fire duplicate sends cannot double-advance.
  pub fn submit_answer<R: Rng + ?Sized>(&mut self, input: &str, rng: &mut R) -> SubmitOutcome {
    if self.locked || !matches!(self.phase, Phase::InPass) {
      return SubmitOutcome::Ignored;
    }
    // While a study card still shows its answer there is nothing to judge;
    // the recall submission is taken after the dwell hides it
    if self.in_memorize_study() && self.study_revealed {
      return SubmitOutcome::Ignored;
    }
    let Some(question) = self.current_question().cloned() else {
      return SubmitOutcome::Ignored;
    };

    let correct = evaluator::is_correct(input, &question.answer, question.kind());

    self.chat.push(ChatMessage::seito(input.trim()));
    if correct {
      self
        .chat
        .push(ChatMessage::sensei(MSG_CORRECT, chat::good_face(rng)));
    } else {
      self.chat.push(ChatMessage::sensei(
        format!("不正解… 正解は「{}」", question.answer),
        chat::bad_face(rng),
      ));
    }

    // Memorize study/recheck answers are practice; only the final test pass
    // (memorize == None) feeds the tracker.
    if self.memorize.is_none() {
      if correct {
        // Purge a question re-added during this review round so it does not
        // resurface next round
        if self.review_round > 0 {
          self.tracker.remove(&question.id);
        }
      } else {
        self.tracker.record(&question);
      }
    }

    self.locked = true;

    let recording_id = question
      .original_index
      .and_then(|i| self.base_set.get(i))
      .map(|original| original.id.clone())
      .unwrap_or_else(|| question.id.clone());

    SubmitOutcome::Answered {
      correct,
      canonical_answer: question.answer,
      recording_id,
    }
  }

  /// True while a memorize study card is on display
  pub fn in_memorize_study(&self) -> bool {
    matches!(self.phase, Phase::InPass)
      && self
        .memorize
        .as_ref()
        .is_some_and(|s| s.phase() == MemorizePhase::Study)
  }

  /// Hide a study card's answer once its dwell has elapsed; the card then
  /// waits for the recall submission. Returns false (no-op) outside a
  /// revealed study card, so a stale timer cannot re-hide or skip anything.
  pub fn end_study_dwell(&mut self) -> bool {
    if self.locked || !self.in_memorize_study() || !self.study_revealed {
      return false;
    }
    self.study_revealed = false;
    true
  }

  /// Move on after the feedback pause. Runs the end-of-pass decision against
  /// the tracker state written by the final `submit_answer`.
  pub fn advance(&mut self) -> AdvanceOutcome {
    if !self.locked || !matches!(self.phase, Phase::InPass) {
      return AdvanceOutcome::Ignored;
    }
    self.locked = false;

    if let Some(scheduler) = self.memorize.as_mut() {
      let was_study = scheduler.phase() == MemorizePhase::Study;
      let step = scheduler.advance();
      self.study_revealed = matches!(step, MemorizeStep::Study { .. });
      return match step {
        MemorizeStep::Study { .. } => {
          self.push_question_chat();
          AdvanceOutcome::NextQuestion
        }
        MemorizeStep::Review { .. } => {
          if was_study {
            self
              .chat
              .push(ChatMessage::sensei(MSG_RECHECK_WINDOW, NORMAL_FACE));
          }
          self.push_question_chat();
          AdvanceOutcome::NextQuestion
        }
        MemorizeStep::Complete => {
          self.memorize = None;
          self.position = 0;
          self.tracker.clear();
          self
            .chat
            .push(ChatMessage::sensei(MSG_FINAL_TEST, NORMAL_FACE));
          self.push_question_chat();
          AdvanceOutcome::FinalTestStarted
        }
      };
    }

    self.position += 1;
    if self.position < self.working_set.len() {
      self.push_question_chat();
      return AdvanceOutcome::NextQuestion;
    }
    self.end_of_pass()
  }

  fn end_of_pass(&mut self) -> AdvanceOutcome {
    if self.tracker.is_empty() {
      let mastered = self.review_round > 0;
      self.phase = Phase::Finished;
      let text = if mastered {
        MSG_FULLY_MASTERED
      } else {
        MSG_SESSION_COMPLETE
      };
      self.chat.push(ChatMessage::sensei(text, NORMAL_FACE));
      return AdvanceOutcome::Finished { mastered };
    }

    self.working_set = self.tracker.drain();
    self.position = 0;
    self.review_round += 1;
    let count = self.working_set.len();
    self.chat.push(ChatMessage::sensei(
      format!(
        "間違えた問題をもう一度復習しましょう！（復習{}回目・{}問）",
        self.review_round, count
      ),
      NORMAL_FACE,
    ));
    self.push_question_chat();
    AdvanceOutcome::ReviewRoundStarted {
      round: self.review_round,
      count,
    }
  }

  /// Full restart: back to genre selection, everything discarded. The epoch
  /// bump invalidates any timer still pending from before the restart.
  pub fn restart(&mut self) {
    self.epoch += 1;
    self.phase = Phase::SelectingGenre;
    self.base_set.clear();
    self.working_set.clear();
    self.position = 0;
    self.tracker.clear();
    self.review_round = 0;
    self.locked = false;
    self.memorize = None;
    self.study_revealed = false;
    self.chat.clear();
  }

  fn push_question_chat(&mut self) {
    let Some(question) = self.current_question() else {
      return;
    };
    let revealed = self.in_memorize_study() && self.study_revealed;
    let text = if revealed {
      format!("{}\n答え：{}", question.question, question.answer)
    } else {
      question.question.clone()
    };
    self.chat.push(ChatMessage::sensei(text, NORMAL_FACE));
  }

  #[cfg(test)]
  pub(crate) fn in_pass_for_test(base: Vec<Question>, working: Vec<Question>) -> Self {
    let mut session = Self::new(Vec::new(), QuizFeatures::default());
    session.base_set = base;
    session.working_set = working;
    session.phase = Phase::InPass;
    session.push_question_chat();
    session
  }
}
