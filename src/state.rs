//! Application state passed to all handlers.

use crate::config::QuizFeatures;
use crate::record::AnswerRecorder;
use crate::source::QuestionSource;

#[derive(Clone)]
pub struct AppState {
  /// Catalog backend client
  pub source: QuestionSource,

  /// Telemetry sink for judged answers
  pub recorder: AnswerRecorder,

  /// Variant switches applied to every new session
  pub features: QuizFeatures,
}

impl AppState {
  pub fn new(source: QuestionSource, recorder: AnswerRecorder, features: QuizFeatures) -> Self {
    Self {
      source,
      recorder,
      features,
    }
  }
}
