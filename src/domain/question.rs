//! Question records as served by the spreadsheet-backed catalog endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Presentation/checking mode for a question.
///
/// The spreadsheet marks this in the `type` column; anything unrecognized
/// falls back to free-text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  FreeText,
  Choice,
  Sequence,
}

impl QuestionKind {
  pub fn from_marker(s: &str) -> Self {
    match s.trim() {
      "choice" | "選択" => Self::Choice,
      "sequence" | "並べ替え" | "並び替え" => Self::Sequence,
      _ => Self::FreeText,
    }
  }

  /// Answer tokens must match in their original order
  pub fn is_order_sensitive(&self) -> bool {
    matches!(self, Self::Sequence)
  }
}

/// A single quiz item from the catalog.
///
/// `id` and `level` arrive as either numbers or strings depending on how the
/// sheet cell was typed, so both are deserialized tolerantly into strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  #[serde(deserialize_with = "string_or_number", default)]
  pub id: String,
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub sub_category: String,
  #[serde(default)]
  pub detail_category: String,
  #[serde(default)]
  pub question: String,
  /// Canonical answer. May hold `/`-separated alternatives and/or
  /// comma-separated tokens for multi-part answers.
  #[serde(default)]
  pub answer: String,
  #[serde(rename = "type", default)]
  pub question_type: String,
  #[serde(deserialize_with = "string_or_number", default)]
  pub level: String,
  #[serde(default)]
  pub hint: Option<String>,
  #[serde(default)]
  pub choice1: Option<String>,
  #[serde(default)]
  pub choice2: Option<String>,
  #[serde(default)]
  pub choice3: Option<String>,
  #[serde(default)]
  pub choice4: Option<String>,
  #[serde(default)]
  pub choice5: Option<String>,
  #[serde(default)]
  pub choice6: Option<String>,
  #[serde(default)]
  pub choice7: Option<String>,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default)]
  pub question_image_url: Option<String>,
  /// Position in the pre-shuffle working set. Assigned only when the user
  /// picked random order; used to recover the true identity for
  /// answer-recording.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub original_index: Option<usize>,
}

impl Question {
  pub fn kind(&self) -> QuestionKind {
    QuestionKind::from_marker(&self.question_type)
  }

  /// Option strings for multiple-choice items, empty slots omitted.
  pub fn choices(&self) -> Vec<String> {
    [
      &self.choice1,
      &self.choice2,
      &self.choice3,
      &self.choice4,
      &self.choice5,
      &self.choice6,
      &self.choice7,
    ]
    .into_iter()
    .filter_map(|c| c.as_deref())
    .map(str::trim)
    .filter(|c| !c.is_empty())
    .map(String::from)
    .collect()
  }

  /// Display image, preferring the question-specific one.
  pub fn image(&self) -> Option<&str> {
    self
      .question_image_url
      .as_deref()
      .or(self.image_url.as_deref())
      .map(str::trim)
      .filter(|u| !u.is_empty())
  }
}

/// Accept a JSON string or number and keep it as a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  match value {
    Value::String(s) => Ok(s),
    Value::Number(n) => Ok(n.to_string()),
    Value::Null => Ok(String::new()),
    other => Err(serde::de::Error::custom(format!(
      "expected string or number, got {}",
      other
    ))),
  }
}
