//! Question catalog retrieval from the spreadsheet-backed HTTP API.
//!
//! The backend serves the whole sheet as one JSON array; filtering and
//! selection all happen locally, so a session fetches the catalog once.

use thiserror::Error;

use crate::domain::Question;

#[derive(Debug, Error)]
pub enum SourceError {
  #[error("catalog request failed: {0}")]
  Request(#[from] reqwest::Error),
}

/// HTTP client for the question catalog endpoint
#[derive(Debug, Clone)]
pub struct QuestionSource {
  client: reqwest::Client,
  base_url: String,
}

impl QuestionSource {
  pub fn new(base_url: impl Into<String>) -> Self {
    let base_url = base_url.into();
    Self {
      client: reqwest::Client::new(),
      base_url: base_url.trim_end_matches('/').to_string(),
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Fetch the full catalog as-is; rows are validated at filter time
  pub async fn fetch_catalog(&self) -> Result<Vec<Question>, SourceError> {
    let url = format!("{}/api/questions", self.base_url);
    tracing::debug!("Fetching question catalog from {}", url);

    let questions: Vec<Question> = self
      .client
      .get(&url)
      .send()
      .await?
      .error_for_status()?
      .json()
      .await?;

    tracing::info!("Loaded {} catalog rows", questions.len());
    Ok(questions)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_trailing_slash_is_trimmed() {
    let source = QuestionSource::new("https://example.com/");
    assert_eq!(source.base_url(), "https://example.com");
    let source = QuestionSource::new("https://example.com");
    assert_eq!(source.base_url(), "https://example.com");
  }
}
