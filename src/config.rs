//! Application configuration constants.
//!
//! Centralizes timings, selection limits, and backend endpoint resolution.
//! Endpoint values resolve with priority: config.toml > .env > default.

use serde::Deserialize;

// ==================== Backend Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
  backend: Option<BackendConfig>,
  features: Option<FeatureConfig>,
}

#[derive(Debug, Deserialize)]
struct BackendConfig {
  url: Option<String>,
  record_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeatureConfig {
  sub_category: Option<bool>,
  memorize_mode: Option<bool>,
  choice_questions: Option<bool>,
}

/// Default question-source backend (the spreadsheet-backed API)
pub const DEFAULT_BACKEND_URL: &str = "https://wri-flask-backend.onrender.com";

fn read_config() -> Option<AppConfig> {
  let contents = std::fs::read_to_string("config.toml").ok()?;
  toml::from_str::<AppConfig>(&contents).ok()
}

/// Load the question-source base URL with priority: config.toml > .env > default
pub fn load_backend_url() -> String {
  let _ = dotenvy::dotenv();

  if let Some(config) = read_config()
    && let Some(backend) = config.backend
    && let Some(url) = backend.url
  {
    tracing::info!("Using backend URL from config.toml: {}", url);
    return url;
  }

  if let Ok(url) = std::env::var("QUIZ_BACKEND_URL") {
    tracing::info!("Using backend URL from QUIZ_BACKEND_URL env: {}", url);
    return url;
  }

  tracing::info!("Using default backend URL: {}", DEFAULT_BACKEND_URL);
  DEFAULT_BACKEND_URL.to_string()
}

/// Load the answer-recording endpoint, if any. Recording is a telemetry side
/// channel; absence simply disables it.
pub fn load_record_url() -> Option<String> {
  let _ = dotenvy::dotenv();

  if let Some(config) = read_config()
    && let Some(backend) = config.backend
    && let Some(url) = backend.record_url
  {
    return Some(url);
  }

  std::env::var("QUIZ_RECORD_URL").ok()
}

// ==================== Feature Flags ====================

/// Variant switches that collapse the historical per-revision forks of the
/// quiz flow into one engine.
#[derive(Debug, Clone, Copy)]
pub struct QuizFeatures {
  pub sub_category: bool,
  pub memorize_mode: bool,
  pub choice_questions: bool,
}

impl Default for QuizFeatures {
  fn default() -> Self {
    Self {
      sub_category: true,
      memorize_mode: true,
      choice_questions: true,
    }
  }
}

/// Load feature flags from config.toml, defaulting each to enabled
pub fn load_features() -> QuizFeatures {
  let defaults = QuizFeatures::default();
  let Some(features) = read_config().and_then(|c| c.features) else {
    return defaults;
  };
  QuizFeatures {
    sub_category: features.sub_category.unwrap_or(defaults.sub_category),
    memorize_mode: features.memorize_mode.unwrap_or(defaults.memorize_mode),
    choice_questions: features
      .choice_questions
      .unwrap_or(defaults.choice_questions),
  }
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
  format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== Session Configuration ====================

/// Session expiration time in hours
pub const SESSION_EXPIRY_HOURS: i64 = 1;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== Quiz Flow Timings ====================

/// Pause between showing the verdict and advancing to the next question
pub const FEEDBACK_DELAY_MS: u64 = 1000;

/// Duration of the 〇/✕ overlay effect, surfaced to the frontend
pub const EFFECT_DURATION_MS: u64 = 500;

/// How long memorize mode shows question and answer together
pub const MEMORIZE_DWELL_MS: u64 = 5000;

/// Look-back window for memorize-mode recheck passes
pub const MEMORIZE_REVIEW_WINDOW: usize = 3;

// ==================== Content Configuration ====================

/// Top-page genre buttons; matched as substrings against the category column
pub const GENRES: [&str; 3] = ["地理", "歴史", "公民"];
