use axum::{Router, routing::get, routing::post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shakai_quiz::record::AnswerRecorder;
use shakai_quiz::source::QuestionSource;
use shakai_quiz::state::AppState;
use shakai_quiz::{config, handlers};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shakai_quiz=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let source = QuestionSource::new(config::load_backend_url());
  let recorder = AnswerRecorder::new(config::load_record_url());
  if !recorder.is_enabled() {
    tracing::info!("Answer recording disabled (no endpoint configured)");
  }
  let state = AppState::new(source, recorder, config::load_features());

  let app = Router::new()
    .route("/api/genres", get(handlers::select::genres))
    .route("/api/session", post(handlers::select::create_session))
    .route("/api/select/genre", post(handlers::select::choose_genre))
    .route("/api/select/detail", post(handlers::select::choose_detail))
    .route(
      "/api/select/sub-category",
      post(handlers::select::choose_sub_category),
    )
    .route("/api/select/level", post(handlers::select::choose_level))
    .route("/api/quiz/start", post(handlers::quiz::start))
    .route("/api/quiz/answer", post(handlers::quiz::answer))
    .route("/api/quiz/state", post(handlers::quiz::current_state))
    .route("/api/quiz/restart", post(handlers::quiz::restart))
    .nest_service("/static", ServeDir::new("static"))
    .layer(TraceLayer::new_for_http())
    .with_state(state);

  let bind_addr = config::server_bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config::SERVER_PORT);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
