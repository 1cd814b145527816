pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod evaluator;
pub mod handlers;
pub mod record;
pub mod session;
pub mod source;
pub mod state;
