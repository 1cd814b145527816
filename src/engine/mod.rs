//! The adaptive quiz-progression engine.
//!
//! Owns the working set, current position, and missed-question tracker, and
//! decides what to show next: normal pass, repeated review rounds over missed
//! questions until everything has been answered correctly, and the optional
//! memorize mode that interleaves study and recheck windows.

mod memorize;
mod progression;
mod tracker;

pub use memorize::{MemorizePhase, MemorizeScheduler, MemorizeStep};
pub use progression::{
  AdvanceOutcome, EngineError, Phase, Prompt, QuizSession, SelectionStep, SubmitOutcome,
};
pub use tracker::MissedTracker;
