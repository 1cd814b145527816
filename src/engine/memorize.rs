//! Memorize-mode scheduler: study with the answer shown, recheck in windows.
//!
//! The study pass shows each question together with its answer for a fixed
//! dwell. After every 3rd study advance the scheduler backs up 3 positions
//! and re-presents that window without the answer, then resumes study where
//! it left off. When the study index passes the end, the scheduler signals
//! completion and the caller runs a final full test pass.

use serde::{Deserialize, Serialize};

use crate::config::MEMORIZE_REVIEW_WINDOW;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemorizePhase {
  Study,
  Review,
}

/// What the scheduler wants shown right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemorizeStep {
  /// Show question and answer together, dwell, then take a recall check
  Study { index: usize },
  /// Re-present an earlier question with no answer shown
  Review { index: usize },
  /// Study pass exhausted; run the final full test
  Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorizeScheduler {
  /// Next study position (also the one currently shown while in study phase)
  current: usize,
  review_start: usize,
  review_pos: usize,
  phase: MemorizePhase,
  total: usize,
}

impl MemorizeScheduler {
  pub fn new(total: usize) -> Self {
    Self {
      current: 0,
      review_start: 0,
      review_pos: 0,
      phase: MemorizePhase::Study,
      total,
    }
  }

  pub fn phase(&self) -> MemorizePhase {
    self.phase
  }

  pub fn total(&self) -> usize {
    self.total
  }

  pub fn current_step(&self) -> MemorizeStep {
    match self.phase {
      MemorizePhase::Study if self.current >= self.total => MemorizeStep::Complete,
      MemorizePhase::Study => MemorizeStep::Study {
        index: self.current,
      },
      MemorizePhase::Review => MemorizeStep::Review {
        index: self.review_pos,
      },
    }
  }

  /// Move past the currently shown question and return what comes next.
  ///
  /// The review window triggers on the study advance (every 3rd), including
  /// the one that lands exactly on the end of the set; completion is only
  /// reported once study resumes past the end.
  pub fn advance(&mut self) -> MemorizeStep {
    match self.phase {
      MemorizePhase::Study => {
        let next = self.current + 1;
        self.current = next;
        if next % MEMORIZE_REVIEW_WINDOW == 0 && next <= self.total {
          self.phase = MemorizePhase::Review;
          self.review_start = next - MEMORIZE_REVIEW_WINDOW;
          self.review_pos = self.review_start;
        }
      }
      MemorizePhase::Review => {
        self.review_pos += 1;
        if self.review_pos >= self.review_start + MEMORIZE_REVIEW_WINDOW {
          self.phase = MemorizePhase::Study;
        }
      }
    }
    self.current_step()
  }
}
