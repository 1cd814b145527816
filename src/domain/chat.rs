//! Chat transcript model for the question/answer flow.
//!
//! The quiz is presented as a conversation between the teacher character
//! (sensei) and the student (seito). Teacher messages carry a face asset
//! name; reaction faces are drawn randomly from the good/bad pools.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const NORMAL_FACE: &str = "tai-normal";

/// Number of celebratory face variants (tai-good1..tai-good5)
const GOOD_FACES: u32 = 5;
/// Number of disappointed face variants (tai-bad1..tai-bad4)
const BAD_FACES: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
  Sensei,
  Seito,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
  pub sender: Sender,
  pub text: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub face: Option<String>,
}

impl ChatMessage {
  pub fn sensei(text: impl Into<String>, face: impl Into<String>) -> Self {
    Self {
      sender: Sender::Sensei,
      text: text.into(),
      face: Some(face.into()),
    }
  }

  pub fn seito(text: impl Into<String>) -> Self {
    Self {
      sender: Sender::Seito,
      text: text.into(),
      face: None,
    }
  }
}

/// Pick a random celebratory face for a correct answer
pub fn good_face<R: Rng + ?Sized>(rng: &mut R) -> String {
  format!("tai-good{}", rng.random_range(1..=GOOD_FACES))
}

/// Pick a random disappointed face for a wrong answer
pub fn bad_face<R: Rng + ?Sized>(rng: &mut R) -> String {
  format!("tai-bad{}", rng.random_range(1..=BAD_FACES))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sensei_message_has_face() {
    let msg = ChatMessage::sensei("問題です", NORMAL_FACE);
    assert_eq!(msg.sender, Sender::Sensei);
    assert_eq!(msg.face.as_deref(), Some("tai-normal"));
  }

  #[test]
  fn test_seito_message_has_no_face() {
    let msg = ChatMessage::seito("東京");
    assert_eq!(msg.sender, Sender::Seito);
    assert!(msg.face.is_none());
  }

  #[test]
  fn test_face_pools_stay_in_range() {
    let mut rng = rand::rng();
    for _ in 0..50 {
      let good = good_face(&mut rng);
      let n: u32 = good.strip_prefix("tai-good").unwrap().parse().unwrap();
      assert!((1..=5).contains(&n));

      let bad = bad_face(&mut rng);
      let n: u32 = bad.strip_prefix("tai-bad").unwrap().parse().unwrap();
      assert!((1..=4).contains(&n));
    }
  }

  #[test]
  fn test_sender_serializes_lowercase() {
    let msg = ChatMessage::seito("answer");
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["sender"], "seito");
  }
}
