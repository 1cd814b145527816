//! Answer validation with flexible matching for quiz answers.
//!
//! Answer cells support two layers of structure:
//! - `a/b` - alternative full answers (any is correct)
//! - `a、b` or `a,b` or whitespace - multi-part answers whose tokens must all
//!   be given; order matters only for sequence-type questions
//!
//! The same function judges free-text submissions and multiple-choice
//! selections, so choice handling never drifts from text handling.

use crate::domain::QuestionKind;

/// Token delimiters: full/half-width commas plus any whitespace
/// (char::is_whitespace covers the full-width space U+3000)
fn is_delimiter(c: char) -> bool {
  c == '、' || c == '，' || c == ',' || c.is_whitespace()
}

/// Split a multi-part answer into its tokens, dropping empties
fn tokenize(s: &str) -> Vec<&str> {
  s.split(is_delimiter)
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .collect()
}

/// Compare token lists under the question's ordering rule
fn tokens_match(input: &[&str], expected: &[&str], order_sensitive: bool) -> bool {
  if input.is_empty() || input.len() != expected.len() {
    return false;
  }
  if order_sensitive {
    input == expected
  } else {
    let mut a = input.to_vec();
    let mut b = expected.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
  }
}

/// Judge a submission against the canonical answer.
///
/// Checks, in order: verbatim match, `/`-separated alternatives, then
/// tokenized comparison of each alternative (positional for sequence
/// questions, sorted otherwise).
pub fn is_correct(user_input: &str, canonical_answer: &str, kind: QuestionKind) -> bool {
  let input = user_input.trim();
  let canonical = canonical_answer.trim();

  if input.is_empty() {
    return false;
  }
  if input == canonical {
    return true;
  }

  let alternatives: Vec<&str> = canonical
    .split('/')
    .map(str::trim)
    .filter(|a| !a.is_empty())
    .collect();

  if alternatives.iter().any(|a| *a == input) {
    return true;
  }

  let input_tokens = tokenize(input);
  alternatives
    .iter()
    .any(|alt| tokens_match(&input_tokens, &tokenize(alt), kind.is_order_sensitive()))
}
