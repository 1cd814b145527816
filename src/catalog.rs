//! Selection-time narrowing of the question catalog.
//!
//! The user narrows the pool step by step: genre (substring match), detail
//! category (exact), sub-category (exact, offered only when it is a
//! meaningful choice), level (string compare with numeric fallback), then
//! count and ordering. Every step returns a fresh owned set; an empty result
//! is a valid outcome, not an error.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::Question;

/// Keep records whose category contains the genre as a substring
pub fn filter_by_genre(catalog: &[Question], genre: &str) -> Vec<Question> {
  catalog
    .iter()
    .filter(|q| !q.question.trim().is_empty() && q.category.contains(genre))
    .cloned()
    .collect()
}

/// Distinct detail categories in first-seen order, for presentation
pub fn detail_categories(records: &[Question]) -> Vec<String> {
  let mut seen = Vec::new();
  for q in records {
    let detail = q.detail_category.trim();
    if !detail.is_empty() && !seen.iter().any(|s| s == detail) {
      seen.push(detail.to_string());
    }
  }
  seen
}

pub fn filter_by_detail(records: &[Question], detail: &str) -> Vec<Question> {
  records
    .iter()
    .filter(|q| q.detail_category == detail)
    .cloned()
    .collect()
}

/// Distinct non-empty sub-category values in first-seen order
pub fn sub_categories(records: &[Question]) -> Vec<String> {
  let mut seen = Vec::new();
  for q in records {
    let sub = q.sub_category.trim();
    if !sub.is_empty() && !seen.iter().any(|s| s == sub) {
      seen.push(sub.to_string());
    }
  }
  seen
}

/// Sub-category selection is only offered when it is a meaningful choice:
/// at least 2 distinct non-empty values among the detail-filtered records.
pub fn needs_sub_category(records: &[Question]) -> bool {
  sub_categories(records).len() >= 2
}

pub fn filter_by_sub_category(records: &[Question], sub: &str) -> Vec<Question> {
  records
    .iter()
    .filter(|q| q.sub_category == sub)
    .cloned()
    .collect()
}

/// Distinct level values for presentation, sorted numerically when possible
pub fn levels(records: &[Question]) -> Vec<String> {
  let mut seen: Vec<String> = Vec::new();
  for q in records {
    let level = q.level.trim();
    if !level.is_empty() && !seen.iter().any(|s| s == level) {
      seen.push(level.to_string());
    }
  }
  seen.sort_by(|a, b| match (a.parse::<f64>(), b.parse::<f64>()) {
    (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
    _ => a.cmp(b),
  });
  seen
}

/// Exact level match, tolerant of numeric vs. numeric-string cells.
///
/// String compare runs first; the numeric fallback only applies when the
/// string compare finds nothing. Unparseable values degrade to "no match".
pub fn filter_by_level(records: &[Question], level: &str) -> Vec<Question> {
  let by_string: Vec<Question> = records
    .iter()
    .filter(|q| q.level.trim() == level.trim())
    .cloned()
    .collect();
  if !by_string.is_empty() {
    return by_string;
  }

  let Ok(target) = level.trim().parse::<f64>() else {
    return Vec::new();
  };
  records
    .iter()
    .filter(|q| q.level.trim().parse::<f64>().is_ok_and(|v| v == target))
    .cloned()
    .collect()
}

/// How many questions the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSelection {
  All,
  First(usize),
}

/// Produce the final working set: take the first N entries (pre-shuffle),
/// then shuffle if random order was requested, tagging each entry with its
/// pre-shuffle position so the true identity survives reordering.
pub fn finalize(records: &[Question], count: CountSelection, random_order: bool) -> Vec<Question> {
  finalize_with(records, count, random_order, &mut rand::rng())
}

pub fn finalize_with<R: Rng + ?Sized>(
  records: &[Question],
  count: CountSelection,
  random_order: bool,
  rng: &mut R,
) -> Vec<Question> {
  let take = match count {
    CountSelection::All => records.len(),
    CountSelection::First(n) => n.min(records.len()),
  };
  let mut selected: Vec<Question> = records[..take].to_vec();

  if random_order {
    for (i, q) in selected.iter_mut().enumerate() {
      q.original_index = Some(i);
    }
    selected.shuffle(rng);
  }
  selected
}
