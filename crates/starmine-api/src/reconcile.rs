//! Cross-checks mined thread records against the post API.
//!
//! The answer count is advisory: the API is known to over- and under-report
//! it relative to what the page renders, so a disagreement is logged and the
//! mined count wins. The question score is not: a disagreement means the
//! page was mis-mined and the whole thread is discarded.

use chrono::NaiveDateTime;
use starmine_core::{date, thread::ThreadRecord};
use tracing::warn;

use crate::{Error, Result, payload::PostSummary};

/// Outcome of the answer-count check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerCount {
  Agreed(usize),
  /// The API disagreed; `mined` is used.
  Corrected { api: Option<u32>, mined: usize },
}

impl AnswerCount {
  /// The count carried forward.
  pub fn value(self) -> usize {
    match self {
      Self::Agreed(n) => n,
      Self::Corrected { mined, .. } => mined,
    }
  }
}

/// Records that survived reconciliation, with API fields attached.
#[derive(Debug, Clone)]
pub struct Reconciled {
  pub records:      Vec<ThreadRecord>,
  pub answer_count: AnswerCount,
}

/// Reconcile the mined `records` of `thread_id` with its API `summary`.
pub fn reconcile(
  thread_id: u64,
  mut records: Vec<ThreadRecord>,
  summary: &PostSummary,
  now: NaiveDateTime,
) -> Result<Reconciled> {
  let first = records.first().ok_or(Error::NoRecords(thread_id))?;
  let mined_answers = first.votes.answer_count;
  let mined_score = first.votes.question;

  let answer_count =
    if summary.answer_count.map(|n| n as usize) == Some(mined_answers) {
      AnswerCount::Agreed(mined_answers)
    } else {
      warn!(
        thread_id,
        api = ?summary.answer_count,
        mined = mined_answers,
        "number of answers differ; using the count visible on the page"
      );
      AnswerCount::Corrected {
        api:   summary.answer_count,
        mined: mined_answers,
      }
    };

  if summary.score != Some(mined_score) {
    return Err(Error::ScoreMismatch {
      api:   summary.score,
      mined: mined_score,
    });
  }

  let created = summary
    .creation_date
    .as_deref()
    .and_then(|d| date::normalize_at(d, now));

  for record in &mut records {
    record.api_type = summary.kind.clone();
    record.api_type_id = summary.type_id;
    record.api_created = created;
  }

  Ok(Reconciled {
    records,
    answer_count,
  })
}
