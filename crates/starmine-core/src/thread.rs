//! Per-thread action records.
//!
//! A thread is a root question plus its answers, comments and edits. Mining
//! one yields a [`ThreadRecord`] per action, in page order, with the thread's
//! vote statistics and tags repeated on every record.

use std::fmt;

use chrono::{Datelike, NaiveDateTime};

// ─── Actions ─────────────────────────────────────────────────────────────────

/// One reconstructed user event on a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Asked,
  Answered,
  Commented,
  Edited,
}

impl Action {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Asked => "asked",
      Self::Answered => "answered",
      Self::Commented => "commented",
      Self::Edited => "edited",
    }
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The acting user, as linked from the rendered page (`/u/<id>/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRef {
  pub user_id: u64,
  pub name:    String,
}

// ─── Vote statistics ─────────────────────────────────────────────────────────

/// Vote statistics over a thread, shared by all of its records.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteSummary {
  /// Score of the root question.
  pub question:     i64,
  pub answer_count: usize,
  pub answer_min:   Option<i64>,
  pub answer_max:   Option<i64>,
  /// Midpoint of `answer_min` and `answer_max`, not a mean over all answers.
  pub answer_avg:   Option<f64>,
}

impl VoteSummary {
  /// Summarize the vote markers of a page. `votes[0]` is the question; every
  /// later non-null entry is an answer. Returns `None` when the question has
  /// no numeric score.
  pub fn from_votes(votes: &[Option<i64>]) -> Option<Self> {
    let (first, rest) = votes.split_first()?;
    let question = (*first)?;

    let answers: Vec<i64> = rest.iter().flatten().copied().collect();
    let answer_min = answers.iter().min().copied();
    let answer_max = answers.iter().max().copied();
    let answer_avg = match (answer_min, answer_max) {
      (Some(lo), Some(hi)) => Some((lo + hi) as f64 / 2.0),
      _ => None,
    };

    Some(Self {
      question,
      answer_count: answers.len(),
      answer_min,
      answer_max,
      answer_avg,
    })
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One action on a thread.
///
/// `sequence_index == 0` holds exactly when `action == Action::Asked`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadRecord {
  pub thread_id:      u64,
  pub sequence_index: usize,
  /// The time text as mined from the page.
  pub date_text:      String,
  pub date:           NaiveDateTime,
  pub action:         Action,
  pub author:         AuthorRef,
  pub votes:          VoteSummary,
  pub tags:           Vec<String>,
  /// Filled in by reconciliation against the post API.
  pub api_type:       Option<String>,
  pub api_type_id:    Option<u32>,
  pub api_created:    Option<NaiveDateTime>,
}

impl ThreadRecord {
  pub fn year(&self) -> i32 { self.date.year() }

  pub fn month(&self) -> u32 { self.date.month() }

  pub fn day(&self) -> u32 { self.date.day() }
}
