//! Validation and classification of mined page sequences.

use chrono::NaiveDateTime;
use starmine_core::{
  date,
  thread::{Action, ThreadRecord, VoteSummary},
};

use crate::{
  Error, Result,
  extract::{PageSequences, TimeMark},
};

// ─── Vote cursor ─────────────────────────────────────────────────────────────

/// Whether the null vote slot under the cursor has already been claimed by an
/// edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
  AwaitingVote,
  VoteConsumed,
}

/// Walks the vote markers alongside the time markers.
///
/// The vote sequence is shorter than the time sequence: edits carry no
/// marker at all. Every non-edit entry takes one slot and moves the cursor
/// on; it is a comment when its slot is null. An edit that lands on a null
/// slot claims it, so the entry that takes that slot next is an answer.
struct VoteCursor<'a> {
  votes: &'a [Option<i64>],
  slot:  usize,
  state: SlotState,
}

impl<'a> VoteCursor<'a> {
  fn new(votes: &'a [Option<i64>]) -> Self {
    Self {
      votes,
      slot: 0,
      state: SlotState::AwaitingVote,
    }
  }

  fn classify(&mut self, index: usize, mark: &TimeMark) -> Action {
    if index == 0 {
      self.advance();
      return Action::Asked;
    }

    let slot_is_null = self.votes.get(self.slot).copied().flatten().is_none();
    let unclaimed_null = slot_is_null && self.state == SlotState::AwaitingVote;

    if mark.is_edit {
      if unclaimed_null {
        self.state = SlotState::VoteConsumed;
      }
      return Action::Edited;
    }

    self.advance();
    if unclaimed_null {
      Action::Commented
    } else {
      Action::Answered
    }
  }

  fn advance(&mut self) {
    self.slot += 1;
    self.state = SlotState::AwaitingVote;
  }
}

// ─── Assembly ────────────────────────────────────────────────────────────────

pub(crate) fn assemble(
  thread_id: u64,
  page: PageSequences,
  now: NaiveDateTime,
) -> Result<Vec<ThreadRecord>> {
  let PageSequences {
    times,
    author_links,
    votes,
    tags,
  } = page;

  if times.len() != author_links.len() {
    return Err(Error::ShapeMismatch {
      times:   times.len(),
      authors: author_links.len(),
    });
  }
  if votes.len() > times.len() {
    return Err(Error::SurplusVotes {
      votes: votes.len(),
      times: times.len(),
    });
  }
  let Some(first) = times.first() else {
    return Err(Error::EmptyThread);
  };
  if first.is_edit {
    return Err(Error::OpensWithEdit);
  }
  let summary = VoteSummary::from_votes(&votes).ok_or(Error::OpensWithComment)?;

  let mut cursor = VoteCursor::new(&votes);
  let mut records = Vec::with_capacity(times.len());

  for (index, (mark, author)) in times.iter().zip(author_links).enumerate() {
    let action = cursor.classify(index, mark);
    let text = mark
      .text
      .trim_start_matches(|c: char| !c.is_ascii_digit())
      .to_string();
    let date = date::normalize_at(&text, now)
      .ok_or_else(|| starmine_core::Error::UnresolvedDate(text.clone()))?;

    records.push(ThreadRecord {
      thread_id,
      sequence_index: index,
      date_text: text,
      date,
      action,
      author,
      votes: summary.clone(),
      tags: tags.clone(),
      api_type: None,
      api_type_id: None,
      api_created: None,
    });
  }

  Ok(records)
}
