//! Historical stats aggregation.
//!
//! Each daily snapshot records the age of every entity that is new on that
//! day, then looks up the ages of the entities its new posts and votes refer
//! to. A reference can only resolve if the referenced entity was recorded by
//! an earlier call, so days must be visited from the most distant offset down
//! to offset 1. [`day_offsets`] yields that schedule and [`HistoryWalk`]
//! rejects anything else.

use std::mem;

use chrono::NaiveDateTime;
use starmine_core::{
  date,
  stats::{AgeTables, StatsSnapshot},
};
use tracing::debug;

use crate::{
  Error, Result,
  payload::{DailyStats, VoteKind},
};

/// Days per month of look-back.
pub const DAYS_PER_MONTH: u32 = 30;

/// Day offsets to visit for `months_look_back`, most distant first.
pub fn day_offsets(months_look_back: u32) -> impl Iterator<Item = u32> {
  (1..=months_look_back.saturating_mul(DAYS_PER_MONTH)).rev()
}

/// Fold one snapshot through the age tables.
///
/// Records every new user and post at `age`, then resolves poster, parent
/// and vote-target ages from `tables` as they stand. The updated tables are
/// handed back for the next call.
pub fn aggregate(
  age: u32,
  payload: &DailyStats,
  date: NaiveDateTime,
  mut tables: AgeTables,
) -> (StatsSnapshot, AgeTables) {
  let mut snap = StatsSnapshot::empty(age, payload.date.clone(), date);

  if let Some(users) = &payload.x_new_users {
    for user in users {
      tables.record_user(user.id, age);
      snap.new_user_ids.push(user.id);
    }
    snap.new_users = users.len();
  }

  if let Some(posts) = &payload.x_new_posts {
    for post in posts {
      tables.record_post(post.id, age);
      snap.posters.push(post.author_id);
      // Posters registered before the look-back window have no age.
      if let Some(poster_age) = tables.user_age(post.author_id) {
        snap.poster_ages.push(poster_age);
      }
      if !post.is_root() {
        snap.root_post_ages.push(tables.post_age(post.root_id));
      }
      if !snap.record_category(post.type_id) {
        debug!(age, post_id = post.id, type_id = post.type_id, "uncategorised post");
      }
    }
    snap.new_posts = posts.len();
  }

  if let Some(votes) = &payload.x_new_votes {
    for vote in votes {
      match &vote.kind {
        VoteKind::Known(kind) => {
          if kind.is_scoring() {
            snap.vote_post_ages.push(tables.post_age(vote.post_id));
          }
          snap.votes_by_type.record(*kind);
        }
        VoteKind::Other(name) => {
          debug!(age, post_id = vote.post_id, kind = %name, "unknown vote type");
        }
      }
    }
    snap.new_votes = votes.len();
  }

  (snap, tables)
}

// ─── Ordered walk ────────────────────────────────────────────────────────────

/// The age tables of one history run, plus the order check.
#[derive(Debug, Default)]
pub struct HistoryWalk {
  tables:   AgeTables,
  last_age: Option<u32>,
}

impl HistoryWalk {
  pub fn new() -> Self { Self::default() }

  /// Normalize the snapshot date, then aggregate `payload` at `age`.
  ///
  /// `age` must be strictly below every age already folded. On error the
  /// tables are left untouched.
  pub fn fold(
    &mut self,
    age: u32,
    payload: &DailyStats,
    now: NaiveDateTime,
  ) -> Result<StatsSnapshot> {
    if let Some(previous) = self.last_age
      && age >= previous
    {
      return Err(Error::OutOfOrder {
        previous,
        next: age,
      });
    }

    let date = date::normalize_at(&payload.date, now).ok_or_else(|| {
      starmine_core::Error::UnresolvedDate(payload.date.clone())
    })?;

    let (snap, tables) =
      aggregate(age, payload, date, mem::take(&mut self.tables));
    self.tables = tables;
    self.last_age = Some(age);
    Ok(snap)
  }

  pub fn tables(&self) -> &AgeTables { &self.tables }
}
