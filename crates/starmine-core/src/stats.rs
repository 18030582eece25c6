//! Daily site-activity snapshots and the age tables that link them.
//!
//! The stats API reports, per day, which posts, votes and users were new on
//! that day. An entity's *age* is the days-ago offset of the snapshot in which
//! it first appeared. [`AgeTables`] remembers those ages across snapshots so a
//! later snapshot can say how old a poster, a parent post or a voted-on post
//! was.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime};
use serde::Deserialize;

// ─── Categories ──────────────────────────────────────────────────────────────

/// Number of post categories the forum defines (type ids `1..=16`).
pub const CATEGORY_COUNT: usize = 16;

/// Human-readable name of a post category. Id 8 is unnamed on the site.
pub fn category_name(type_id: u32) -> Option<&'static str> {
  let name = match type_id {
    1 => "Question",
    2 => "Answer",
    3 => "Comment",
    4 => "Tutorial",
    5 => "Blog",
    6 => "Forum",
    7 => "News",
    9 => "Tool",
    10 => "FixMe",
    11 => "Video",
    12 => "Job",
    13 => "Research Paper",
    14 => "Tip",
    15 => "Poll",
    16 => "Ad",
    _ => return None,
  };
  Some(name)
}

// ─── Votes ───────────────────────────────────────────────────────────────────

/// Vote kinds reported by the stats API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum VoteType {
  Accept,
  Bookmark,
  Downvote,
  Upvote,
}

impl VoteType {
  /// Upvotes and downvotes change a post's score; the others do not.
  pub fn is_scoring(self) -> bool {
    matches!(self, Self::Upvote | Self::Downvote)
  }
}

/// Per-type vote counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
  pub accept:   u32,
  pub bookmark: u32,
  pub downvote: u32,
  pub upvote:   u32,
}

impl VoteTally {
  pub fn record(&mut self, kind: VoteType) {
    match kind {
      VoteType::Accept => self.accept += 1,
      VoteType::Bookmark => self.bookmark += 1,
      VoteType::Downvote => self.downvote += 1,
      VoteType::Upvote => self.upvote += 1,
    }
  }

  pub fn get(&self, kind: VoteType) -> u32 {
    match kind {
      VoteType::Accept => self.accept,
      VoteType::Bookmark => self.bookmark,
      VoteType::Downvote => self.downvote,
      VoteType::Upvote => self.upvote,
    }
  }
}

// ─── Age tables ──────────────────────────────────────────────────────────────

/// First-seen ages for posts and users, keyed by id.
///
/// Lives for one full history run and is never reset mid-run.
#[derive(Debug, Clone, Default)]
pub struct AgeTables {
  post_age: HashMap<u64, u32>,
  user_age: HashMap<u64, u32>,
}

impl AgeTables {
  pub fn new() -> Self { Self::default() }

  pub fn record_post(&mut self, post_id: u64, age: u32) {
    self.post_age.insert(post_id, age);
  }

  pub fn record_user(&mut self, user_id: u64, age: u32) {
    self.user_age.insert(user_id, age);
  }

  pub fn post_age(&self, post_id: u64) -> Option<u32> {
    self.post_age.get(&post_id).copied()
  }

  pub fn user_age(&self, user_id: u64) -> Option<u32> {
    self.user_age.get(&user_id).copied()
  }

  pub fn known_users(&self) -> usize { self.user_age.len() }
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// One day of aggregated site activity.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
  pub age_days:          u32,
  /// The snapshot date as reported by the API.
  pub date_text:         String,
  pub date:              NaiveDateTime,
  /// New posts per category; index 0 is type id 1.
  pub posts_by_category: [u32; CATEGORY_COUNT],
  pub votes_by_type:     VoteTally,
  pub new_posts:         usize,
  pub new_votes:         usize,
  pub new_users:         usize,
  /// Author id of every new post, in payload order.
  pub posters:           Vec<u64>,
  /// Registration age of each poster; unknown ages are dropped.
  pub poster_ages:       Vec<u32>,
  /// Age of the parent post, for new posts that are not roots.
  pub root_post_ages:    Vec<Option<u32>>,
  /// Age of the target post, for upvotes and downvotes only.
  pub vote_post_ages:    Vec<Option<u32>>,
  pub new_user_ids:      Vec<u64>,
}

impl StatsSnapshot {
  /// An all-zero snapshot for `age_days`.
  pub fn empty(age_days: u32, date_text: String, date: NaiveDateTime) -> Self {
    Self {
      age_days,
      date_text,
      date,
      posts_by_category: [0; CATEGORY_COUNT],
      votes_by_type: VoteTally::default(),
      new_posts: 0,
      new_votes: 0,
      new_users: 0,
      posters: Vec::new(),
      poster_ages: Vec::new(),
      root_post_ages: Vec::new(),
      vote_post_ages: Vec::new(),
      new_user_ids: Vec::new(),
    }
  }

  /// Count one new post of `type_id`. Returns `false` for ids outside the
  /// category range, which are left uncounted.
  pub fn record_category(&mut self, type_id: u32) -> bool {
    match category_slot(type_id) {
      Some(slot) => {
        self.posts_by_category[slot] += 1;
        true
      }
      None => false,
    }
  }

  pub fn category_count(&self, type_id: u32) -> u32 {
    category_slot(type_id).map_or(0, |slot| self.posts_by_category[slot])
  }

  pub fn year(&self) -> i32 { self.date.year() }

  pub fn month(&self) -> u32 { self.date.month() }

  pub fn day(&self) -> u32 { self.date.day() }
}

fn category_slot(type_id: u32) -> Option<usize> {
  let slot = usize::try_from(type_id).ok()?.checked_sub(1)?;
  (slot < CATEGORY_COUNT).then_some(slot)
}
